use super::tables::UNKNOWN_ELEMENT;

/// Infers a one- or two-letter element symbol from a raw atom name and an optional
/// parser-provided hint.
///
/// A non-blank `hint` always wins. Otherwise the name is read the way PDB atom labels
/// are written: a leading letter followed by a lowercase letter is a two-letter symbol
/// (`"Na"`, `"Cl"`), a leading digit is a hydrogen-count prefix (`"1HG1"` yields `"H"`),
/// and otherwise the first letter is the symbol. Never fails: input without any letter
/// yields `"X"`.
///
/// # Arguments
///
/// * `atom_name` - The raw atom label (e.g. `"CA"`, `"1HG1"`).
/// * `hint` - The element column supplied by the structure parser, possibly empty.
pub fn infer_element(atom_name: &str, hint: &str) -> String {
    let hint = hint.trim();
    if !hint.is_empty() {
        return title_case(hint);
    }

    let chars: Vec<char> = atom_name.trim().chars().collect();
    let Some(&first) = chars.first() else {
        return UNKNOWN_ELEMENT.to_string();
    };

    if chars.len() >= 2 && first.is_alphabetic() && chars[1].is_lowercase() {
        return title_case(&chars[..2].iter().collect::<String>());
    }

    if first.is_ascii_digit() && chars.len() > 1 {
        let mut symbol = String::new();
        symbol.push(chars[1]);
        if let Some(&second) = chars.get(2) {
            if second.is_lowercase() {
                symbol.push(second);
            }
        }
        return title_case(&symbol);
    }

    if first.is_alphabetic() {
        return first.to_uppercase().collect();
    }

    chars
        .iter()
        .find(|c| c.is_alphabetic())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| UNKNOWN_ELEMENT.to_string())
}

/// Upper-cases the first alphabetic character and lower-cases the later ones.
/// Non-alphabetic characters pass through unchanged.
pub fn title_case(s: &str) -> String {
    let mut seen_letter = false;
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphabetic() {
            if seen_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
                seen_letter = true;
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub fn is_hydrogen(element: &str) -> bool {
    element.trim().eq_ignore_ascii_case("H")
}
