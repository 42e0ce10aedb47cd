use crate::core::chemistry::tables::{AROMATIC_TUNNELING_FACTOR, tunneling_factor};
use crate::core::io::report::HopRow;
use crate::core::models::atom::Atom;
use crate::core::models::residue::AminoAcidType;
use crate::core::models::structure::Structure;
use crate::engine::error::EngineError;
use crate::engine::spatial::NeighborSearch;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Atom names tried, in order, when the requested atom is missing from the residue.
const BACKBONE_FALLBACK: [&str; 3] = ["N", "C", "O"];

/// A `chain,sequence[icode],atom` reference such as `A,50,CA` or `B,27A,NZ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomSpec {
    pub chain_id: String,
    pub sequence_number: i32,
    /// When absent, residues with any insertion code match.
    pub insertion_code: Option<char>,
    pub atom_name: String,
}

impl FromStr for AtomSpec {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidAtomSpec {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [chain, residue, name] = parts.as_slice() else {
            return Err(invalid("expected 'chain,residue,atom'"));
        };
        if name.is_empty() {
            return Err(invalid("atom name is empty"));
        }

        let number_part = residue.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let icode_part = &residue[number_part.len()..];
        let sequence_number = number_part
            .parse::<i32>()
            .map_err(|_| invalid("residue number is not an integer"))?;
        let mut icode_chars = icode_part.chars();
        let insertion_code = match (icode_chars.next(), icode_chars.next()) {
            (None, _) => None,
            (Some(c), None) => Some(c),
            _ => return Err(invalid("insertion code must be a single letter")),
        };

        Ok(Self {
            chain_id: chain.to_string(),
            sequence_number,
            insertion_code,
            atom_name: name.to_string(),
        })
    }
}

impl fmt::Display for AtomSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.chain_id, self.sequence_number)?;
        if let Some(icode) = self.insertion_code {
            write!(f, "{}", icode)?;
        }
        write!(f, ",{}", self.atom_name)
    }
}

impl AtomSpec {
    fn matches_residue(&self, atom: &Atom) -> bool {
        atom.chain_id.eq_ignore_ascii_case(&self.chain_id)
            && atom.sequence_number == self.sequence_number
            && self.insertion_code.is_none_or(|wanted| {
                atom.insertion_code
                    .is_some_and(|c| c.eq_ignore_ascii_case(&wanted))
            })
    }
}

/// Index of the first atom matching `spec`, falling back to the residue's N, C and then O.
pub fn resolve_atom(structure: &Structure, spec: &AtomSpec) -> Option<usize> {
    let find = |name: &str| {
        structure
            .atoms()
            .iter()
            .position(|a| spec.matches_residue(a) && a.name.eq_ignore_ascii_case(name))
    };
    find(&spec.atom_name).or_else(|| BACKBONE_FALLBACK.iter().find_map(|name| find(name)))
}

/// Element factor of an atom, damped for atoms of aromatic residues.
pub fn node_weight(atom: &Atom) -> f64 {
    let base = tunneling_factor(&atom.element());
    match AminoAcidType::from_code(&atom.residue_name) {
        Some(aa) if aa.is_aromatic() => base * AROMATIC_TUNNELING_FACTOR,
        _ => base,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TunnelHop {
    pub step: usize,
    pub from_id: i64,
    pub to_id: i64,
    pub from_spec: String,
    pub to_spec: String,
    pub distance: f64,
    /// Mean of the two endpoint weights.
    pub factor: f64,
    pub cost: f64,
    pub cumulative_cost: f64,
}

impl TunnelHop {
    pub fn to_row(&self) -> HopRow {
        HopRow {
            step: self.step,
            from_id: self.from_id,
            from_spec: self.from_spec.clone(),
            to_id: self.to_id,
            to_spec: self.to_spec.clone(),
            distance: self.distance,
            factor: self.factor,
            cost: self.cost,
            cumulative_cost: self.cumulative_cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TunnelPath<'a> {
    pub found: bool,
    pub reason: String,
    pub start_spec: String,
    pub end_spec: String,
    pub cutoff: f64,
    /// Straight-line distance between the endpoints, reported even without a path.
    pub direct_distance: f64,
    /// Sum of hop costs; infinite when no path exists.
    pub total_cost: f64,
    pub atoms: Vec<&'a Atom>,
    pub hops: Vec<TunnelHop>,
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    index: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so that `BinaryHeap` pops the cheapest entry first; ties go to the lower index.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}

struct Predecessor {
    index: usize,
    distance: f64,
    factor: f64,
    cost: f64,
}

/// Minimum-cost path from `start` to `end` through atoms at most `cutoff` apart.
///
/// `index` must be built over `structure.atoms()` so that point indices and atom
/// indices coincide. An unreachable target is a normal outcome with `found == false`.
pub fn find_path<'a, N: NeighborSearch>(
    structure: &'a Structure,
    index: &N,
    start: usize,
    end: usize,
    cutoff: f64,
) -> Result<TunnelPath<'a>, EngineError> {
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(EngineError::InvalidParameter {
            name: "cutoff",
            reason: format!("must be a positive number (got {})", cutoff),
        });
    }
    let atoms = structure.atoms();
    let (Some(start_atom), Some(end_atom)) = (atoms.get(start), atoms.get(end)) else {
        return Err(EngineError::InvalidParameter {
            name: "endpoint",
            reason: format!("atom index out of range for {} atoms", atoms.len()),
        });
    };
    if index.len() != atoms.len() {
        return Err(EngineError::InvalidParameter {
            name: "index",
            reason: "neighbour index does not cover the structure".to_string(),
        });
    }

    let weights: Vec<f64> = atoms.iter().map(node_weight).collect();
    let mut best = vec![f64::INFINITY; atoms.len()];
    let mut previous: Vec<Option<Predecessor>> = (0..atoms.len()).map(|_| None).collect();
    let mut visited = vec![false; atoms.len()];
    let mut queue = BinaryHeap::new();

    best[start] = 0.0;
    queue.push(QueueEntry {
        cost: 0.0,
        index: start,
    });

    while let Some(QueueEntry { cost, index: u }) = queue.pop() {
        if visited[u] {
            continue;
        }
        visited[u] = true;
        if u == end {
            break;
        }

        let origin = atoms[u].position;
        for v in index.within(&origin, cutoff) {
            if v == u || visited[v] {
                continue;
            }
            let distance = nalgebra::distance(&origin, &atoms[v].position);
            let factor = 0.5 * (weights[u] + weights[v]);
            let edge = distance * factor;
            let candidate = cost + edge;
            if candidate < best[v] {
                best[v] = candidate;
                previous[v] = Some(Predecessor {
                    index: u,
                    distance,
                    factor,
                    cost: edge,
                });
                queue.push(QueueEntry {
                    cost: candidate,
                    index: v,
                });
            }
        }
    }

    let direct_distance = start_atom.distance_to(end_atom);
    let start_spec = start_atom.spec();
    let end_spec = end_atom.spec();

    if !best[end].is_finite() {
        return Ok(TunnelPath {
            found: false,
            reason: format!("no path within cutoff {:.2} A", cutoff),
            start_spec,
            end_spec,
            cutoff,
            direct_distance,
            total_cost: f64::INFINITY,
            atoms: Vec::new(),
            hops: Vec::new(),
        });
    }

    let mut order = vec![end];
    let mut cursor = end;
    while let Some(pred) = &previous[cursor] {
        cursor = pred.index;
        order.push(cursor);
    }
    order.reverse();

    let mut hops = Vec::with_capacity(order.len().saturating_sub(1));
    let mut cumulative_cost = 0.0;
    for (step, pair) in order.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let Some(pred) = &previous[b] else { continue };
        cumulative_cost += pred.cost;
        trace!(step, from = atoms[a].id, to = atoms[b].id, cost = pred.cost, "Tunneling hop.");
        hops.push(TunnelHop {
            step,
            from_id: atoms[a].id,
            to_id: atoms[b].id,
            from_spec: atoms[a].spec(),
            to_spec: atoms[b].spec(),
            distance: pred.distance,
            factor: pred.factor,
            cost: pred.cost,
            cumulative_cost,
        });
    }

    Ok(TunnelPath {
        found: true,
        reason: "ok".to_string(),
        start_spec,
        end_spec,
        cutoff,
        direct_distance,
        total_cost: cumulative_cost,
        atoms: order.iter().map(|&i| &atoms[i]).collect(),
        hops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::spatial::AtomKdTree;
    use nalgebra::Point3;

    fn atom(id: i64, name: &str, resn: &str, seq: i32, x: f64, y: f64) -> Atom {
        Atom::new(id, name, resn, "A", seq, Point3::new(x, y, 0.0))
    }

    fn solve(structure: &Structure, start: usize, end: usize, cutoff: f64) -> TunnelPath<'_> {
        let tree = AtomKdTree::build(structure.atoms());
        find_path(structure, &tree, start, end, cutoff).unwrap()
    }

    #[test]
    fn atom_spec_parses_insertion_codes_and_whitespace() {
        let spec: AtomSpec = " B , 27A , NZ ".parse().unwrap();
        assert_eq!(spec.chain_id, "B");
        assert_eq!(spec.sequence_number, 27);
        assert_eq!(spec.insertion_code, Some('A'));
        assert_eq!(spec.atom_name, "NZ");
        assert_eq!(spec.to_string(), "B,27A,NZ");

        let negative: AtomSpec = "A,-3,CA".parse().unwrap();
        assert_eq!(negative.sequence_number, -3);
        assert_eq!(negative.insertion_code, None);
    }

    #[test]
    fn atom_spec_rejects_malformed_input() {
        for bad in ["A,50", "A,50,CA,X", "A,x,CA", "A,50AB,CA", "A,50,", ""] {
            assert!(
                matches!(bad.parse::<AtomSpec>(), Err(EngineError::InvalidAtomSpec { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn resolve_is_case_insensitive_and_falls_back_to_backbone() {
        let structure = Structure::new(vec![
            atom(1, "N", "GLY", 5, 0.0, 0.0),
            atom(2, "C", "GLY", 5, 1.0, 0.0),
            Atom::new(3, "NZ", "LYS", "B", 27, Point3::origin()).with_insertion_code('A'),
        ])
        .unwrap();

        let lys: AtomSpec = "b,27a,nz".parse().unwrap();
        assert_eq!(resolve_atom(&structure, &lys), Some(2));

        let missing_ca: AtomSpec = "A,5,CA".parse().unwrap();
        assert_eq!(resolve_atom(&structure, &missing_ca), Some(0));

        let wrong_residue: AtomSpec = "A,6,CA".parse().unwrap();
        assert_eq!(resolve_atom(&structure, &wrong_residue), None);
    }

    #[test]
    fn node_weight_combines_element_and_aromatic_factors() {
        let cu = Atom::new(1, "CU", "CU", "A", 1, Point3::origin()).with_element("CU");
        let sulfur = atom(2, "SD", "MET", 1, 0.0, 0.0);
        let tyr_carbon = atom(3, "CZ", "TYR", 1, 0.0, 0.0);
        let tyr_sulfur = atom(4, "SG", "TYR", 1, 0.0, 0.0).with_element("S");
        assert_eq!(node_weight(&cu), 0.5);
        assert_eq!(node_weight(&sulfur), 0.9);
        assert_eq!(node_weight(&tyr_carbon), 0.8);
        assert!((node_weight(&tyr_sulfur) - 0.72).abs() < 1e-12);
    }

    #[test]
    fn unreachable_target_reports_direct_distance_and_no_hops() {
        let structure = Structure::new(vec![
            atom(1, "CA", "ALA", 1, 0.0, 0.0),
            atom(2, "CA", "ALA", 2, 10.0, 0.0),
        ])
        .unwrap();
        let path = solve(&structure, 0, 1, 4.5);
        assert!(!path.found);
        assert_eq!(path.direct_distance, 10.0);
        assert!(path.total_cost.is_infinite());
        assert!(path.hops.is_empty());
        assert!(path.atoms.is_empty());
        assert_eq!(path.start_spec, "A,1,CA");
    }

    #[test]
    fn path_prefers_cheaper_metal_bridge() {
        // Two routes of equal length from 0 to 3: via a carbon or via a copper.
        let structure = Structure::new(vec![
            atom(1, "C1", "LIG", 1, 0.0, 0.0),
            atom(2, "C2", "LIG", 1, 2.0, 1.0),
            Atom::new(3, "CU", "CU", "A", 2, Point3::new(2.0, -1.0, 0.0)).with_element("CU"),
            atom(4, "C3", "LIG", 1, 4.0, 0.0),
        ])
        .unwrap();
        let path = solve(&structure, 0, 3, 2.5);

        assert!(path.found);
        let ids: Vec<i64> = path.atoms.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(path.hops.len(), 2);

        let leg = 5f64.sqrt();
        assert!((path.hops[0].factor - 0.75).abs() < 1e-12);
        assert!((path.hops[0].cost - leg * 0.75).abs() < 1e-12);
        assert!((path.total_cost - 2.0 * leg * 0.75).abs() < 1e-12);
        assert_eq!(path.hops[1].cumulative_cost, path.total_cost);
        assert_eq!(path.hops[1].to_spec, "A,1,C3");
    }

    #[test]
    fn cutoff_is_inclusive() {
        let structure = Structure::new(vec![
            atom(1, "CA", "ALA", 1, 0.0, 0.0),
            atom(2, "CA", "ALA", 2, 4.5, 0.0),
        ])
        .unwrap();
        let path = solve(&structure, 0, 1, 4.5);
        assert!(path.found);
        assert_eq!(path.total_cost, 4.5);
    }

    #[test]
    fn start_equal_to_end_is_a_trivial_path() {
        let structure = Structure::new(vec![atom(1, "CA", "ALA", 1, 0.0, 0.0)]).unwrap();
        let path = solve(&structure, 0, 0, 4.5);
        assert!(path.found);
        assert_eq!(path.atoms.len(), 1);
        assert!(path.hops.is_empty());
        assert_eq!(path.total_cost, 0.0);
    }

    #[test]
    fn rejects_invalid_cutoff() {
        let structure = Structure::new(vec![atom(1, "CA", "ALA", 1, 0.0, 0.0)]).unwrap();
        let tree = AtomKdTree::build(structure.atoms());
        for cutoff in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                find_path(&structure, &tree, 0, 0, cutoff),
                Err(EngineError::InvalidParameter { name: "cutoff", .. })
            ));
        }
    }
}
