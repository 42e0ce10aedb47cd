use super::{load_structure, write_report};
use crate::cli::ContactsArgs;
use crate::config::builder;
use crate::config::file::FileConfig;
use crate::error::Result;
use qcore::engine::query;
use tracing::info;

pub fn run(args: ContactsArgs, file: &FileConfig) -> Result<()> {
    let options = builder::build_contact_options(&args, file);
    let structure = load_structure(&args.common)?;

    let pairs = query::find_contacts(&structure, &options)?;
    info!(
        max_distance = options.max_distance,
        pairs = pairs.len(),
        "Contact search complete."
    );
    write_report(
        pairs.iter().map(|p| p.to_row()),
        args.common.output.as_deref(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputArgs;
    use crate::commands::fixtures;
    use tempfile::tempdir;

    fn args(dir: &std::path::Path, extra: impl FnOnce(&mut ContactsArgs)) -> ContactsArgs {
        let mut args = ContactsArgs {
            common: InputArgs {
                input: fixtures::write_atoms(dir),
                chain: None,
                output: Some(dir.join("contacts.csv")),
            },
            max_distance: Some(1.5),
            ignore_hydrogens: false,
            exclude_same_residue: false,
        };
        extra(&mut args);
        args
    }

    #[test]
    fn writes_one_row_per_pair() {
        let dir = tempdir().unwrap();
        run(args(dir.path(), |_| {}), &FileConfig::default()).unwrap();

        let rows = fixtures::read_rows(&dir.path().join("contacts.csv"));
        let pairs: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r[0].clone(), r[3].clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "2".to_string()),
                ("1".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn hydrogen_filter_drops_pairs() {
        let dir = tempdir().unwrap();
        run(
            args(dir.path(), |a| a.ignore_hydrogens = true),
            &FileConfig::default(),
        )
        .unwrap();

        let rows = fixtures::read_rows(&dir.path().join("contacts.csv"));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn same_residue_filter_can_empty_the_report() {
        let dir = tempdir().unwrap();
        run(
            args(dir.path(), |a| a.exclude_same_residue = true),
            &FileConfig::default(),
        )
        .unwrap();

        let content = std::fs::read_to_string(dir.path().join("contacts.csv")).unwrap();
        assert!(content.trim().is_empty());
    }
}
