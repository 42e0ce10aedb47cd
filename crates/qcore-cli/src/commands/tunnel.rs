use super::{load_structure, write_report};
use crate::cli::TunnelArgs;
use crate::config::builder;
use crate::config::file::FileConfig;
use crate::error::Result;
use qcore::engine::progress::ProgressReporter;
use qcore::workflows::tunnel;
use tracing::warn;

pub fn run(args: TunnelArgs, file: &FileConfig, reporter: &ProgressReporter) -> Result<()> {
    let config = builder::build_tunneling_config(&args, file);
    let structure = load_structure(&args.common)?;

    let path = tunnel::run(&structure, &args.from, &args.to, &config, reporter)?;
    if path.found {
        eprintln!(
            "Path {} -> {}: {} hops, total cost {:.3}, direct distance {:.3} Å",
            path.start_spec,
            path.end_spec,
            path.hops.len(),
            path.total_cost,
            path.direct_distance
        );
    } else {
        warn!(reason = %path.reason, cutoff = path.cutoff, "Tunneling target unreachable.");
        eprintln!(
            "No path {} -> {} ({}); direct distance {:.3} Å",
            path.start_spec, path.end_spec, path.reason, path.direct_distance
        );
    }

    write_report(
        path.hops.iter().map(|h| h.to_row()),
        args.common.output.as_deref(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputArgs;
    use crate::commands::fixtures;
    use crate::error::CliError;
    use qcore::engine::error::EngineError;
    use std::path::Path;
    use tempfile::tempdir;

    fn args(dir: &Path, from: &str, to: &str, cutoff: f64) -> TunnelArgs {
        TunnelArgs {
            common: InputArgs {
                input: fixtures::write_atoms(dir),
                chain: None,
                output: Some(dir.join("hops.csv")),
            },
            from: from.to_string(),
            to: to.to_string(),
            cutoff: Some(cutoff),
        }
    }

    #[test]
    fn writes_one_row_per_hop() {
        let dir = tempdir().unwrap();
        run(
            args(dir.path(), "A,1,N", "A,2,CA", 3.0),
            &FileConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let content = std::fs::read_to_string(dir.path().join("hops.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("step,from_id"));
        assert!(lines[1].starts_with("0,1,"));
        assert!(lines[2].starts_with("1,2,"));
    }

    #[test]
    fn unreachable_target_writes_no_rows() {
        let dir = tempdir().unwrap();
        run(
            args(dir.path(), "A,1,N", "B,200,ZN", 3.0),
            &FileConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let content = std::fs::read_to_string(dir.path().join("hops.csv")).unwrap();
        assert!(content.trim().is_empty());
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let dir = tempdir().unwrap();
        let result = run(
            args(dir.path(), "A,1,N", "C,9,CA", 3.0),
            &FileConfig::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(CliError::Core(EngineError::AtomNotFound { .. }))
        ));
    }
}
