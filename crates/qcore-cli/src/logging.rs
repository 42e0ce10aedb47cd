use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive that replaces the `-v`/`-q` level.
pub const LOG_ENV_VAR: &str = "QCORE_LOG";

pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Blank directives fall back to the flag level; malformed ones are skipped.
fn build_filter(level: LevelFilter, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.map(str::trim).unwrap_or_default())
}

/// Installs the global subscriber: compact lines on stderr, plus a plain-text copy with
/// thread ids when `log_file` is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let directives = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(level_for(verbosity, quiet), directives.as_deref());

    let file_layer = log_file
        .map(|path| {
            File::create(&path).map(|file| {
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_thread_ids(true)
            })
        })
        .transpose()
        .map_err(CliError::Io)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, info, warn};

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    fn blank_directive_keeps_the_flag_level() {
        assert_eq!(
            build_filter(LevelFilter::INFO, Some("   ")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            build_filter(LevelFilter::WARN, None).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn module_directive_can_raise_one_target() {
        let filter = build_filter(LevelFilter::WARN, Some("qcore::engine=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
        assert!(filter.to_string().contains("qcore::engine=trace"));
    }

    #[test]
    #[serial]
    fn file_copy_is_plain_text_with_thread_ids() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("qcore.log");
        let file = File::create(&log_path).unwrap();

        let subscriber = tracing_subscriber::registry()
            .with(build_filter(LevelFilter::INFO, None))
            .with(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_thread_ids(true),
            );
        tracing::subscriber::with_default(subscriber, || {
            warn!(cutoff = 3.5, "Tunneling target unreachable.");
            info!(cells = 8, "Grid analysis complete.");
            debug!("Grid bounds resolved.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Tunneling target unreachable. cutoff=3.5"));
        assert!(content.contains("Grid analysis complete. cells=8"));
        assert!(!content.contains("Grid bounds resolved."));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
