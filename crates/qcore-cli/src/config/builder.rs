use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{ContactsArgs, GridArgs, OccupancyModeArg, TunnelArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use qcore::engine::config::{
    GridConfig, GridConfigBuilder, OccupancyMode, PhysicalConfig, ProximityOptions,
    TunnelingConfig,
};

impl From<OccupancyModeArg> for OccupancyMode {
    fn from(arg: OccupancyModeArg) -> Self {
        match arg {
            OccupancyModeArg::Union => OccupancyMode::Union,
            OccupancyModeArg::Sum => OccupancyMode::Sum,
        }
    }
}

/// A set flag wins; an unset flag defers to the file, then the default.
fn merge_flag(cli: bool, file: Option<bool>, default: bool) -> bool {
    cli || file.unwrap_or(default)
}

pub fn build_contact_options(args: &ContactsArgs, file: &FileConfig) -> ProximityOptions {
    let defaults = DefaultsConfig::default();
    let contacts = file.contacts.clone().unwrap_or_default();

    ProximityOptions {
        max_distance: args
            .max_distance
            .or(contacts.max_distance)
            .unwrap_or(defaults.max_distance),
        ignore_hydrogens: merge_flag(
            args.ignore_hydrogens,
            contacts.ignore_hydrogens,
            defaults.ignore_hydrogens,
        ),
        exclude_same_residue: merge_flag(
            args.exclude_same_residue,
            contacts.exclude_same_residue,
            defaults.exclude_same_residue,
        ),
    }
}

pub fn build_grid_config(args: &GridArgs, file: &FileConfig) -> Result<GridConfig> {
    let defaults = DefaultsConfig::default();
    let grid = file.grid.clone().unwrap_or_default();
    let physical_file = grid.physical.clone().unwrap_or_default();

    let counts = match args.counts.as_deref() {
        Some(raw) => parser::parse_triplet::<usize>(raw, "grid counts")
            .map_err(|e| CliError::Argument(e.to_string()))?,
        None => grid.counts.ok_or_else(|| {
            CliError::Config(
                "Grid counts are required either via --counts or `grid.counts` in the config file."
                    .to_string(),
            )
        })?,
    };

    let mut builder = GridConfigBuilder::new()
        .counts(counts[0], counts[1], counts[2])
        .complete_residues(merge_flag(
            args.complete_residues,
            grid.complete_residues,
            defaults.complete_residues,
        ));

    if merge_flag(args.physical, physical_file.enabled, defaults.physical) {
        let mode = match (args.mode, physical_file.mode.as_deref()) {
            (Some(mode), _) => mode.into(),
            (None, Some(raw)) => raw
                .parse::<OccupancyMode>()
                .map_err(|e| CliError::Config(e.to_string()))?,
            (None, None) => defaults.mode,
        };
        let expand_bounds = if args.no_expand {
            false
        } else {
            physical_file.expand_bounds.unwrap_or(defaults.expand_bounds)
        };
        builder = builder.physical(PhysicalConfig {
            voxel_size: args
                .voxel_size
                .or(physical_file.voxel_size)
                .unwrap_or(defaults.voxel_size),
            padding: args
                .padding
                .or(physical_file.padding)
                .unwrap_or(defaults.padding),
            expand_bounds,
            mode,
        });
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

pub fn build_tunneling_config(args: &TunnelArgs, file: &FileConfig) -> TunnelingConfig {
    let defaults = DefaultsConfig::default();
    let cutoff = args
        .cutoff
        .or(file.tunneling.as_ref().and_then(|t| t.cutoff))
        .unwrap_or(defaults.tunneling_cutoff);
    TunnelingConfig { cutoff }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::config::file::{FileGridConfig, FilePhysicalConfig, FileTunnelingConfig};
    use clap::Parser;

    fn grid_args(extra: &[&str]) -> GridArgs {
        let mut argv = vec!["qcore", "grid", "-i", "atoms.csv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Grid(args) => args,
            other => panic!("expected grid subcommand, got {:?}", other),
        }
    }

    fn contacts_args(extra: &[&str]) -> ContactsArgs {
        let mut argv = vec!["qcore", "contacts", "-i", "atoms.csv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Contacts(args) => args,
            other => panic!("expected contacts subcommand, got {:?}", other),
        }
    }

    fn file_with_grid(grid: FileGridConfig) -> FileConfig {
        FileConfig {
            grid: Some(grid),
            ..Default::default()
        }
    }

    #[test]
    fn contact_defaults_apply_without_file_or_flags() {
        let options = build_contact_options(&contacts_args(&[]), &FileConfig::default());
        assert_eq!(options, ProximityOptions::default());
    }

    #[test]
    fn contact_flag_overrides_file_distance() {
        let file: FileConfig =
            toml::from_str("[contacts]\nmax-distance = 2.5\nexclude-same-residue = true\n")
                .unwrap();
        let options = build_contact_options(&contacts_args(&["--max-distance", "6"]), &file);
        assert_eq!(options.max_distance, 6.0);
        assert!(options.exclude_same_residue);
        assert!(!options.ignore_hydrogens);
    }

    #[test]
    fn grid_counts_come_from_file_when_flag_absent() {
        let file = file_with_grid(FileGridConfig {
            counts: Some([3, 2, 1]),
            ..Default::default()
        });
        let config = build_grid_config(&grid_args(&[]), &file).unwrap();
        assert_eq!(config.counts, [3, 2, 1]);
        assert!(config.physical.is_none());
    }

    #[test]
    fn grid_counts_flag_wins_over_file() {
        let file = file_with_grid(FileGridConfig {
            counts: Some([3, 2, 1]),
            ..Default::default()
        });
        let config = build_grid_config(&grid_args(&["--counts", "5,5,5"]), &file).unwrap();
        assert_eq!(config.counts, [5, 5, 5]);
    }

    #[test]
    fn missing_grid_counts_is_a_config_error() {
        let result = build_grid_config(&grid_args(&[]), &FileConfig::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_counts_are_an_argument_error() {
        let result = build_grid_config(&grid_args(&["--counts", "2,2"]), &FileConfig::default());
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn physical_settings_merge_flag_file_and_defaults() {
        let file = file_with_grid(FileGridConfig {
            counts: Some([1, 1, 1]),
            complete_residues: None,
            physical: Some(FilePhysicalConfig {
                enabled: None,
                voxel_size: Some(0.25),
                padding: Some(1.0),
                expand_bounds: Some(true),
                mode: Some("sum".to_string()),
            }),
        });
        let config = build_grid_config(
            &grid_args(&["--physical", "--mode", "union", "--no-expand"]),
            &file,
        )
        .unwrap();
        let physical = config.physical.unwrap();
        assert_eq!(physical.voxel_size, 0.25);
        assert_eq!(physical.padding, 1.0);
        assert!(!physical.expand_bounds);
        assert_eq!(physical.mode, OccupancyMode::Union);
    }

    #[test]
    fn physical_mode_can_be_enabled_from_file_alone() {
        let file = file_with_grid(FileGridConfig {
            counts: Some([1, 1, 1]),
            complete_residues: Some(true),
            physical: Some(FilePhysicalConfig {
                enabled: Some(true),
                ..Default::default()
            }),
        });
        let config = build_grid_config(&grid_args(&[]), &file).unwrap();
        assert!(config.complete_residues);
        assert_eq!(config.physical, Some(PhysicalConfig::default()));
    }

    #[test]
    fn unknown_mode_in_file_is_rejected() {
        let file = file_with_grid(FileGridConfig {
            counts: Some([1, 1, 1]),
            complete_residues: None,
            physical: Some(FilePhysicalConfig {
                enabled: Some(true),
                mode: Some("max".to_string()),
                ..Default::default()
            }),
        });
        let result = build_grid_config(&grid_args(&[]), &file);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_voxel_size_surfaces_builder_error() {
        let result = build_grid_config(
            &grid_args(&["--counts", "1,1,1", "--physical", "--voxel-size", "0"]),
            &FileConfig::default(),
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn tunneling_cutoff_precedence() {
        let args = match Cli::parse_from([
            "qcore", "tunnel", "-i", "a.csv", "--from", "A,1,CA", "--to", "A,2,CA",
        ])
        .command
        {
            Commands::Tunnel(args) => args,
            other => panic!("expected tunnel subcommand, got {:?}", other),
        };
        assert_eq!(build_tunneling_config(&args, &FileConfig::default()).cutoff, 4.5);

        let file = FileConfig {
            tunneling: Some(FileTunnelingConfig { cutoff: Some(6.0) }),
            ..Default::default()
        };
        assert_eq!(build_tunneling_config(&args, &file).cutoff, 6.0);
    }
}
