use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Q-Core CLI - spatial queries, grid partitioning and tunneling paths over atomic structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Optional TOML file supplying defaults for contact, grid and tunneling parameters
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select atoms whose field matches a value (numeric fields compare exactly).
    Search(SearchArgs),
    /// Select atoms whose coordinate on one axis lies in an inclusive range.
    Range(RangeArgs),
    /// Select atoms inside an axis-aligned box.
    Box(BoxArgs),
    /// List every atom pair within a distance cutoff.
    Contacts(ContactsArgs),
    /// Partition the structure into a grid and report per-cell statistics.
    Grid(GridArgs),
    /// Find the cheapest tunneling path between two atoms.
    Tunnel(TunnelArgs),
    /// Summarize the structure by residue, chain or element.
    Summary(SummaryArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the input atom table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Restrict the analysis to a single chain (matched case-insensitively).
    #[arg(long, value_name = "ID")]
    pub chain: Option<String>,

    /// Write the CSV report here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Field to match (e.g. 'name', 'residue', 'chain', 'resi', 'element', 'x').
    #[arg(short, long, required = true, value_name = "FIELD")]
    pub field: String,

    /// Value to compare against.
    #[arg(long, required = true, value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Axis to filter on (x, y or z).
    #[arg(short, long, required = true, value_name = "AXIS")]
    pub axis: String,

    /// One end of the range.
    #[arg(long, required = true, value_name = "FLOAT", allow_hyphen_values = true)]
    pub from: String,

    /// The other end of the range; the ends may be given in either order.
    #[arg(long, required = true, value_name = "FLOAT", allow_hyphen_values = true)]
    pub to: String,
}

#[derive(Args, Debug)]
pub struct BoxArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// First corner of the box.
    #[arg(long, required = true, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub min: String,

    /// Opposite corner of the box.
    #[arg(long, required = true, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub max: String,

    /// Widen the selection to every atom of each touched residue.
    #[arg(long)]
    pub complete_residues: bool,
}

#[derive(Args, Debug)]
pub struct ContactsArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Maximum separation in Å. Overrides `contacts.max-distance` from the config file.
    #[arg(short = 'd', long, value_name = "FLOAT")]
    pub max_distance: Option<f64>,

    /// Skip pairs involving a hydrogen atom.
    #[arg(long)]
    pub ignore_hydrogens: bool,

    /// Skip pairs whose atoms share a residue.
    #[arg(long)]
    pub exclude_same_residue: bool,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Number of cells along x, y and z. Overrides `grid.counts` from the config file.
    #[arg(short = 'n', long, value_name = "NX,NY,NZ")]
    pub counts: Option<String>,

    /// Widen each cell's membership to whole residues.
    #[arg(long)]
    pub complete_residues: bool,

    /// Compute van der Waals voxel occupancy per cell.
    #[arg(long)]
    pub physical: bool,

    /// How overlapping atom spheres are counted in physical mode.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<OccupancyModeArg>,

    /// Edge length of an occupancy voxel in Å.
    #[arg(long, value_name = "FLOAT")]
    pub voxel_size: Option<f64>,

    /// Extra margin in Å added to the largest van der Waals radius when expanding the box.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub padding: Option<f64>,

    /// Keep the tight atom bounds instead of expanding them in physical mode.
    #[arg(long)]
    pub no_expand: bool,

    /// Report the member atoms of a single cell instead of the statistics table.
    #[arg(long, value_name = "I,J,K")]
    pub cell: Option<String>,
}

#[derive(Args, Debug)]
pub struct TunnelArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Start atom as 'CHAIN,RESI[ICODE],NAME' (e.g. 'A,42,CA').
    #[arg(long, required = true, value_name = "SPEC")]
    pub from: String,

    /// End atom as 'CHAIN,RESI[ICODE],NAME'.
    #[arg(long, required = true, value_name = "SPEC")]
    pub to: String,

    /// Maximum hop distance in Å. Overrides `tunneling.cutoff` from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: InputArgs,

    /// Grouping for the summary rows.
    #[arg(long, value_enum, default_value_t = SummaryKind::Residue)]
    pub by: SummaryKind,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Residue,
    Chain,
    Element,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyModeArg {
    Union,
    Sum,
}
