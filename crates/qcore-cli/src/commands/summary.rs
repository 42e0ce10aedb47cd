use super::{load_structure, write_report};
use crate::cli::{SummaryArgs, SummaryKind};
use crate::error::Result;
use qcore::core::models::atom::Atom;
use qcore::engine::summary;
use tracing::info;

pub fn run(args: SummaryArgs) -> Result<()> {
    let structure = load_structure(&args.common)?;
    let atoms: Vec<&Atom> = structure.atoms().iter().collect();
    let output = args.common.output.as_deref();

    let rows = match args.by {
        SummaryKind::Residue => write_report(
            summary::residue_summaries(&atoms).iter().map(|r| r.to_row()),
            output,
        )?,
        SummaryKind::Chain => write_report(
            summary::chain_summaries(&atoms).iter().map(|c| c.to_row()),
            output,
        )?,
        SummaryKind::Element => write_report(
            summary::composition_rows(&summary::element_composition(&atoms)),
            output,
        )?,
    };
    info!(by = ?args.by, rows, "Summary written.");
    Ok(())
}
