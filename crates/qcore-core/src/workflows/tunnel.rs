use crate::core::models::structure::Structure;
use crate::engine::config::TunnelingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::spatial::AtomKdTree;
use crate::engine::tunneling::{self, AtomSpec, TunnelPath};
use tracing::{debug, info, instrument};

fn resolve(structure: &Structure, raw: &str) -> Result<usize, EngineError> {
    let spec: AtomSpec = raw.parse()?;
    tunneling::resolve_atom(structure, &spec).ok_or_else(|| EngineError::AtomNotFound {
        spec: spec.to_string(),
    })
}

/// Finds the cheapest tunneling path between two atoms given as `chain,residue,atom` specs.
///
/// Both endpoints are resolved before any search runs; a spec that matches no atom is an
/// [`EngineError::AtomNotFound`]. A missing path is reported through `found == false`.
#[instrument(skip_all, name = "tunneling_workflow")]
pub fn run<'a>(
    structure: &'a Structure,
    from: &str,
    to: &str,
    config: &TunnelingConfig,
    reporter: &ProgressReporter,
) -> Result<TunnelPath<'a>, EngineError> {
    let start = resolve(structure, from)?;
    let end = resolve(structure, to)?;

    let path = reporter.phase("Tunneling Search", || {
        let index = AtomKdTree::build(structure.atoms());
        debug!(points = structure.len(), cutoff = config.cutoff, "Neighbour index built.");
        tunneling::find_path(structure, &index, start, end, config.cutoff)
    })?;

    if path.found {
        info!(
            start = %path.start_spec,
            end = %path.end_spec,
            hops = path.hops.len(),
            total_cost = path.total_cost,
            "Tunneling path found."
        );
    } else {
        info!(
            start = %path.start_spec,
            end = %path.end_spec,
            direct_distance = path.direct_distance,
            "No tunneling path within cutoff."
        );
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn chain_of_carbons() -> Structure {
        Structure::new(
            (0..5)
                .map(|n| {
                    Atom::new(
                        n + 1,
                        "CA",
                        "GLY",
                        "A",
                        n as i32 + 1,
                        Point3::new(n as f64 * 3.0, 0.0, 0.0),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn walks_along_a_chain_of_atoms() {
        let s = chain_of_carbons();
        let path = run(&s, "A,1,CA", "A,5,CA", &TunnelingConfig::default(), &ProgressReporter::new()).unwrap();
        assert!(path.found);
        assert_eq!(path.atoms.len(), 5);
        assert_eq!(path.hops.len(), 4);
        assert!((path.total_cost - 12.0).abs() < 1e-12);
        assert_eq!(path.direct_distance, 12.0);
    }

    #[test]
    fn short_cutoff_leaves_target_unreachable() {
        let s = chain_of_carbons();
        let config = TunnelingConfig { cutoff: 2.0 };
        let path = run(&s, "A,1,CA", "A,5,CA", &config, &ProgressReporter::new()).unwrap();
        assert!(!path.found);
        assert_eq!(path.direct_distance, 12.0);
        assert!(path.hops.is_empty());
    }

    #[test]
    fn unknown_endpoint_is_not_found_error() {
        let s = chain_of_carbons();
        let result = run(&s, "A,1,CA", "B,9,CA", &TunnelingConfig::default(), &ProgressReporter::new());
        assert_eq!(
            result.unwrap_err(),
            EngineError::AtomNotFound {
                spec: "B,9,CA".to_string()
            }
        );
    }

    #[test]
    fn malformed_endpoint_is_validation_error() {
        let s = chain_of_carbons();
        let result = run(&s, "A-1-CA", "A,5,CA", &TunnelingConfig::default(), &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::InvalidAtomSpec { .. })));
    }
}
