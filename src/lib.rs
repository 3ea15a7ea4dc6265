//! Deterministic emission ordering for heterogeneous database dump
//! objects: a type/name pre-sort (§4.2) followed by a dependency-aware
//! topological sort (§4.3) that repairs any cycle it finds (§4.4, §4.5)
//! and retries until every object is placed.
//!
//! The two entry points are [`sort_by_type_name`] and
//! [`sort_dependency_aware`]. Everything else is public so callers can
//! build their own catalog loader against [`Registry`] and [`Object`],
//! but the two functions above are the whole of §6's contract.

pub mod comparator;
pub mod config;
pub mod context;
pub mod cycle;
pub mod diagnostics;
pub mod error;
pub mod object;
pub mod priority;
pub mod registry;
pub mod repair;
pub mod toposort;

pub use comparator::sort_by_type_name;
pub use config::{SortConfig, UnresolvedLoopPolicy};
pub use context::SortContext;
pub use error::Error;
pub use object::{
    CatalogId, ConstraintKind, DumpComponents, DumpId, Object, ObjectData, ObjectKind, OprKind, RelKind,
};
pub use registry::Registry;

use toposort::Outcome;

/// Result of a successful [`sort_dependency_aware`] call: the emission
/// order, plus any warnings raised while repairing loops the sort
/// encountered along the way. Row 15 (circular FK among table data)
/// always warns, since it is a repaired-but-notable cycle, not an
/// unresolved one. Row 16 (no pattern matched) warns only when
/// `config.on_unresolved_loop` is `WarnAndBreakArbitrarily`; under
/// `Fail` it instead surfaces as `Error::UnresolvedLoop`.
pub struct SortResult {
    pub order: Vec<DumpId>,
    pub warnings: Vec<String>,
}

/// §6's main entry point: pre-sort `objects` by type/name, then run the
/// dependency-aware topological sort, repairing and retrying until
/// every object is placed or `config.max_repair_passes` is exceeded.
///
/// `pre_boundary` and `post_boundary` are the dumpIds of the two
/// boundary pseudo-objects (§3); they must already be present in
/// `registry` with [`ObjectKind::PreDataBoundary`] /
/// [`ObjectKind::PostDataBoundary`] respectively.
pub fn sort_dependency_aware(
    objects: &mut Vec<Object>,
    registry: &mut Registry,
    pre_boundary: DumpId,
    post_boundary: DumpId,
    config: SortConfig,
) -> Result<SortResult, Error> {
    sort_by_type_name(objects, registry);
    let max_dump_id = registry.max_dump_id();
    let input: Vec<DumpId> = objects.iter().map(|o| o.dump_id).collect();
    let mut warnings = Vec::new();

    for pass in 0..config.max_repair_passes {
        let span = tracing::debug_span!("sort_attempt", pass, objects = input.len());
        let _enter = span.enter();

        match toposort::sort_dependency_aware_once(&input, registry, max_dump_id)? {
            Outcome::Sorted(order) => {
                tracing::debug!(pass, "dependency-aware sort converged");
                // §6: the input array is reordered in place to the safe
                // emission order. Re-read each object from `registry`
                // rather than the caller's stale pre-sorted `objects`,
                // so flag mutations repair applied (separate,
                // dummy_view, postponed_def, the shell-type dump-flag
                // promotion, ...) are reflected in the output too.
                *objects = order
                    .iter()
                    .map(|&id| {
                        registry
                            .find_by_dump_id(id)
                            .cloned()
                            .expect("sorted order only contains dumpIds present in the registry")
                    })
                    .collect();
                return Ok(SortResult { order, warnings });
            }
            Outcome::Blocked(remainder) => {
                tracing::debug!(pass, blocked = remainder.len(), "sort blocked, searching for cycles");
                let cycles = cycle::find_cycles(&remainder, registry, max_dump_id)?;
                let mut ctx = SortContext {
                    registry,
                    pre_boundary,
                    post_boundary,
                    config,
                };
                for found in &cycles {
                    let applied = repair::apply(found, &mut ctx);
                    match (applied.warning, applied.unresolved) {
                        (Some(warning), true) => {
                            // §4.5 row 16 only: no known pattern matched.
                            match config.on_unresolved_loop {
                                UnresolvedLoopPolicy::Fail => {
                                    return Err(Error::UnresolvedLoop { objects: found.clone() });
                                }
                                UnresolvedLoopPolicy::WarnAndBreakArbitrarily => {
                                    tracing::warn!(pattern = applied.pattern, "{}", warning);
                                    warnings.push(warning);
                                }
                            }
                        }
                        (Some(warning), false) => {
                            // §4.5 row 15: the cycle was repaired, but the
                            // circular FK it repaired around is still
                            // user-visible and never fatal, regardless of
                            // `on_unresolved_loop`.
                            tracing::warn!(pattern = applied.pattern, "{}", warning);
                            warnings.push(warning);
                        }
                        (None, _) => {
                            tracing::debug!(pattern = applied.pattern, "repaired a dependency loop");
                        }
                    }
                }
            }
        }
    }

    Err(Error::RepairDidNotConverge {
        passes: config.max_repair_passes,
    })
}
