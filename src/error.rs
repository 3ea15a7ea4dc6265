//! §7: the three error classes the core can signal, plus the
//! defensive fourth class (non-convergence) this expansion adds. The
//! original aborted the whole dump process on class 1 and merely
//! logged classes 2 and 3; here every caller gets a typed `Result`
//! instead and decides for itself what "abort" means.

use crate::object::DumpId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dependency edge targets a `dumpId` outside `[1, maxDumpId]`.
    /// Invariant violation in the loader's output; fatal.
    #[error("dependency edge targets dumpId {dump_id}, outside the valid range")]
    InvalidDumpId { dump_id: DumpId },

    /// The cycle finder scanned a nonempty failure remainder and found
    /// no cycle at all. Per §4.4 this indicates corruption in the
    /// search itself (the topological sort said objects were blocked,
    /// but no back-edge could be traced among them).
    #[error("could not identify a dependency loop among {} blocked objects", remainder.len())]
    NoCycleFound { remainder: Vec<DumpId> },

    /// §4.5 row 16 was reached and `SortConfig::on_unresolved_loop` is
    /// `Fail`: the dispatcher found a cycle matching no known repair
    /// pattern and the caller asked to abort rather than break an edge
    /// arbitrarily and proceed.
    #[error("could not resolve dependency loop among {} objects and on_unresolved_loop is Fail", objects.len())]
    UnresolvedLoop { objects: Vec<DumpId> },

    /// The repair loop exceeded `SortConfig::max_repair_passes` without
    /// converging. Should be unreachable given the monotonic
    /// edge-reduction invariant of §4.5; reported rather than looping
    /// forever in case a future repair pattern breaks that invariant.
    #[error("dependency repair did not converge after {passes} passes")]
    RepairDidNotConverge { passes: usize },
}
