//! §4.8a: the handful of knobs this core legitimately owns. Not a
//! general settings system — just the two things a caller might
//! reasonably want to override.

/// What to do when the repair dispatcher reaches §4.5 row 16 (no
/// pattern matched any found cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedLoopPolicy {
    /// Match the original: warn, break one edge arbitrarily, and let
    /// the sort proceed. The resulting script may need manual repair
    /// at restore time.
    WarnAndBreakArbitrarily,
    /// Abort the sort with `Error::UnresolvedLoop` instead.
    Fail,
}

impl Default for UnresolvedLoopPolicy {
    fn default() -> Self {
        UnresolvedLoopPolicy::WarnAndBreakArbitrarily
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SortConfig {
    pub on_unresolved_loop: UnresolvedLoopPolicy,
    /// Ceiling on retries of the topological-sort/repair loop before
    /// giving up with `Error::RepairDidNotConverge`. Each retry is
    /// supposed to strictly shrink some cycle's edge count, so this
    /// should never bind in practice; it exists as a corruption guard.
    pub max_repair_passes: usize,
}

impl SortConfig {
    /// A ceiling proportional to `object_count`, generous enough that
    /// only a genuine violation of the monotonic-progress invariant
    /// could exhaust it.
    pub fn with_object_count(object_count: usize) -> Self {
        SortConfig {
            on_unresolved_loop: UnresolvedLoopPolicy::default(),
            max_repair_passes: (object_count.max(1)) * 4,
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            on_unresolved_loop: UnresolvedLoopPolicy::default(),
            max_repair_passes: 4096,
        }
    }
}
