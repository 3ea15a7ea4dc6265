//! §4.4: the cycle finder. A bounded depth-first search over the
//! topological sort's failure remainder, returning the vertices of
//! elementary cycles so the repair dispatcher (§4.5) can break them.

use crate::error::Error;
use crate::object::DumpId;
use crate::registry::Registry;

/// Per-invocation search state. `processed` and `search_failed` persist
/// across every start point tried within one call to `find_cycles`,
/// which is the whole point of the `search_failed` memoization: it is
/// keyed by the *start* dumpId rather than cleared to a boolean between
/// start points, avoiding an O(N^2) re-zeroing of the array (§9,
/// "Cycle memoization").
struct Search<'a> {
    registry: &'a Registry,
    max_dump_id: u32,
    /// True once a vertex is known cycle-free for this invocation, or
    /// has been consumed into an already-found cycle.
    processed: Vec<bool>,
    /// `search_failed[v] == start.0` means: proven, within this
    /// invocation, that no path exists from `v` back to `start`.
    search_failed: Vec<u32>,
}

impl<'a> Search<'a> {
    fn new(registry: &'a Registry, max_dump_id: u32) -> Self {
        Search {
            registry,
            max_dump_id,
            processed: vec![false; max_dump_id as usize],
            search_failed: vec![0; max_dump_id as usize],
        }
    }

    /// Try to find a path from `current` back to `start`, using `path`
    /// as both the accumulated route and (implicitly, via
    /// `in_path`) a visited set that prevents infinite recursion on
    /// cycles `start` is not part of. Edges are explored in
    /// declaration order, so shorter cycles tend to surface first.
    fn dfs(&mut self, current: DumpId, start: DumpId, path: &mut Vec<DumpId>, in_path: &mut Vec<bool>) -> bool {
        path.push(current);
        in_path[current.index()] = true;

        if let Some(obj) = self.registry.find_by_dump_id(current) {
            for &dep in &obj.dependencies {
                if dep.0 == 0 || dep.0 > self.max_dump_id {
                    continue;
                }
                if dep == start {
                    return true; // back-edge to the start: path is the cycle.
                }
                let di = dep.index();
                if self.processed[di] || self.search_failed[di] == start.0 || in_path[di] {
                    continue;
                }
                if self.dfs(dep, start, path, in_path) {
                    return true;
                }
            }
        }

        in_path[current.index()] = false;
        path.pop();
        self.search_failed[current.index()] = start.0;
        false
    }

    /// One elementary cycle starting and ending at `start`, if any
    /// exists that this invocation hasn't already accounted for.
    fn find_from(&mut self, start: DumpId) -> Option<Vec<DumpId>> {
        let mut path = Vec::new();
        let mut in_path = vec![false; self.max_dump_id as usize];
        if self.dfs(start, start, &mut path, &mut in_path) {
            Some(path)
        } else {
            None
        }
    }
}

/// Scan `remainder` (the topological sort's failure output) for
/// elementary cycles. Returns every *disjoint* cycle found in one pass:
/// once a cycle's vertices are consumed, later searches in the same
/// pass cannot route through them, so an overlapping second cycle is
/// simply not found here and is left for the next retry of §4.3 after
/// this pass's repairs are applied (§4.4, "only disjoint cycles are
/// repaired in one pass").
///
/// An empty result for a nonempty `remainder` indicates the search
/// state is corrupt relative to the sort's own failure signal, and is
/// reported as `Error::NoCycleFound` rather than silently looping.
pub fn find_cycles(remainder: &[DumpId], registry: &Registry, max_dump_id: u32) -> Result<Vec<Vec<DumpId>>, Error> {
    if remainder.is_empty() {
        return Ok(Vec::new());
    }

    let mut search = Search::new(registry, max_dump_id);
    let mut cycles = Vec::new();

    for &start in remainder {
        let si = start.index();
        if search.processed[si] {
            continue;
        }
        match search.find_from(start) {
            Some(cycle) => {
                for &v in &cycle {
                    search.processed[v.index()] = true;
                }
                cycles.push(cycle);
            }
            None => {
                search.processed[si] = true;
            }
        }
    }

    if cycles.is_empty() {
        return Err(Error::NoCycleFound {
            remainder: remainder.to_vec(),
        });
    }

    Ok(cycles)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::{Object, ObjectKind};

    #[test]
    fn direct_two_cycle() {
        let a = Object::new(DumpId(1), ObjectKind::Table, "v").with_dependencies([DumpId(2)]);
        let b = Object::new(DumpId(2), ObjectKind::Rule, "r").with_dependencies([DumpId(1)]);
        let reg = Registry::new(2, vec![a, b]);
        let cycles = find_cycles(&[DumpId(1), DumpId(2)], &reg, 2).unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0][0], DumpId(1));
    }

    #[test]
    fn self_loop() {
        let a = Object::new(DumpId(1), ObjectKind::Table, "t").with_dependencies([DumpId(1)]);
        let reg = Registry::new(1, vec![a]);
        let cycles = find_cycles(&[DumpId(1)], &reg, 1).unwrap();
        assert_eq!(cycles, vec![vec![DumpId(1)]]);
    }

    #[test]
    fn indirect_cycle_through_three_vertices() {
        let a = Object::new(DumpId(1), ObjectKind::Table, "a").with_dependencies([DumpId(2)]);
        let b = Object::new(DumpId(2), ObjectKind::Index, "b").with_dependencies([DumpId(3)]);
        let c = Object::new(DumpId(3), ObjectKind::Constraint, "c").with_dependencies([DumpId(1)]);
        let reg = Registry::new(3, vec![a, b, c]);
        let cycles = find_cycles(&[DumpId(1), DumpId(2), DumpId(3)], &reg, 3).unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
    }

    #[test]
    fn two_disjoint_cycles_both_found_in_one_pass() {
        let a = Object::new(DumpId(1), ObjectKind::Table, "a").with_dependencies([DumpId(2)]);
        let b = Object::new(DumpId(2), ObjectKind::Rule, "b").with_dependencies([DumpId(1)]);
        let c = Object::new(DumpId(3), ObjectKind::Table, "c").with_dependencies([DumpId(4)]);
        let d = Object::new(DumpId(4), ObjectKind::Rule, "d").with_dependencies([DumpId(3)]);
        let reg = Registry::new(4, vec![a, b, c, d]);
        let cycles = find_cycles(&[DumpId(1), DumpId(2), DumpId(3), DumpId(4)], &reg, 4).unwrap();
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn empty_remainder_yields_no_cycles_and_no_error() {
        let reg = Registry::new(0, vec![]);
        assert_eq!(find_cycles(&[], &reg, 0).unwrap(), Vec::<Vec<DumpId>>::new());
    }
}
