//! §4.3: the priority-queue topological sort. Kahn's algorithm run in
//! reverse, selecting the highest-input-index ready candidate at each
//! step so the result disturbs the type/name pre-sort as little as
//! possible.

use crate::error::Error;
use crate::object::DumpId;
use crate::registry::Registry;
use std::collections::BinaryHeap;

/// What came out of one topological-sort attempt.
pub enum Outcome {
    /// Every object was placed; this is the safe emission order.
    Sorted(Vec<DumpId>),
    /// The heap emptied before every slot was filled. These are the
    /// objects still carrying a nonzero "depended upon by" count —
    /// participants in, or downstream of, at least one cycle.
    Blocked(Vec<DumpId>),
}

/// Validate that every dependency edge among `input`'s objects targets
/// a `dumpId` within `[1, max_dump_id]`. A target outside that range is
/// fatal per §4.3's edge cases; a target inside the range but not
/// present in `input` is fine (it simply contributes to no counter).
fn validate_edges(input: &[DumpId], registry: &Registry, max_dump_id: u32) -> Result<(), Error> {
    for &id in input {
        let Some(obj) = registry.find_by_dump_id(id) else {
            continue;
        };
        for &dep in &obj.dependencies {
            if dep.0 == 0 || dep.0 > max_dump_id {
                return Err(Error::InvalidDumpId { dump_id: dep });
            }
        }
    }
    Ok(())
}

/// One attempt at §4.3's algorithm over `input`, which must already be
/// in the caller's preferred (type/name) order.
pub fn sort_dependency_aware_once(
    input: &[DumpId],
    registry: &Registry,
    max_dump_id: u32,
) -> Result<Outcome, Error> {
    if input.is_empty() {
        return Ok(Outcome::Sorted(Vec::new()));
    }

    validate_edges(input, registry, max_dump_id)?;

    // dumpId -> index into `input`, for ids actually present here.
    let mut index_of: Vec<Option<usize>> = vec![None; max_dump_id as usize];
    for (i, &id) in input.iter().enumerate() {
        index_of[id.index()] = Some(i);
    }

    // beforeConstraints[i] = number of other `input` objects that
    // depend on input[i] (indegree with edges inverted for emission).
    let mut before_constraints: Vec<u32> = vec![0; input.len()];
    for (i, &id) in input.iter().enumerate() {
        let Some(obj) = registry.find_by_dump_id(id) else {
            continue;
        };
        for &dep in &obj.dependencies {
            if let Some(dep_idx) = index_of[dep.index()] {
                before_constraints[dep_idx] += 1;
            }
        }
        let _ = i;
    }

    let mut heap: BinaryHeap<usize> = (0..input.len())
        .filter(|&i| before_constraints[i] == 0)
        .collect();

    let mut output: Vec<Option<DumpId>> = vec![None; input.len()];
    let mut fill = input.len();

    while let Some(idx) = heap.pop() {
        fill -= 1;
        output[fill] = Some(input[idx]);

        let Some(obj) = registry.find_by_dump_id(input[idx]) else {
            continue;
        };
        for &dep in &obj.dependencies {
            if let Some(dep_idx) = index_of[dep.index()] {
                before_constraints[dep_idx] -= 1;
                if before_constraints[dep_idx] == 0 {
                    heap.push(dep_idx);
                }
            }
        }
    }

    if fill == 0 {
        Ok(Outcome::Sorted(output.into_iter().map(|o| o.unwrap()).collect()))
    } else {
        let blocked = (0..input.len())
            .filter(|&i| before_constraints[i] > 0)
            .map(|i| input[i])
            .collect();
        Ok(Outcome::Blocked(blocked))
    }
}
