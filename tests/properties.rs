//! §8 universal properties, quickcheck-driven where the property is
//! about permutation-invariance rather than a fixed scenario.

use dump_sort::{sort_dependency_aware, DumpId, Object, ObjectData, ObjectKind, RelKind, Registry, SortConfig};
use quickcheck::{Gen, QuickCheck, TestResult};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A small acyclic chain `schema -> table_1 -> table_2 -> ... -> table_n`,
/// built fresh each call so quickcheck can vary `n` and the shuffle seed.
fn acyclic_chain(n: u8) -> Vec<Object> {
    let n = (n % 8) as u32 + 1;
    let mut objects = vec![Object::new(DumpId(1), ObjectKind::Schema, "s")];
    for i in 0..n {
        let id = DumpId(2 + i);
        let deps = if i == 0 { vec![DumpId(1)] } else { vec![DumpId(1 + i)] };
        objects.push(
            Object::new(id, ObjectKind::Table, format!("t{i}"))
                .with_schema(DumpId(1))
                .with_dependencies(deps)
                .with_data(ObjectData::Table {
                    relkind: RelKind::OrdinaryTable,
                    dummy_view: false,
                    postponed_def: false,
                }),
        );
    }
    objects
}

fn pre_post(max_id: u32) -> (Object, Object, u32) {
    let pre = Object::new(DumpId(max_id + 1), ObjectKind::PreDataBoundary, "");
    let post = Object::new(DumpId(max_id + 2), ObjectKind::PostDataBoundary, "");
    (pre, post, max_id + 2)
}

fn run(mut objects: Vec<Object>, seed: u64) -> Vec<DumpId> {
    let base_max = objects.iter().map(|o| o.dump_id.0).max().unwrap_or(0);
    let (pre, post, max_id) = pre_post(base_max);
    objects.push(pre.clone());
    objects.push(post.clone());

    let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
    objects.shuffle(&mut rng);

    let mut registry = Registry::new(max_id, objects.clone());
    sort_dependency_aware(&mut objects, &mut registry, pre.dump_id, post.dump_id, SortConfig::default())
        .unwrap()
        .order
}

#[test]
fn acyclic_chain_sort_is_permutation_invariant_under_shuffle() {
    fn prop(n: u8, seed_a: u64, seed_b: u64) -> TestResult {
        let chain = acyclic_chain(n);
        let a = run(chain.clone(), seed_a);
        let b = run(chain, seed_b);
        TestResult::from_bool(a == b)
    }
    QuickCheck::new()
        .gen(Gen::new(20))
        .tests(50)
        .quickcheck(prop as fn(u8, u64, u64) -> TestResult);
}

#[test]
fn acyclic_chain_output_respects_every_dependency_edge() {
    fn prop(n: u8, seed: u64) -> TestResult {
        let chain = acyclic_chain(n);
        let deps: Vec<(DumpId, DumpId)> = chain
            .iter()
            .flat_map(|o| o.dependencies.iter().map(move |&d| (o.dump_id, d)))
            .collect();
        let order = run(chain, seed);
        let pos = |id: DumpId| order.iter().position(|&x| x == id).unwrap();
        for (a, b) in deps {
            if pos(b) >= pos(a) {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
    QuickCheck::new()
        .gen(Gen::new(20))
        .tests(50)
        .quickcheck(prop as fn(u8, u64) -> TestResult);
}

#[test]
fn priority_table_is_complete_at_the_integration_boundary() {
    assert_eq!(ObjectKind::ALL.len(), 48);
}
