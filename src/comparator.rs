//! §4.2: the type/name comparator. A total order over objects used to
//! produce the *preferred* emission order before the dependency graph
//! is consulted at all.

use crate::object::{ConstraintKind, Object, ObjectData, ObjectKind};
use crate::priority::priority_of;
use crate::registry::{access_method_name, type_sort_key, Registry};
use std::cmp::Ordering;

/// Compare two objects per the §4.2 lexicographic key. Never panics:
/// a failed recursive lookup (type or access method not found) is
/// treated as an inconclusive column and deferred to the next key,
/// per the contract in §4.2's closing paragraph.
pub fn compare_type_name(lhs: &Object, rhs: &Object, registry: &Registry) -> Ordering {
    // 1. Priority, ascending.
    let ord = priority_of(lhs.kind).cmp(&priority_of(rhs.kind));
    if ord != Ordering::Equal {
        return ord;
    }

    // 2. Schema name; NULL schemas sort after non-NULL.
    let ord = compare_schema(lhs, rhs, registry);
    if ord != Ordering::Equal {
        return ord;
    }

    // 3. Object name, byte-wise.
    let ord = lhs.name.as_bytes().cmp(rhs.name.as_bytes());
    if ord != Ordering::Equal {
        return ord;
    }

    // 4. Kind, to break ties between kinds sharing a priority band.
    let ord = lhs.kind.tie_rank().cmp(&rhs.kind.tie_rank());
    if ord != Ordering::Equal {
        return ord;
    }

    // 5. Kind-specific natural-key tail.
    let ord = compare_natural_key_tail(lhs, rhs, registry);
    if ord != Ordering::Equal {
        return ord;
    }

    // 6. Final fallback: catalog OID. Reaching this indicates either a
    // genuine tie (two objects the catalog cannot otherwise tell apart
    // within this run) or catalog corruption; either way we must still
    // return a stable result rather than assert in production.
    debug_assert!(
        lhs.dump_id == rhs.dump_id || lhs.catalog_id.oid != rhs.catalog_id.oid,
        "comparator exhausted every key without distinguishing {:?} from {:?}",
        lhs.dump_id,
        rhs.dump_id,
    );
    lhs.catalog_id.oid.cmp(&rhs.catalog_id.oid)
}

fn compare_schema(lhs: &Object, rhs: &Object, registry: &Registry) -> Ordering {
    let lhs_name = lhs.schema.and_then(|s| registry.find_by_dump_id(s)).map(|s| &s.name);
    let rhs_name = rhs.schema.and_then(|s| registry.find_by_dump_id(s)).map(|s| &s.name);
    match (lhs_name, rhs_name) {
        (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_natural_key_tail(lhs: &Object, rhs: &Object, registry: &Registry) -> Ordering {
    match (&lhs.data, &rhs.data) {
        (ObjectData::Function { arg_types: l }, ObjectData::Function { arg_types: r })
        | (ObjectData::Aggregate { arg_types: l }, ObjectData::Aggregate { arg_types: r }) => {
            compare_arity_then_arg_types(l, r, registry)
        }
        (
            ObjectData::Operator {
                oprkind: lk,
                left_type: ll,
                right_type: lr,
            },
            ObjectData::Operator {
                oprkind: rk,
                left_type: rl,
                right_type: rr,
            },
        ) => {
            // Reversed oprkind: 'l' (prefix) < 'r' (postfix) < 'b' (infix).
            let ord = lk.cmp(rk);
            if ord != Ordering::Equal {
                return ord;
            }
            let ord = compare_optional_type(*ll, *rl, registry);
            if ord != Ordering::Equal {
                return ord;
            }
            compare_optional_type(*lr, *rr, registry)
        }
        (
            ObjectData::OpClassOrFamily {
                access_method_oid: l,
            },
            ObjectData::OpClassOrFamily {
                access_method_oid: r,
            },
        ) => {
            let l_name = access_method_name(registry, *l);
            let r_name = access_method_name(registry, *r);
            compare_optional_string(l_name, r_name)
        }
        (ObjectData::Collation { encoding: l }, ObjectData::Collation { encoding: r }) => l.cmp(r),
        (ObjectData::AttrDef { adnum: l, .. }, ObjectData::AttrDef { adnum: r, .. }) => l.cmp(r),
        (ObjectData::Policy { policy_table: l }, ObjectData::Policy { policy_table: r })
        | (ObjectData::Rule { rule_table: l, .. }, ObjectData::Rule { rule_table: r, .. })
        | (ObjectData::Trigger { trigger_table: l }, ObjectData::Trigger { trigger_table: r }) => {
            compare_owner_name(*l, *r, registry)
        }
        (
            ObjectData::PublicationRel { publication: l },
            ObjectData::PublicationRel { publication: r },
        ) => compare_owner_name(*l, *r, registry),
        (
            ObjectData::Constraint {
                contype: lc,
                con_table: lt,
                con_domain: ld,
                ..
            },
            ObjectData::Constraint {
                contype: rc,
                con_table: rt,
                con_domain: rd,
                ..
            },
        ) => {
            // Domain-carrying constraints sort before table-carrying
            // ones, mirroring CREATE DOMAIN < CREATE TABLE.
            let l_is_domain = ld.is_some();
            let r_is_domain = rd.is_some();
            let ord = r_is_domain.cmp(&l_is_domain); // domain (true) first
            if ord != Ordering::Equal {
                return ord;
            }
            let l_owner = ld.or(*lt);
            let r_owner = rd.or(*rt);
            let ord = compare_owner_name(
                l_owner.unwrap_or(lhs.dump_id),
                r_owner.unwrap_or(rhs.dump_id),
                registry,
            );
            if ord != Ordering::Equal {
                return ord;
            }
            // Not specified further by §4.2, but contype keeps the
            // order stable for constraints on the exact same owner.
            constraint_kind_rank(*lc).cmp(&constraint_kind_rank(*rc))
        }
        _ => Ordering::Equal,
    }
}

fn compare_arity_then_arg_types(l: &[u32], r: &[u32], registry: &Registry) -> Ordering {
    let ord = l.len().cmp(&r.len());
    if ord != Ordering::Equal {
        return ord;
    }
    for (l_oid, r_oid) in l.iter().zip(r.iter()) {
        let ord = compare_type_oid(*l_oid, *r_oid, registry);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_optional_type(l: Option<u32>, r: Option<u32>, registry: &Registry) -> Ordering {
    match (l, r) {
        (Some(l), Some(r)) => compare_type_oid(l, r, registry),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn compare_type_oid(l: u32, r: u32, registry: &Registry) -> Ordering {
    if l == r {
        return Ordering::Equal;
    }
    match (type_sort_key(registry, l), type_sort_key(registry, r)) {
        (Some((ls, ln)), Some((rs, rn))) => {
            let ord = compare_optional_string(ls, rs);
            if ord != Ordering::Equal {
                return ord;
            }
            ln.as_bytes().cmp(rn.as_bytes())
        }
        // Lookup failed on one or both sides: inconclusive, not a crash.
        _ => Ordering::Equal,
    }
}

fn compare_optional_string(l: Option<String>, r: Option<String>) -> Ordering {
    match (l, r) {
        (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_owner_name(l: crate::object::DumpId, r: crate::object::DumpId, registry: &Registry) -> Ordering {
    let l_name = registry.find_by_dump_id(l).map(|o| o.name.as_str());
    let r_name = registry.find_by_dump_id(r).map(|o| o.name.as_str());
    compare_optional_string(l_name.map(String::from), r_name.map(String::from))
}

fn constraint_kind_rank(k: ConstraintKind) -> u8 {
    match k {
        ConstraintKind::Check => 0,
        ConstraintKind::NotNull => 1,
        ConstraintKind::PrimaryKey => 2,
        ConstraintKind::Unique => 3,
        ConstraintKind::Exclusion => 4,
        ConstraintKind::ForeignKey => 5,
        ConstraintKind::Trigger => 6,
    }
}

/// §6 entry point: a stable pre-sort by the §4.2 comparator, no graph
/// consultation.
pub fn sort_by_type_name(objects: &mut [Object], registry: &Registry) {
    objects.sort_by(|a, b| compare_type_name(a, b, registry));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::{CatalogId, DumpId, Object};
    use crate::registry::Registry;

    fn schema(id: u32, name: &str) -> Object {
        Object::new(DumpId(id), ObjectKind::Schema, name)
    }

    fn table(id: u32, schema: u32, name: &str) -> Object {
        Object::new(DumpId(id), ObjectKind::Table, name)
            .with_schema(DumpId(schema))
            .with_data(ObjectData::Table {
                relkind: crate::object::RelKind::OrdinaryTable,
                dummy_view: false,
                postponed_def: false,
            })
    }

    #[test]
    fn priority_dominates_name() {
        let objs = vec![schema(1, "public"), table(2, 1, "aaa_comes_last_by_priority")];
        let reg = Registry::new(2, objs.clone());
        let mut ord = objs;
        sort_by_type_name(&mut ord, &reg);
        assert_eq!(ord[0].name, "public");
        assert_eq!(ord[1].name, "aaa_comes_last_by_priority");
    }

    #[test]
    fn name_breaks_ties_within_priority_band() {
        let objs = vec![table(1, 3, "zeta"), table(2, 3, "alpha"), schema(3, "s")];
        let reg = Registry::new(3, objs.clone());
        let mut ord = objs;
        sort_by_type_name(&mut ord, &reg);
        // schema sorts first (lower priority band); tables then by name.
        assert_eq!(ord.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(), vec!["s", "alpha", "zeta"]);
    }

    #[test]
    fn null_schema_sorts_after_non_null() {
        let a = Object::new(DumpId(1), ObjectKind::Table, "t").with_data(ObjectData::Table {
            relkind: crate::object::RelKind::OrdinaryTable,
            dummy_view: false,
            postponed_def: false,
        });
        let b = table(2, 3, "t");
        let s = schema(3, "s");
        let reg = Registry::new(3, vec![a.clone(), b.clone(), s]);
        assert_eq!(compare_type_name(&a, &b, &reg), Ordering::Greater);
    }

    #[test]
    fn failed_type_lookup_is_inconclusive_not_a_panic() {
        let reg = Registry::new(1, vec![Object::new(DumpId(1), ObjectKind::Schema, "s")]);
        assert_eq!(compare_type_oid(999, 1000, &reg), Ordering::Equal);
    }

    #[test]
    fn opclass_opfamily_tiebreak_by_access_method_name() {
        let btree = Object::new(DumpId(1), ObjectKind::AccessMethod, "btree")
            .with_catalog_id(CatalogId { tableoid: 0, oid: 403 });
        let hash = Object::new(DumpId(2), ObjectKind::AccessMethod, "hash")
            .with_catalog_id(CatalogId { tableoid: 0, oid: 405 });
        let oc1 = Object::new(DumpId(3), ObjectKind::OpClass, "x")
            .with_data(ObjectData::OpClassOrFamily { access_method_oid: 403 });
        let oc2 = Object::new(DumpId(4), ObjectKind::OpClass, "x")
            .with_data(ObjectData::OpClassOrFamily { access_method_oid: 405 });

        let reg = Registry::new(4, vec![btree, hash, oc1.clone(), oc2.clone()]);
        assert_eq!(compare_type_name(&oc1, &oc2, &reg), Ordering::Less);
    }

    #[test]
    fn total_order_is_reflexive_antisymmetric_transitive() {
        let a = schema(1, "a");
        let b = schema(2, "b");
        let c = schema(3, "c");
        let reg = Registry::new(3, vec![a.clone(), b.clone(), c.clone()]);

        assert_eq!(compare_type_name(&a, &a, &reg), Ordering::Equal);
        assert_eq!(compare_type_name(&a, &b, &reg), Ordering::Less);
        assert_eq!(compare_type_name(&b, &a, &reg), Ordering::Greater);
        assert_eq!(compare_type_name(&a, &b, &reg), Ordering::Less);
        assert_eq!(compare_type_name(&b, &c, &reg), Ordering::Less);
        assert_eq!(compare_type_name(&a, &c, &reg), Ordering::Less);
    }
}
