//! §4.5: the loop repair dispatcher. Given one elementary cycle, tries
//! each pattern in order and applies the first one that matches,
//! mutating the graph so the next retry of the topological sort makes
//! progress on this cycle.

use crate::context::SortContext;
use crate::diagnostics::describe;
use crate::object::{ConstraintKind, DumpId, Object, ObjectData, ObjectKind, RelKind};

/// Which pattern fired, any warning the caller should surface (patterns
/// #15 and #16 only), and whether the cycle was genuinely left
/// unresolved by a known pattern (`#16` alone — `#15` *does* repair the
/// cycle, it just also warns the user about the circular FK it repaired
/// around).
pub struct RepairApplied {
    pub pattern: u8,
    pub warning: Option<String>,
    pub unresolved: bool,
}

fn obj<'a>(ctx: &'a SortContext, id: DumpId) -> &'a Object {
    ctx.registry
        .find_by_dump_id(id)
        .expect("cycle vertex must be present in the registry")
}

/// Find the first ordered pair `(a, b)` drawn from `cycle` (searched in
/// cycle order, a before b) for which `pred` holds. Not limited to
/// adjacent vertices: patterns #3/#8/#10/#13 match "any pair
/// participating in the cycle", however far apart in the path.
fn find_pair<F>(cycle: &[DumpId], ctx: &SortContext, pred: F) -> Option<(DumpId, DumpId)>
where
    F: Fn(&Object, &Object) -> bool,
{
    for &a in cycle {
        for &b in cycle {
            if a == b {
                continue;
            }
            if pred(obj(ctx, a), obj(ctx, b)) {
                return Some((a, b));
            }
        }
    }
    None
}

fn is_table_relkind(o: &Object, relkind: RelKind) -> bool {
    matches!(&o.data, ObjectData::Table { relkind: rk, .. } if *rk == relkind)
}

fn is_view_like_table(o: &Object) -> bool {
    matches!(&o.data, ObjectData::Table { relkind, .. } if relkind.is_view_like())
}

/// Apply the first applicable repair pattern to `cycle`. Always
/// succeeds in making progress: every branch either removes an edge
/// outright or removes one and adds back a strictly "safer" one
/// (pointing at the post-data boundary), so repeated application
/// across retries of §4.3 is guaranteed to terminate.
pub fn apply(cycle: &[DumpId], ctx: &mut SortContext) -> RepairApplied {
    // Pattern 1: type <-> I/O function, length 2.
    if cycle.len() == 2 {
        if let Some((type_id, func_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Type && b.kind == ObjectKind::Function
        }) {
            if let ObjectData::Type { shell_type: Some(shell_id) } = obj(ctx, type_id).data.clone() {
                ctx.registry.remove_dependency(func_id, type_id);
                ctx.registry.add_dependency(func_id, shell_id);
                if obj(ctx, func_id).dump.contains(crate::object::DumpComponents::DEFINITION) {
                    ctx.registry.mutate(shell_id, |s| s.dump.insert(crate::object::DumpComponents::DEFINITION));
                }
                return RepairApplied { pattern: 1, warning: None, unresolved: false };
            }
        }
    }

    // Pattern 2: view/matview <-> ON SELECT rule, length 2.
    if cycle.len() == 2 {
        if let Some((view_id, rule_id)) = find_pair(cycle, ctx, |a, b| {
            is_view_like_table(a) && is_on_select_rule_of(b, a.dump_id)
        }) {
            ctx.registry.remove_dependency(rule_id, view_id);
            return RepairApplied { pattern: 2, warning: None, unresolved: false };
        }
    }

    // Pattern 3: view (not matview) <-> rule, length > 2.
    if cycle.len() > 2 {
        if let Some((view_id, rule_id)) = find_pair(cycle, ctx, |a, b| {
            is_table_relkind(a, RelKind::View) && is_rule_of(b, a.dump_id)
        }) {
            ctx.registry.remove_dependency(view_id, rule_id);
            ctx.registry.mutate(view_id, |v| {
                if let ObjectData::Table { dummy_view, .. } = &mut v.data {
                    *dummy_view = true;
                }
            });
            ctx.registry.mutate(rule_id, |r| {
                if let ObjectData::Rule { separate, .. } = &mut r.data {
                    *separate = true;
                }
            });
            ctx.registry.add_dependency(rule_id, view_id);
            ctx.registry.add_dependency(rule_id, ctx.post_boundary);
            return RepairApplied { pattern: 3, warning: None, unresolved: false };
        }
    }

    // Pattern 4: matview <-> pre-data boundary, length > 2.
    if cycle.len() > 2 {
        if let Some(idx) = cycle.iter().position(|&v| v == ctx.pre_boundary) {
            let successor = cycle[(idx + 1) % cycle.len()];
            if is_table_relkind(obj(ctx, successor), RelKind::MaterializedView)
                || obj(ctx, successor).kind == ObjectKind::RelStats
            {
                ctx.registry.remove_dependency(ctx.pre_boundary, successor);
                postpone(ctx, successor);
                return RepairApplied { pattern: 4, warning: None, unresolved: false };
            }
        }
    }

    // Pattern 5: matview stats <-> post-data boundary, length > 2 (symmetric to #4).
    if cycle.len() > 2 {
        if let Some(idx) = cycle.iter().position(|&v| v == ctx.post_boundary) {
            let successor = cycle[(idx + 1) % cycle.len()];
            if obj(ctx, successor).kind == ObjectKind::RelStats {
                ctx.registry.remove_dependency(ctx.post_boundary, successor);
                postpone(ctx, successor);
                return RepairApplied { pattern: 5, warning: None, unresolved: false };
            }
        }
    }

    // Pattern 6: function <-> pre-data boundary, length > 2.
    if cycle.len() > 2 {
        if let Some(idx) = cycle.iter().position(|&v| v == ctx.pre_boundary) {
            let successor = cycle[(idx + 1) % cycle.len()];
            if obj(ctx, successor).kind == ObjectKind::Function {
                ctx.registry.remove_dependency(ctx.pre_boundary, successor);
                postpone(ctx, successor);
                return RepairApplied { pattern: 6, warning: None, unresolved: false };
            }
        }
    }

    // Pattern 7: table <-> CHECK constraint, length 2.
    if cycle.len() == 2 {
        if let Some((table_id, con_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Table && is_check_constraint_of(b, ConstraintOwner::Table(a.dump_id))
        }) {
            ctx.registry.remove_dependency(con_id, table_id);
            return RepairApplied { pattern: 7, warning: None, unresolved: false };
        }
    }

    // Pattern 8: table <-> CHECK constraint, length > 2, anywhere in the cycle.
    if cycle.len() > 2 {
        if let Some((table_id, con_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Table && is_check_constraint_of(b, ConstraintOwner::Table(a.dump_id))
        }) {
            ctx.registry.remove_dependency(table_id, con_id);
            mark_constraint_separate(ctx, con_id);
            ctx.registry.add_dependency(con_id, table_id);
            ctx.registry.add_dependency(con_id, ctx.post_boundary);
            return RepairApplied { pattern: 8, warning: None, unresolved: false };
        }
    }

    // Pattern 9: table <-> attribute default, length 2.
    if cycle.len() == 2 {
        if let Some((table_id, attrdef_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Table && is_attrdef_of(b, a.dump_id)
        }) {
            ctx.registry.remove_dependency(attrdef_id, table_id);
            return RepairApplied { pattern: 9, warning: None, unresolved: false };
        }
    }

    // Pattern 10: table <-> attrdef, length > 2.
    if cycle.len() > 2 {
        if let Some((table_id, attrdef_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Table && is_attrdef_of(b, a.dump_id)
        }) {
            ctx.registry.remove_dependency(table_id, attrdef_id);
            ctx.registry.mutate(attrdef_id, |ad| {
                if let ObjectData::AttrDef { separate, .. } = &mut ad.data {
                    *separate = true;
                }
            });
            ctx.registry.add_dependency(attrdef_id, table_id);
            return RepairApplied { pattern: 10, warning: None, unresolved: false };
        }
    }

    // Pattern 11: partitioned index <-> child index, length 2.
    if cycle.len() == 2 {
        if let Some((parent_id, child_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Index
                && b.kind == ObjectKind::Index
                && matches!(&b.data, ObjectData::Index { parent_idx_oid: Some(oid) } if *oid == a.catalog_id.oid)
        }) {
            ctx.registry.remove_dependency(parent_id, child_id);
            return RepairApplied { pattern: 11, warning: None, unresolved: false };
        }
    }

    // Pattern 12: domain <-> CHECK/NOT NULL constraint, length 2.
    if cycle.len() == 2 {
        if let Some((domain_id, con_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Type && is_check_constraint_of(b, ConstraintOwner::Domain(a.dump_id))
        }) {
            ctx.registry.remove_dependency(con_id, domain_id);
            return RepairApplied { pattern: 12, warning: None, unresolved: false };
        }
    }

    // Pattern 13: domain <-> CHECK/NOT NULL, length > 2.
    if cycle.len() > 2 {
        if let Some((domain_id, con_id)) = find_pair(cycle, ctx, |a, b| {
            a.kind == ObjectKind::Type && is_check_constraint_of(b, ConstraintOwner::Domain(a.dump_id))
        }) {
            ctx.registry.remove_dependency(domain_id, con_id);
            mark_constraint_separate(ctx, con_id);
            ctx.registry.add_dependency(con_id, domain_id);
            ctx.registry.add_dependency(con_id, ctx.post_boundary);
            return RepairApplied { pattern: 13, warning: None, unresolved: false };
        }
    }

    // Pattern 14: self-loop on a table.
    if cycle.len() == 1 && obj(ctx, cycle[0]).kind == ObjectKind::Table {
        ctx.registry.remove_dependency(cycle[0], cycle[0]);
        return RepairApplied { pattern: 14, warning: None, unresolved: false };
    }

    // Pattern 15: circular FK among table-data.
    if !cycle.is_empty() && cycle.iter().all(|&v| obj(ctx, v).kind == ObjectKind::TableData) {
        let names: Vec<String> = cycle.iter().map(|&v| describe(obj(ctx, v))).collect();
        let warning = format!(
            "circular foreign-key constraints among table data: {}. \
             Consider --disable-triggers or a non-data-only dump.",
            names.join(", ")
        );
        ctx.registry.remove_dependency(cycle[0], cycle[1 % cycle.len()]);
        return RepairApplied { pattern: 15, warning: Some(warning), unresolved: false };
    }

    // Pattern 16: no pattern matched.
    let names: Vec<String> = cycle.iter().map(|&v| describe(obj(ctx, v))).collect();
    let warning = format!(
        "could not resolve dependency loop among these items: {}",
        names.join(", ")
    );
    if cycle.len() > 1 {
        ctx.registry.remove_dependency(cycle[0], cycle[1]);
    } else if !cycle.is_empty() {
        ctx.registry.remove_dependency(cycle[0], cycle[0]);
    }
    RepairApplied { pattern: 16, warning: Some(warning), unresolved: true }
}

fn postpone(ctx: &mut SortContext, id: DumpId) {
    ctx.registry.mutate(id, |o| {
        o.postponed = true;
        if let ObjectData::Table { postponed_def, .. } = &mut o.data {
            *postponed_def = true;
        }
    });
}

fn mark_constraint_separate(ctx: &mut SortContext, con_id: DumpId) {
    ctx.registry.mutate(con_id, |c| {
        if let ObjectData::Constraint { separate, .. } = &mut c.data {
            *separate = true;
        }
    });
}

fn is_on_select_rule_of(o: &Object, table_id: DumpId) -> bool {
    matches!(
        &o.data,
        ObjectData::Rule { ev_type, is_instead, rule_table, .. }
            if *ev_type == '1' && *is_instead && *rule_table == table_id
    )
}

fn is_rule_of(o: &Object, table_id: DumpId) -> bool {
    matches!(&o.data, ObjectData::Rule { rule_table, .. } if *rule_table == table_id)
}

enum ConstraintOwner {
    Table(DumpId),
    Domain(DumpId),
}

fn is_check_constraint_of(o: &Object, owner: ConstraintOwner) -> bool {
    match &o.data {
        ObjectData::Constraint { contype, con_table, con_domain, .. } => {
            let type_ok = matches!(contype, ConstraintKind::Check | ConstraintKind::NotNull);
            if !type_ok {
                return false;
            }
            match owner {
                ConstraintOwner::Table(t) => *con_table == Some(t),
                ConstraintOwner::Domain(d) => *con_domain == Some(d),
            }
        }
        _ => false,
    }
}

fn is_attrdef_of(o: &Object, table_id: DumpId) -> bool {
    matches!(&o.data, ObjectData::AttrDef { ad_table, .. } if *ad_table == table_id)
}
