//! Object lookup and the only sanctioned entry points for mutating the
//! dependency graph (§6, "Edge-mutation primitives").

use crate::object::{DumpId, Object, ObjectData, ObjectKind};
use fxhash::FxHashMap;

/// Owns the object set for one `sort_dependency_aware` call and the
/// derived lookup tables the comparator needs. Built once per call;
/// edge mutations during repair go through `add_dependency` /
/// `remove_dependency` so the graph is never touched directly from the
/// repair dispatcher.
#[derive(Debug, Default)]
pub struct Registry {
    /// Dense, indexed by `DumpId::index()`. `None` for ids that were
    /// never populated (holes are legal: the loader may skip ids for
    /// objects it chose not to dump).
    by_id: Vec<Option<Object>>,
    type_by_oid: FxHashMap<u32, DumpId>,
    access_method_by_oid: FxHashMap<u32, DumpId>,
}

impl Registry {
    /// Build a registry over `max_dump_id` slots, then populate it from
    /// `objects`. Every object's `dump_id` must lie in
    /// `[1, max_dump_id]`; every dependency target must too (the latter
    /// is not checked here — see `toposort::validate_edges`).
    pub fn new(max_dump_id: u32, objects: Vec<Object>) -> Self {
        let mut by_id: Vec<Option<Object>> = std::iter::repeat_with(|| None)
            .take(max_dump_id as usize)
            .collect();
        let mut type_by_oid = FxHashMap::default();
        let mut access_method_by_oid = FxHashMap::default();

        for obj in objects {
            if matches!(obj.kind, ObjectKind::Type | ObjectKind::ShellType) {
                type_by_oid.insert(obj.catalog_id.oid, obj.dump_id);
            }
            if obj.kind == ObjectKind::AccessMethod {
                access_method_by_oid.insert(obj.catalog_id.oid, obj.dump_id);
            }
            let idx = obj.dump_id.index();
            by_id[idx] = Some(obj);
        }

        Registry {
            by_id,
            type_by_oid,
            access_method_by_oid,
        }
    }

    pub fn max_dump_id(&self) -> u32 {
        self.by_id.len() as u32
    }

    pub fn find_by_dump_id(&self, id: DumpId) -> Option<&Object> {
        self.by_id.get(id.index()).and_then(|o| o.as_ref())
    }

    fn find_by_dump_id_mut(&mut self, id: DumpId) -> Option<&mut Object> {
        self.by_id.get_mut(id.index()).and_then(|o| o.as_mut())
    }

    pub fn find_type_by_oid(&self, oid: u32) -> Option<&Object> {
        self.type_by_oid
            .get(&oid)
            .and_then(|id| self.find_by_dump_id(*id))
    }

    pub fn find_access_method_by_oid(&self, oid: u32) -> Option<&Object> {
        self.access_method_by_oid
            .get(&oid)
            .and_then(|id| self.find_by_dump_id(*id))
    }

    /// Add a dependency edge `from -> to` ("`from` must be emitted after
    /// `to`"), if it is not already present. A no-op if `from` is not
    /// populated (should not happen for objects passed into the sort).
    pub fn add_dependency(&mut self, from: DumpId, to: DumpId) {
        if let Some(obj) = self.find_by_dump_id_mut(from) {
            if !obj.dependencies.contains(&to) {
                obj.dependencies.push(to);
            }
        }
    }

    /// Remove a dependency edge `from -> to`, if present.
    pub fn remove_dependency(&mut self, from: DumpId, to: DumpId) {
        if let Some(obj) = self.find_by_dump_id_mut(from) {
            obj.dependencies.retain(|&d| d != to);
        }
    }

    /// Run a closure with mutable access to one object's payload/flags.
    /// Used by repair to toggle `separate`, `dummy_view`,
    /// `postponed_def`, and the shell-type dump-flag promotion, without
    /// exposing raw field access elsewhere.
    pub fn mutate<F: FnOnce(&mut Object)>(&mut self, id: DumpId, f: F) {
        if let Some(obj) = self.find_by_dump_id_mut(id) {
            f(obj);
        }
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.by_id.iter().filter_map(|o| o.as_ref())
    }
}

/// Convenience used by the comparator's recursive type/access-method
/// keys: a name to sort by, or `None` if the lookup failed (in which
/// case the comparator must treat the column as inconclusive, not
/// crash).
pub fn type_sort_key(registry: &Registry, oid: u32) -> Option<(Option<String>, String)> {
    let ty = registry.find_type_by_oid(oid)?;
    let schema_name = ty
        .schema
        .and_then(|s| registry.find_by_dump_id(s))
        .map(|s| s.name.clone());
    Some((schema_name, ty.name.clone()))
}

pub fn access_method_name(registry: &Registry, oid: u32) -> Option<String> {
    registry
        .find_access_method_by_oid(oid)
        .map(|am| am.name.clone())
}

#[allow(dead_code)]
fn _assert_data_variant_exhaustive(data: &ObjectData) {
    // Touching every variant here keeps this module honest about which
    // payloads exist; the match itself is never executed.
    match data {
        ObjectData::None
        | ObjectData::Function { .. }
        | ObjectData::Aggregate { .. }
        | ObjectData::Operator { .. }
        | ObjectData::OpClassOrFamily { .. }
        | ObjectData::Collation { .. }
        | ObjectData::Type { .. }
        | ObjectData::ShellType { .. }
        | ObjectData::Table { .. }
        | ObjectData::AttrDef { .. }
        | ObjectData::Index { .. }
        | ObjectData::Rule { .. }
        | ObjectData::Trigger { .. }
        | ObjectData::Policy { .. }
        | ObjectData::Constraint { .. }
        | ObjectData::PublicationRel { .. } => {}
    }
}
