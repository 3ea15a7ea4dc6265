//! The dump object model: the ~40 kinds of thing a dump can emit, and the
//! dense, schema-qualified handle ([`DumpId`]) the rest of the crate threads
//! everywhere instead of passing `Object` by value.

use std::fmt;

/// A dense, 1-based identifier assigned by the catalog loader. `dumpId`
/// values are unique within a run and form the interval `[1, maxDumpId]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DumpId(pub u32);

impl DumpId {
    /// Index into a dense `[1, max]` array, i.e. `self.0 - 1`.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for DumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Last-resort tie-breaker: the catalog row this object was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CatalogId {
    pub tableoid: u32,
    pub oid: u32,
}

/// Which pieces of an object the dumper intends to emit. Bits, not an
/// enum, because an object can carry any combination (e.g. a table's
/// definition and its ACL but not its data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpComponents(u8);

impl DumpComponents {
    pub const NONE: DumpComponents = DumpComponents(0);
    pub const DEFINITION: DumpComponents = DumpComponents(1 << 0);
    pub const DATA: DumpComponents = DumpComponents(1 << 1);
    pub const ACL: DumpComponents = DumpComponents(1 << 2);
    pub const COMMENT: DumpComponents = DumpComponents(1 << 3);
    pub const SECURITY_LABEL: DumpComponents = DumpComponents(1 << 4);

    pub fn contains(self, other: DumpComponents) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: DumpComponents) {
        self.0 |= other.0;
    }

    pub fn union(self, other: DumpComponents) -> DumpComponents {
        DumpComponents(self.0 | other.0)
    }
}

/// The SQL-level "position" `oprkind` takes for an operator: prefix,
/// postfix, or infix. Ordered so that reversed comparison yields
/// prefix < postfix < infix (§4.2 row "operator").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OprKind {
    Left,
    Right,
    Both,
}

/// `contype` for a Constraint object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Check,
    NotNull,
    ForeignKey,
    PrimaryKey,
    Unique,
    Exclusion,
    Trigger,
}

/// `relkind` for a Table object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelKind {
    OrdinaryTable,
    View,
    MaterializedView,
    Sequence,
    ForeignTable,
    Partitioned,
}

impl RelKind {
    pub fn is_view_like(self) -> bool {
        matches!(self, RelKind::View | RelKind::MaterializedView)
    }
}

/// Every kind of object the dump-object ordering core knows how to place.
/// Exhaustive matches over this enum are how the crate keeps the priority
/// table (§4.1) statically complete: adding a variant here without adding
/// a matching arm in `priority::priority_of` is a compile error, not a
/// runtime assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Schema,
    Extension,
    Type,
    ShellType,
    Function,
    Aggregate,
    Operator,
    AccessMethod,
    OpClass,
    OpFamily,
    Collation,
    Conversion,
    Table,
    TableAttach,
    AttrDef,
    Index,
    IndexAttach,
    StatsExt,
    Rule,
    Trigger,
    Constraint,
    FkConstraint,
    ProcLang,
    Cast,
    TableData,
    SequenceSet,
    DummyType,
    TsParser,
    TsDict,
    TsTemplate,
    TsConfig,
    Fdw,
    ForeignServer,
    DefaultAcl,
    Transform,
    LargeObject,
    LargeObjectData,
    PreDataBoundary,
    PostDataBoundary,
    EventTrigger,
    RefreshMatview,
    Policy,
    Publication,
    PublicationRel,
    PublicationTableInSchema,
    RelStats,
    Subscription,
    SubscriptionRel,
}

impl ObjectKind {
    /// All variants, in declaration order. Used by the priority-table
    /// completeness test and by diagnostics.
    pub const ALL: &'static [ObjectKind] = &[
        ObjectKind::Schema,
        ObjectKind::Extension,
        ObjectKind::Type,
        ObjectKind::ShellType,
        ObjectKind::Function,
        ObjectKind::Aggregate,
        ObjectKind::Operator,
        ObjectKind::AccessMethod,
        ObjectKind::OpClass,
        ObjectKind::OpFamily,
        ObjectKind::Collation,
        ObjectKind::Conversion,
        ObjectKind::Table,
        ObjectKind::TableAttach,
        ObjectKind::AttrDef,
        ObjectKind::Index,
        ObjectKind::IndexAttach,
        ObjectKind::StatsExt,
        ObjectKind::Rule,
        ObjectKind::Trigger,
        ObjectKind::Constraint,
        ObjectKind::FkConstraint,
        ObjectKind::ProcLang,
        ObjectKind::Cast,
        ObjectKind::TableData,
        ObjectKind::SequenceSet,
        ObjectKind::DummyType,
        ObjectKind::TsParser,
        ObjectKind::TsDict,
        ObjectKind::TsTemplate,
        ObjectKind::TsConfig,
        ObjectKind::Fdw,
        ObjectKind::ForeignServer,
        ObjectKind::DefaultAcl,
        ObjectKind::Transform,
        ObjectKind::LargeObject,
        ObjectKind::LargeObjectData,
        ObjectKind::PreDataBoundary,
        ObjectKind::PostDataBoundary,
        ObjectKind::EventTrigger,
        ObjectKind::RefreshMatview,
        ObjectKind::Policy,
        ObjectKind::Publication,
        ObjectKind::PublicationRel,
        ObjectKind::PublicationTableInSchema,
        ObjectKind::RelStats,
        ObjectKind::Subscription,
        ObjectKind::SubscriptionRel,
    ];

    /// A stable rank used only to break comparator ties between kinds
    /// that share a priority band (§4.2 step 4). Not the emission
    /// priority itself — see `priority::priority_of`.
    pub fn tie_rank(self) -> u32 {
        Self::ALL
            .iter()
            .position(|k| *k == self)
            .expect("ObjectKind::ALL is exhaustive") as u32
    }
}

/// Kind-specific payload. Carries exactly the fields the comparator and
/// repair dispatcher need to project out of a generic `Object`.
#[derive(Debug, Clone, Default)]
pub enum ObjectData {
    #[default]
    None,
    Function {
        arg_types: Vec<u32>,
    },
    Aggregate {
        arg_types: Vec<u32>,
    },
    Operator {
        oprkind: OprKind,
        left_type: Option<u32>,
        right_type: Option<u32>,
    },
    OpClassOrFamily {
        access_method_oid: u32,
    },
    Collation {
        encoding: i32,
    },
    Type {
        shell_type: Option<DumpId>,
    },
    ShellType {
        complete_type: Option<DumpId>,
    },
    Table {
        relkind: RelKind,
        dummy_view: bool,
        postponed_def: bool,
    },
    AttrDef {
        adnum: i32,
        separate: bool,
        ad_table: DumpId,
    },
    Index {
        parent_idx_oid: Option<u32>,
    },
    Rule {
        ev_type: char,
        is_instead: bool,
        rule_table: DumpId,
        separate: bool,
    },
    Trigger {
        trigger_table: DumpId,
    },
    Policy {
        policy_table: DumpId,
    },
    Constraint {
        contype: ConstraintKind,
        con_table: Option<DumpId>,
        con_domain: Option<DumpId>,
        separate: bool,
    },
    PublicationRel {
        publication: DumpId,
    },
}

/// A single dump unit, as described in §3.
#[derive(Debug, Clone)]
pub struct Object {
    pub dump_id: DumpId,
    pub kind: ObjectKind,
    pub name: String,
    pub schema: Option<DumpId>,
    pub catalog_id: CatalogId,
    pub dependencies: Vec<DumpId>,
    pub dump: DumpComponents,
    pub data: ObjectData,
    /// Generic "emit this in post-data instead of pre-data" marker used
    /// by repair patterns #4-#6 for kinds (function, rel-stats) that
    /// don't carry a kind-specific `postponed_def` field the way
    /// `ObjectData::Table` does. For a matview, repair sets both this
    /// and the kind-specific field; the kind-specific one is what §3
    /// names, this one is what repair can set uniformly.
    pub postponed: bool,
}

impl Object {
    /// Construct a minimal object of the given kind with no payload,
    /// suitable for kinds that carry none (schemas, extensions, casts,
    /// the boundary singletons, ...). Use the `with_data` builder or set
    /// `.data` directly for kinds that need a payload.
    pub fn new(dump_id: DumpId, kind: ObjectKind, name: impl Into<String>) -> Self {
        Object {
            dump_id,
            kind,
            name: name.into(),
            schema: None,
            catalog_id: CatalogId::default(),
            dependencies: Vec::new(),
            dump: DumpComponents::DEFINITION,
            data: ObjectData::None,
            postponed: false,
        }
    }

    pub fn with_schema(mut self, schema: DumpId) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_catalog_id(mut self, catalog_id: CatalogId) -> Self {
        self.catalog_id = catalog_id;
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = DumpId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    pub fn with_data(mut self, data: ObjectData) -> Self {
        self.data = data;
        self
    }

    pub fn with_dump(mut self, dump: DumpComponents) -> Self {
        self.dump = dump;
        self
    }
}
