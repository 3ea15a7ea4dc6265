//! §4.6: human-readable descriptions of dump objects, used only by the
//! unresolved-loop warning path (§4.5 rows 15 and 16).

use crate::object::{Object, ObjectKind};

fn kind_word(kind: ObjectKind) -> &'static str {
    use ObjectKind::*;
    match kind {
        Schema => "SCHEMA",
        Extension => "EXTENSION",
        Type => "TYPE",
        ShellType => "SHELL TYPE",
        Function => "FUNCTION",
        Aggregate => "AGGREGATE",
        Operator => "OPERATOR",
        AccessMethod => "ACCESS METHOD",
        OpClass => "OPERATOR CLASS",
        OpFamily => "OPERATOR FAMILY",
        Collation => "COLLATION",
        Conversion => "CONVERSION",
        Table => "TABLE",
        TableAttach => "TABLE ATTACH",
        AttrDef => "DEFAULT",
        Index => "INDEX",
        IndexAttach => "INDEX ATTACH",
        StatsExt => "STATISTICS",
        Rule => "RULE",
        Trigger => "TRIGGER",
        Constraint => "CONSTRAINT",
        FkConstraint => "FK CONSTRAINT",
        ProcLang => "PROCEDURAL LANGUAGE",
        Cast => "CAST",
        TableData => "TABLE DATA",
        SequenceSet => "SEQUENCE SET",
        DummyType => "DUMMY TYPE",
        TsParser => "TEXT SEARCH PARSER",
        TsDict => "TEXT SEARCH DICTIONARY",
        TsTemplate => "TEXT SEARCH TEMPLATE",
        TsConfig => "TEXT SEARCH CONFIGURATION",
        Fdw => "FOREIGN DATA WRAPPER",
        ForeignServer => "FOREIGN SERVER",
        DefaultAcl => "DEFAULT ACL",
        Transform => "TRANSFORM",
        LargeObject => "LARGE OBJECT",
        LargeObjectData => "LARGE OBJECT DATA",
        PreDataBoundary => "PRE-DATA BOUNDARY",
        PostDataBoundary => "POST-DATA BOUNDARY",
        EventTrigger => "EVENT TRIGGER",
        RefreshMatview => "REFRESH MATERIALIZED VIEW",
        Policy => "POLICY",
        Publication => "PUBLICATION",
        PublicationRel => "PUBLICATION TABLE",
        PublicationTableInSchema => "PUBLICATION TABLES IN SCHEMA",
        RelStats => "STATISTICS DATA",
        Subscription => "SUBSCRIPTION",
        SubscriptionRel => "SUBSCRIPTION TABLE",
    }
}

/// A single-line description of `obj`, suitable for inclusion in a
/// warning enumerating the objects involved in an unresolved loop.
pub fn describe(obj: &Object) -> String {
    match obj.kind {
        ObjectKind::PreDataBoundary | ObjectKind::PostDataBoundary => {
            format!("{} (dumpId {})", kind_word(obj.kind), obj.dump_id)
        }
        _ => format!(
            "{} {:?} (dumpId {}, oid {})",
            kind_word(obj.kind),
            obj.name,
            obj.dump_id,
            obj.catalog_id.oid
        ),
    }
}
