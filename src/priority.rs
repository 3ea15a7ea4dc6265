//! §4.1: the static mapping from object kind to a coarse emission
//! priority. Bands are pre-data, data, and post-data, separated by the
//! two boundary pseudo-kinds; ordering within a band mirrors the
//! emitter's section assignment exactly (a mismatch here would make
//! the sort stable with respect to the wrong order).

use crate::object::ObjectKind;

/// Priority is just "where in the emitted script this kind's objects
/// land, before dependencies are consulted". Lower sorts earlier. The
/// exact integers are not meaningful outside relative order; what
/// matters is the sequence, which callers must keep in lockstep with
/// their emitter's section assignment.
pub type Priority = u16;

/// The priority of the pre-data boundary singleton. Every object with a
/// lower priority is PRE_DATA.
pub const PRE_DATA_BOUNDARY_PRIORITY: Priority = priority_of(ObjectKind::PreDataBoundary);

/// The priority of the post-data boundary singleton. Every object with
/// a priority strictly between the two boundaries is DATA; everything
/// above is POST_DATA.
pub const POST_DATA_BOUNDARY_PRIORITY: Priority = priority_of(ObjectKind::PostDataBoundary);

/// Priority for `kind`. A `match` over every `ObjectKind` variant: the
/// compiler rejects a new variant added without a corresponding arm
/// here, which is how this table's completeness is "statically
/// asserted" per §3's invariant, without a runtime check.
pub const fn priority_of(kind: ObjectKind) -> Priority {
    use ObjectKind::*;
    match kind {
        // --- PRE_DATA band ---
        Schema => 1,
        ProcLang => 2,
        Collation => 3,
        Transform => 4,
        Extension => 5,
        Type => 6,
        ShellType => 6,
        DummyType => 6,
        Cast => 7,
        Function => 8,
        Aggregate => 9,
        AccessMethod => 10,
        Operator => 11,
        OpFamily => 12,
        OpClass => 12,
        Conversion => 13,
        TsParser => 14,
        TsTemplate => 14,
        TsDict => 14,
        TsConfig => 14,
        Fdw => 15,
        ForeignServer => 16,
        Table => 17,
        TableAttach => 18,
        AttrDef => 19,

        // --- boundary ---
        PreDataBoundary => 20,

        // --- DATA band ---
        TableData => 21,
        SequenceSet => 22,
        LargeObject => 23,
        LargeObjectData => 24,
        RelStats => 25,

        // --- boundary ---
        PostDataBoundary => 26,

        // --- POST_DATA band ---
        Constraint => 27,
        Index => 28,
        IndexAttach => 29,
        StatsExt => 30,
        Rule => 31,
        Trigger => 32,
        FkConstraint => 33,
        Policy => 34,
        Publication => 35,
        PublicationRel => 36,
        PublicationTableInSchema => 36,
        Subscription => 37,
        SubscriptionRel => 38,
        DefaultAcl => 39,
        EventTrigger => 40, // next-to-last: must not fire mid-restore
        RefreshMatview => 41, // strictly last
    }
}

/// Which of the three sections a priority falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PreData,
    Data,
    PostData,
}

pub fn section_of(priority: Priority) -> Section {
    if priority <= PRE_DATA_BOUNDARY_PRIORITY {
        Section::PreData
    } else if priority <= POST_DATA_BOUNDARY_PRIORITY {
        Section::Data
    } else {
        Section::PostData
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::ObjectKind;

    #[test]
    fn priority_table_is_complete() {
        // Every kind maps to *some* priority without panicking; the
        // real completeness guard is the exhaustive match above, this
        // just exercises it for every variant.
        for kind in ObjectKind::ALL {
            let _ = priority_of(*kind);
        }
        assert_eq!(ObjectKind::ALL.len(), 48);
    }

    #[test]
    fn casts_sort_before_functions() {
        assert!(priority_of(ObjectKind::Cast) < priority_of(ObjectKind::Function));
    }

    #[test]
    fn event_trigger_next_to_last_refresh_matview_last() {
        let all_priorities: Vec<Priority> = ObjectKind::ALL.iter().map(|k| priority_of(*k)).collect();
        let max = *all_priorities.iter().max().unwrap();
        assert_eq!(priority_of(ObjectKind::RefreshMatview), max);
        assert!(priority_of(ObjectKind::EventTrigger) < max);
        // and nothing else sits between event trigger and refresh matview
        assert!(!all_priorities
            .iter()
            .any(|p| *p > priority_of(ObjectKind::EventTrigger) && *p < max));
    }

    #[test]
    fn boundaries_bound_their_bands() {
        assert_eq!(section_of(priority_of(ObjectKind::Schema)), Section::PreData);
        assert_eq!(section_of(priority_of(ObjectKind::TableData)), Section::Data);
        assert_eq!(section_of(priority_of(ObjectKind::Index)), Section::PostData);
    }
}
