//! Per-value identity and provenance records.
//!
//! Every lifecycle event carries a [`TrackedRecord`]: the identity snapshot of the value at
//! the moment of the event. The record owns the derivation history, a nested function-call
//! notation that reconstructs how the current value was produced from prior values, e.g.
//! `COPY(a, <id0|54>)` or `ASG+(b, <id1|2>, <id0|54>)`.

use crate::traced::BinOp;

/// The kind of a tracked lifecycle event.
///
/// One variant per special operation of the instrumented value type. The assignment variants
/// distinguish their source: a plain literal, another tracked value (copied or moved from),
/// or a compound arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum EventKind {
    /// Construction from a literal value.
    Construct,
    /// Construction as a copy of another tracked value.
    CopyConstruct,
    /// Construction by moving out of another tracked value.
    MoveConstruct,
    /// Destruction at end of life.
    Destruct,
    /// Assignment of a literal value.
    Assign,
    /// Assignment copying another tracked value.
    CopyAssign,
    /// Assignment moving out of another tracked value.
    MoveAssign,
    /// Compound arithmetic assignment (`+=`, `<<=`, ...).
    OpAssign,
}

impl EventKind {
    /// Returns the display tag for this event kind, as used by the text backends and as the
    /// "reason" label of graph nodes.
    ///
    /// # Arguments
    ///
    /// * `op` - The operator of an [`EventKind::OpAssign`] event; ignored for other kinds
    #[must_use]
    pub fn tag(&self, op: Option<BinOp>) -> String {
        match self {
            EventKind::Construct => "CTOR".to_string(),
            EventKind::CopyConstruct => "COPY".to_string(),
            EventKind::MoveConstruct => "MOVE".to_string(),
            EventKind::Destruct => "DTOR".to_string(),
            EventKind::Assign => "=".to_string(),
            EventKind::CopyAssign => "COPY=".to_string(),
            EventKind::MoveAssign => "MOVE=".to_string(),
            EventKind::OpAssign => match op {
                Some(op) => format!("{op}="),
                None => "?=".to_string(),
            },
        }
    }
}

/// The identity and provenance snapshot of one tracked value.
///
/// A record is value-identity scoped: each construction event produces a fresh identity, so
/// copies and moves of other values get their own `id`. The record is re-populated by its
/// owning value on every event and never outlives it.
///
/// While tracking is disabled the dispatcher assigns no identities at all; `id` stays `None`
/// until the first event that runs with tracking enabled.
#[derive(Debug, Clone, Default)]
pub struct TrackedRecord {
    /// Globally unique identity, monotonically assigned at first effective contact with the
    /// dispatcher. Never reused.
    pub id: Option<u64>,
    /// Address of the owning value at event time. Display only, never dereferenced.
    pub address: usize,
    /// User-supplied name, or an auto-generated `tmp{id}` placeholder.
    pub name: String,
    /// Textual snapshot of the numeric value at the moment of the event.
    pub value: String,
    /// Derivation history in nested function-call notation.
    pub history: String,
    /// Whether `name` was auto-generated.
    pub is_temp: bool,
    /// Name of the innermost active scope at naming time, `"???"` if none.
    pub scope: String,
}

impl TrackedRecord {
    /// Creates an unnamed record. The dispatcher fills identity, placeholder name and scope
    /// at the first tracked event.
    #[must_use]
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Creates a record carrying a user-supplied name.
    ///
    /// The name is kept verbatim; identity is still assigned lazily by the dispatcher.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the id as display text, `"?"` when no identity has been assigned yet.
    #[must_use]
    pub fn display_id(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "?".to_string(),
        }
    }
}

/// Derives the history string for an event.
///
/// Pure function of the event kind, the target record before the event took effect (for the
/// previous history and identity), the source record of copy/move/operator events, and the
/// operator of compound assignments. Total for well-formed input; unknown sources render as
/// empty segments.
pub(crate) fn derive_history(
    kind: EventKind,
    record: &TrackedRecord,
    other: Option<&TrackedRecord>,
    op: Option<BinOp>,
) -> String {
    let other_name = other.map_or("", |o| o.name.as_str());
    let other_history = other.map_or("", |o| o.history.as_str());

    match kind {
        EventKind::Construct => {
            format!("<id{}|{}>", record.display_id(), record.value)
        }
        EventKind::CopyConstruct => format!("COPY({other_name}, {other_history})"),
        EventKind::MoveConstruct => format!("MOVE({other_name}, {other_history})"),
        EventKind::Assign => format!("ASG({}, {})", record.value, record.history),
        EventKind::CopyAssign => {
            format!("ASGCOPY({other_name}, {other_history}, {})", record.history)
        }
        EventKind::MoveAssign => {
            format!("ASGMOVE({other_name}, {other_history}, {})", record.history)
        }
        EventKind::OpAssign => {
            let op = op.map_or_else(|| "?".to_string(), |op| op.to_string());
            format!("ASG{op}({other_name}, {other_history}, {})", record.history)
        }
        // Destruction leaves the history untouched.
        EventKind::Destruct => record.history.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str, value: &str, history: &str) -> TrackedRecord {
        TrackedRecord {
            id: Some(id),
            name: name.to_string(),
            value: value.to_string(),
            history: history.to_string(),
            ..TrackedRecord::default()
        }
    }

    #[test]
    fn test_construct_history() {
        let rec = record(0, "lol", "54", "");
        assert_eq!(derive_history(EventKind::Construct, &rec, None, None), "<id0|54>");
    }

    #[test]
    fn test_copy_construct_history() {
        let src = record(0, "lol", "54", "<id0|54>");
        let dst = record(1, "tmp1", "54", "");
        assert_eq!(
            derive_history(EventKind::CopyConstruct, &dst, Some(&src), None),
            "COPY(lol, <id0|54>)"
        );
    }

    #[test]
    fn test_move_construct_history() {
        let src = record(0, "a", "7", "<id0|7>");
        let dst = record(1, "b", "7", "");
        assert_eq!(
            derive_history(EventKind::MoveConstruct, &dst, Some(&src), None),
            "MOVE(a, <id0|7>)"
        );
    }

    #[test]
    fn test_literal_assign_chains_previous_history() {
        let rec = record(0, "a", "9", "<id0|5>");
        assert_eq!(
            derive_history(EventKind::Assign, &rec, None, None),
            "ASG(9, <id0|5>)"
        );
    }

    #[test]
    fn test_op_assign_history() {
        let a = record(0, "a", "3", "<id0|1>");
        let b = record(1, "b", "2", "<id1|2>");
        assert_eq!(
            derive_history(EventKind::OpAssign, &a, Some(&b), Some(BinOp::Add)),
            "ASG+(b, <id1|2>, <id0|1>)"
        );
    }

    #[test]
    fn test_copy_assign_history() {
        let a = record(0, "a", "2", "<id0|1>");
        let b = record(1, "b", "2", "<id1|2>");
        assert_eq!(
            derive_history(EventKind::CopyAssign, &a, Some(&b), None),
            "ASGCOPY(b, <id1|2>, <id0|1>)"
        );
    }

    #[test]
    fn test_tags() {
        assert_eq!(EventKind::Construct.tag(None), "CTOR");
        assert_eq!(EventKind::CopyAssign.tag(None), "COPY=");
        assert_eq!(EventKind::OpAssign.tag(Some(BinOp::Shl)), "<<=");
        assert_eq!(EventKind::Destruct.tag(None), "DTOR");
    }
}
