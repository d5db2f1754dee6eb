//! The fan-out event dispatcher.
//!
//! [`Tracker`] is the single point of contact for instrumented values: it assigns identities,
//! derives history strings, maintains the aggregate counters and the shared call stack, and
//! forwards each typed event to every registered renderer in registration order.
//!
//! The tracker is an explicitly constructed, cheaply cloneable handle. Tests and applications
//! create their own isolated instance; there is no process-wide singleton.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    render::{Event, Render},
    tracker::{
        callstack::CallStack,
        record::{derive_history, EventKind, TrackedRecord},
        scope::ScopeGuard,
    },
    traced::BinOp,
    Result,
};

/// Aggregate lifecycle counters.
///
/// Updated exactly once per event regardless of how many renderers are registered. The
/// [`fmt::Display`] implementation renders the run summary used by the text backends:
/// `"2 objects created, 1 copied, 0 moved"` ("object" is pluralized only when the count
/// differs from one).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Values constructed, by any constructor.
    pub objects: u64,
    /// Copy constructions plus copy assignments.
    pub copies: u64,
    /// Move constructions plus move assignments.
    pub moves: u64,
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} object{} created, {} copied, {} moved",
            self.objects,
            if self.objects == 1 { "" } else { "s" },
            self.copies,
            self.moves
        )
    }
}

struct DispatcherState {
    renderers: Vec<Box<dyn Render>>,
    calls: CallStack,
    totals: Totals,
    next_id: u64,
    enabled: bool,
    finished: bool,
}

impl DispatcherState {
    fn new() -> Self {
        Self {
            renderers: Vec::new(),
            calls: CallStack::new(),
            totals: Totals::default(),
            next_id: 0,
            enabled: true,
            finished: false,
        }
    }

    /// Assigns identity on first effective contact: a fresh id, a `tmp{id}` placeholder name
    /// for unnamed values, and the enclosing scope.
    fn ensure_identity(&mut self, record: &mut TrackedRecord) {
        if record.id.is_some() {
            return;
        }

        let id = self.next_id;
        self.next_id += 1;
        record.id = Some(id);

        if record.name.is_empty() {
            record.name = format!("tmp{id}");
            record.is_temp = true;
        }

        record.scope = self.calls.top().unwrap_or("???").to_string();
    }

    fn emit(&mut self, event: &Event<'_>) {
        let depth = self.calls.depth();
        for renderer in &mut self.renderers {
            if let Err(e) = renderer.event(event, depth) {
                log::warn!("renderer failed to record {:?} event: {e}", event.kind);
            }
        }
    }

    fn record_event(
        &mut self,
        kind: EventKind,
        record: &mut TrackedRecord,
        source: Option<&TrackedRecord>,
        op: Option<BinOp>,
    ) {
        if !self.enabled || self.finished {
            return;
        }

        self.ensure_identity(record);
        record.history = derive_history(kind, record, source, op);

        match kind {
            EventKind::Construct => self.totals.objects += 1,
            EventKind::CopyConstruct => {
                self.totals.objects += 1;
                self.totals.copies += 1;
            }
            EventKind::MoveConstruct => {
                self.totals.objects += 1;
                self.totals.moves += 1;
            }
            EventKind::CopyAssign => self.totals.copies += 1,
            EventKind::MoveAssign => self.totals.moves += 1,
            EventKind::Assign | EventKind::OpAssign | EventKind::Destruct => {}
        }

        let event = Event {
            kind,
            target: &*record,
            source,
            op,
        };
        self.emit(&event);
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let totals = self.totals;
        let mut first_error = None;
        for renderer in &mut self.renderers {
            if let Err(e) = renderer.finish(&totals) {
                log::warn!("renderer failed to finish: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for DispatcherState {
    fn drop(&mut self) {
        // Best-effort flush when the last handle goes away without an explicit finish.
        // Abnormal process termination bypasses this entirely.
        let _ = self.finish();
    }
}

/// The fan-out event dispatcher handle.
///
/// A `Tracker` owns the renderer registry, the shared [`CallStack`], the aggregate
/// [`Totals`] and the identity counter. Instrumented values hold a clone of the handle and
/// report every lifecycle event through it; the tracker stamps identity and history onto the
/// record, updates the counters once, and forwards the event to every renderer in
/// registration order.
///
/// # Construction
///
/// ```rust
/// use lifescope::{render::ConsoleRenderer, Tracker, Traced};
///
/// let tracker = Tracker::new();
/// tracker.add_renderer(Box::new(ConsoleRenderer::stdout()));
///
/// let _main = tracker.scope("main");
/// let a = Traced::named(&tracker, 54, "a");
/// let b = a.clone();
/// assert_eq!(b.history(), format!("COPY(a, <id{}|54>)", a.id().unwrap()));
/// ```
///
/// # Suppressing instrumentation
///
/// [`set_enabled(false)`](Tracker::set_enabled) turns every event into a no-op: no counter
/// updates, no renderer calls, and no identity assignment. Identities are therefore handed
/// out lazily, at the first event that runs while tracking is enabled. Scope enter/exit is
/// forwarded regardless, so brace nesting stays balanced in every backend.
///
/// # Teardown
///
/// [`finish`](Tracker::finish) flushes every renderer (HTML footer, graph artifact and
/// image). Dropping the last handle performs a best-effort finish; events recorded after an
/// explicit finish are discarded.
#[derive(Clone)]
pub struct Tracker {
    state: Rc<RefCell<DispatcherState>>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    /// Creates a tracker with no renderers, tracking enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DispatcherState::new())),
        }
    }

    /// Registers a renderer.
    ///
    /// Dispatch order is registration order and is preserved across the run, so output is
    /// reproducible across backends.
    pub fn add_renderer(&self, renderer: Box<dyn Render>) {
        self.state.borrow_mut().renderers.push(renderer);
    }

    /// Master toggle for instrumentation.
    ///
    /// While disabled, every event method is a side-effect-free no-op: counters, renderers
    /// and identity assignment are all untouched. Re-enabling resumes counting from the
    /// prior totals.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.borrow_mut().enabled = enabled;
    }

    /// Returns whether instrumentation is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Returns a copy of the aggregate counters.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.state.borrow().totals
    }

    /// Returns the current call-stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state.borrow().calls.depth()
    }

    /// Enters a named scope.
    ///
    /// Prefer [`scope`](Tracker::scope), which guarantees the matching exit.
    pub fn enter_scope(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        let depth = state.calls.depth();
        state.calls.push(name);

        if state.finished {
            return;
        }
        for renderer in &mut state.renderers {
            if let Err(e) = renderer.enter_scope(name, depth) {
                log::warn!("renderer failed to enter scope {name:?}: {e}");
            }
        }
    }

    /// Exits the innermost scope.
    ///
    /// # Panics
    ///
    /// Panics if there is no active scope. An unbalanced exit is a usage bug in the
    /// instrumentation, not a runtime condition to recover from.
    pub fn exit_scope(&self) {
        let mut state = self.state.borrow_mut();
        if state.calls.pop().is_none() {
            panic!("exit_scope called with no active scope");
        }
        let depth = state.calls.depth();

        if state.finished {
            return;
        }
        for renderer in &mut state.renderers {
            if let Err(e) = renderer.exit_scope(depth) {
                log::warn!("renderer failed to exit scope: {e}");
            }
        }
    }

    /// Enters a named scope and returns a guard that exits it on drop.
    pub fn scope(&self, name: impl AsRef<str>) -> ScopeGuard {
        ScopeGuard::enter(self, name.as_ref())
    }

    /// Records a construction from a literal value.
    pub fn construct(&self, record: &mut TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::Construct, record, None, None);
    }

    /// Records a copy construction of `record` from `source`.
    pub fn copy_construct(&self, record: &mut TrackedRecord, source: &TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::CopyConstruct, record, Some(source), None);
    }

    /// Records a move construction of `record` out of `source`.
    pub fn move_construct(&self, record: &mut TrackedRecord, source: &TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::MoveConstruct, record, Some(source), None);
    }

    /// Records an assignment of a literal value.
    pub fn assign(&self, record: &mut TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::Assign, record, None, None);
    }

    /// Records a copy assignment from `source`.
    pub fn copy_assign(&self, record: &mut TrackedRecord, source: &TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::CopyAssign, record, Some(source), None);
    }

    /// Records a move assignment out of `source`.
    pub fn move_assign(&self, record: &mut TrackedRecord, source: &TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::MoveAssign, record, Some(source), None);
    }

    /// Records a compound arithmetic assignment (`record op= source`).
    pub fn op_assign(&self, record: &mut TrackedRecord, source: &TrackedRecord, op: BinOp) {
        self.state
            .borrow_mut()
            .record_event(EventKind::OpAssign, record, Some(source), Some(op));
    }

    /// Records a destruction.
    pub fn destruct(&self, record: &mut TrackedRecord) {
        self.state
            .borrow_mut()
            .record_event(EventKind::Destruct, record, None, None);
    }

    /// Flushes and closes every renderer with the final totals.
    ///
    /// Idempotent: only the first call flushes. Rendering continues across individual
    /// renderer failures; the first error encountered is returned after all renderers were
    /// given the chance to finish.
    ///
    /// # Errors
    ///
    /// Returns the first renderer flush error, if any.
    pub fn finish(&self) -> Result<()> {
        self.state.borrow_mut().finish()
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Tracker")
            .field("renderers", &state.renderers.len())
            .field("totals", &state.totals)
            .field("next_id", &state.next_id)
            .field("enabled", &state.enabled)
            .field("depth", &state.calls.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(name: &str, value: i64) -> TrackedRecord {
        let mut record = TrackedRecord::named(name);
        record.value = value.to_string();
        record
    }

    #[test]
    fn test_ids_unique_and_increasing() {
        let tracker = Tracker::new();

        let mut ids = Vec::new();
        for i in 0..16 {
            let mut record = literal("x", i);
            tracker.construct(&mut record);
            ids.push(record.id.unwrap());
        }

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, ids, "ids must be strictly increasing in call order");
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn test_identity_assigned_once() {
        let tracker = Tracker::new();

        let mut record = literal("a", 1);
        tracker.construct(&mut record);
        let id = record.id;

        tracker.assign(&mut record);
        assert_eq!(record.id, id);
    }

    #[test]
    fn test_temporary_naming() {
        let tracker = Tracker::new();

        let mut record = TrackedRecord::unnamed();
        record.value = "5".to_string();
        tracker.construct(&mut record);

        assert_eq!(record.name, "tmp0");
        assert!(record.is_temp);
    }

    #[test]
    fn test_scope_attribution() {
        let tracker = Tracker::new();

        let mut orphan = literal("orphan", 0);
        tracker.construct(&mut orphan);
        assert_eq!(orphan.scope, "???");

        let _guard = tracker.scope("compute");
        let mut record = literal("a", 1);
        tracker.construct(&mut record);
        assert_eq!(record.scope, "compute");
    }

    #[test]
    fn test_counters() {
        let tracker = Tracker::new();

        let mut a = literal("a", 1);
        tracker.construct(&mut a);

        let mut b = TrackedRecord::unnamed();
        b.value = "1".to_string();
        tracker.copy_construct(&mut b, &a);

        let mut c = TrackedRecord::unnamed();
        c.value = "1".to_string();
        tracker.move_construct(&mut c, &a);

        tracker.copy_assign(&mut a, &b);
        tracker.move_assign(&mut a, &c);
        tracker.destruct(&mut c);

        assert_eq!(
            tracker.totals(),
            Totals {
                objects: 3,
                copies: 2,
                moves: 2
            }
        );
    }

    #[test]
    fn test_disabled_has_no_side_effects() {
        let tracker = Tracker::new();

        let mut a = literal("a", 1);
        tracker.construct(&mut a);
        let before = tracker.totals();

        tracker.set_enabled(false);
        let mut b = literal("b", 2);
        tracker.construct(&mut b);
        tracker.copy_assign(&mut a, &b);
        tracker.destruct(&mut b);

        assert_eq!(tracker.totals(), before);
        assert_eq!(b.id, None, "no identity assignment while disabled");

        tracker.set_enabled(true);
        let mut c = literal("c", 3);
        tracker.construct(&mut c);
        assert_eq!(tracker.totals().objects, before.objects + 1);
    }

    #[test]
    fn test_identity_assigned_lazily_after_reenable() {
        let tracker = Tracker::new();

        tracker.set_enabled(false);
        let mut record = literal("late", 9);
        tracker.construct(&mut record);
        assert_eq!(record.id, None);

        tracker.set_enabled(true);
        tracker.assign(&mut record);
        assert!(record.id.is_some());
    }

    #[test]
    fn test_totals_summary_pluralization() {
        let one = Totals {
            objects: 1,
            copies: 0,
            moves: 0,
        };
        assert_eq!(one.to_string(), "1 object created, 0 copied, 0 moved");

        let many = Totals {
            objects: 3,
            copies: 1,
            moves: 2,
        };
        assert_eq!(many.to_string(), "3 objects created, 1 copied, 2 moved");
    }

    #[test]
    #[should_panic(expected = "no active scope")]
    fn test_unbalanced_exit_panics() {
        let tracker = Tracker::new();
        tracker.exit_scope();
    }
}
