//! RAII scope annotation.

use crate::tracker::Tracker;

/// A guard that brackets a tracked scope.
///
/// Created by [`Tracker::scope`]: scope entry is recorded immediately, scope exit when the
/// guard drops. This keeps enter/exit balanced across early returns and unwinds, which the
/// renderers rely on for brace matching and subgraph closing.
///
/// # Examples
///
/// ```rust
/// use lifescope::Tracker;
///
/// let tracker = Tracker::new();
/// {
///     let _main = tracker.scope("main");
///     assert_eq!(tracker.depth(), 1);
/// }
/// assert_eq!(tracker.depth(), 0);
/// ```
#[must_use = "the scope exits when the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard {
    tracker: Tracker,
}

impl ScopeGuard {
    pub(crate) fn enter(tracker: &Tracker, name: &str) -> Self {
        tracker.enter_scope(name);
        Self {
            tracker: tracker.clone(),
        }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.tracker.exit_scope();
    }
}
