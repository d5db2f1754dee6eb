//! Lifecycle tracking core.
//!
//! This module implements the tracking-and-multiplexing engine: the per-value identity and
//! provenance model, the shared call stack, and the fan-out dispatcher that forwards typed
//! lifecycle events to every registered renderer.
//!
//! # Key Types
//!
//! - [`Tracker`] - The dispatcher handle instrumented values report to
//! - [`TrackedRecord`] - The identity/provenance snapshot carried by each event
//! - [`EventKind`] - The eight tracked lifecycle event kinds
//! - [`Totals`] - Aggregate object/copy/move counters
//! - [`CallStack`] - The shared stack of active scope names
//! - [`ScopeGuard`] - RAII scope annotation created by [`Tracker::scope`]
//!
//! # Examples
//!
//! ```rust
//! use lifescope::{Tracker, Traced};
//!
//! let tracker = Tracker::new();
//! let _main = tracker.scope("main");
//!
//! let a = Traced::named(&tracker, 5, "a");
//! let b = a.clone_named("b");
//!
//! assert_eq!(b.history(), format!("COPY(a, <id{}|5>)", a.id().unwrap()));
//! assert_eq!(tracker.totals().copies, 1);
//! ```

/// The shared call stack of active scope names.
pub mod callstack;
/// The fan-out dispatcher and aggregate counters.
pub mod dispatcher;
/// Per-value identity and provenance records.
pub mod record;
/// RAII scope annotation.
pub mod scope;

pub use callstack::CallStack;
pub use dispatcher::{Totals, Tracker};
pub use record::{EventKind, TrackedRecord};
pub use scope::ScopeGuard;
