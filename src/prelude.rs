//! # lifescope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the lifescope library. Import this module to get quick access to the essential
//! types for tracing a run.
//!
//! # Example
//!
//! ```rust
//! use lifescope::prelude::*;
//!
//! let tracker = Tracker::new();
//! let _main = tracker.scope("main");
//! let a = Traced::named(&tracker, 54, "a");
//! assert_eq!(a.get(), 54);
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all lifescope operations
pub use crate::Error;

/// The result type used throughout lifescope
pub use crate::Result;

// ================================================================================================
// Tracking Core
// ================================================================================================

/// The fan-out event dispatcher handle
pub use crate::Tracker;

/// The instrumented numeric wrapper
pub use crate::Traced;

/// Aggregate object/copy/move counters
pub use crate::Totals;

/// The binary operator table of the instrumented type
pub use crate::BinOp;

/// Per-event identity and provenance snapshot
pub use crate::tracker::TrackedRecord;

/// The tracked lifecycle event kinds
pub use crate::tracker::EventKind;

/// RAII scope annotation created by [`Tracker::scope`]
pub use crate::tracker::ScopeGuard;

// ================================================================================================
// Renderer Backends
// ================================================================================================

/// The event-consumer contract every backend implements
pub use crate::render::Render;

/// Lifecycle events as delivered to renderers
pub use crate::render::Event;

/// Indented, color-tagged terminal output
pub use crate::render::ConsoleRenderer;

/// The event log as a styled HTML file
pub use crate::render::HtmlRenderer;

/// Value flow as a Graphviz DOT artifact
pub use crate::render::DotRenderer;
