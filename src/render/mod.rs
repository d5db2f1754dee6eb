//! Renderer backends.
//!
//! Every backend implements the same event-consumer contract, [`Render`]: scope entry/exit,
//! one method for all typed lifecycle [`Event`]s, and a final flush with the run [`Totals`].
//! The dispatcher invokes backends in registration order and never lets one backend's
//! failure stop delivery to the others.
//!
//! # Backends
//!
//! - [`ConsoleRenderer`] - indented, color-tagged lines on a terminal (or any writer)
//! - [`HtmlRenderer`] - the same log as a styled HTML file with header and summary footer
//! - [`DotRenderer`] - a versioned value-flow graph in Graphviz DOT, optionally rendered
//!   to PNG through the external `dot` tool
//!
//! The two text backends share one formatting layer, [`TextRenderer`], and differ only in
//! their [`StyledSink`] strategy (ANSI escapes vs. HTML markup).

use crate::{
    tracker::{EventKind, Totals, TrackedRecord},
    traced::BinOp,
    Result,
};

/// ANSI terminal rendering.
pub mod console;
/// Graphviz DOT rendering of value flow.
pub mod dot;
/// Escaping helpers for DOT and HTML output.
pub mod escape;
/// Styled HTML file rendering.
pub mod html;
/// The shared styled-text formatting layer.
pub mod text;

pub use console::{ConsoleRenderer, ConsoleSink};
pub use dot::DotRenderer;
pub use html::{HtmlRenderer, HtmlSink};
pub use text::{StyledSink, TextRenderer};

/// The color vocabulary of the text backends.
///
/// These are the bright/bold variants of the classic terminal palette. Each sink maps them
/// to its own representation: ANSI escape sequences on the console, hex `<font>` colors in
/// HTML. [`Color::Default`] means unstyled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Unstyled text.
    Default,
    /// Bright black (grey).
    Black,
    /// Bright red.
    Red,
    /// Bright green.
    Green,
    /// Bright yellow.
    Yellow,
    /// Bright blue.
    Blue,
    /// Bright purple.
    Purple,
    /// Bright cyan.
    Cyan,
    /// Bright white.
    White,
}

/// One typed lifecycle event, as delivered to every renderer.
///
/// Borrows the records involved for the duration of the dispatch; renderers copy out what
/// they need.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// What happened.
    pub kind: EventKind,
    /// The value the event happened to.
    pub target: &'a TrackedRecord,
    /// The other operand of copy/move/operator events.
    pub source: Option<&'a TrackedRecord>,
    /// The operator of an [`EventKind::OpAssign`] event.
    pub op: Option<BinOp>,
}

/// The event-consumer contract every backend implements.
///
/// Methods run synchronously on the caller's thread and are invoked in registration order.
/// The `depth` parameter is the shared call-stack depth: for [`enter_scope`](Render::enter_scope)
/// the depth before the scope is pushed, for [`exit_scope`](Render::exit_scope) the depth
/// after the pop, and for [`event`](Render::event) the current depth.
///
/// # Errors
///
/// Implementations report sink I/O failures; the dispatcher logs them and keeps delivering
/// to the remaining renderers.
pub trait Render {
    /// Opens a visual grouping for a named scope.
    fn enter_scope(&mut self, name: &str, depth: usize) -> Result<()>;

    /// Closes the innermost visual grouping.
    fn exit_scope(&mut self, depth: usize) -> Result<()>;

    /// Commits one lifecycle event.
    fn event(&mut self, event: &Event<'_>, depth: usize) -> Result<()>;

    /// Flushes the sink and writes any trailing summary or artifact.
    ///
    /// Called exactly once, with the final counters.
    fn finish(&mut self, totals: &Totals) -> Result<()>;
}
