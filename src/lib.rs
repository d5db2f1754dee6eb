// Copyright 2026 the lifescope authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # lifescope
//!
//! A teaching instrument for value lifetimes. `lifescope` wraps a number in an instrumented
//! type, [`Traced`], that reports every construction, copy, move, assignment, arithmetic
//! operation and destruction to a [`Tracker`], which fans the events out to pluggable
//! renderer backends. After a run, every value carries a human-readable derivation history
//! such as `ASG+(b, <id1|2>, <id0|54>)` reconstructing exactly how it was produced.
//!
//! ## Features
//!
//! - **Full lifecycle capture** - every special operation of the tracked type is recorded,
//!   with a stable per-value identity and a derivation-history string
//! - **Multiplexed output** - one dispatcher, any number of backends, invoked in
//!   registration order for reproducible output
//! - **Console and HTML logs** - the same indented, color-tagged event lines as terminal
//!   text or a styled, self-contained HTML file
//! - **Graphviz value-flow graphs** - a versioned node/edge model of copies, moves and
//!   assignments, written as DOT and optionally rendered to PNG
//! - **Isolated instances** - trackers are explicit, injected handles; every test can own
//!   its own
//!
//! ## Quick Start
//!
//! ```rust
//! use lifescope::prelude::*;
//!
//! let tracker = Tracker::new();
//! tracker.add_renderer(Box::new(ConsoleRenderer::stdout()));
//!
//! let _main = tracker.scope("main");
//! let a = Traced::named(&tracker, 54, "lol");
//! let b = a.clone();
//!
//! assert_eq!(b.history(), format!("COPY(lol, <id{}|54>)", a.id().unwrap()));
//! assert_eq!(tracker.totals().copies, 1);
//! # Ok::<(), lifescope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `lifescope` is organized into a small set of modules:
//!
//! - [`tracker`] - the tracking core: identity records, the shared call stack, and the
//!   fan-out dispatcher
//! - [`traced`] - the instrumented value type and its operator table
//! - [`render`] - the renderer backends and their shared abstractions
//! - [`prelude`] - convenient re-exports of the common types
//!
//! Data flows one way: user code operates on [`Traced`] values; each lifecycle hook
//! populates an identity record and calls into the [`Tracker`]; the tracker stamps the
//! derivation history, updates the aggregate [`Totals`], and forwards the typed event to
//! each registered [`render::Render`] backend, which formats and commits it to its own
//! sink.
//!
//! ## Concurrency
//!
//! The tracker is single-threaded by design: every event is delivered synchronously on the
//! caller's thread, and handles are `Rc`-based. Instrument one logical thread of execution
//! per tracker instance.

pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use lifescope::prelude::*;
///
/// let tracker = Tracker::new();
/// let a = Traced::named(&tracker, 5, "a");
/// assert_eq!(a.history(), format!("<id{}|5>", a.id().unwrap()));
/// ```
pub mod prelude;

/// Renderer backends: console text, HTML, and Graphviz DOT.
///
/// All backends implement the [`render::Render`] event-consumer contract and own their
/// sink for their whole lifetime. See the module documentation for the backend list and
/// their shared text-formatting layer.
pub mod render;

/// The instrumented numeric wrapper and its binary operator table.
///
/// [`Traced`] wraps an `i64` and reports every special operation on itself to its
/// [`Tracker`]; [`BinOp`] is the parameterized operation table behind all ten compound and
/// binary operators.
pub mod traced;

/// Lifecycle tracking core: records, call stack, dispatcher.
///
/// # Key Types
///
/// - [`Tracker`] - the dispatcher handle instrumented values report to
/// - [`tracker::TrackedRecord`] - the identity/provenance snapshot carried by each event
/// - [`tracker::EventKind`] - the eight tracked lifecycle event kinds
/// - [`Totals`] - aggregate object/copy/move counters
pub mod tracker;

/// `lifescope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `lifescope` Error type
///
/// The main error type for all operations in this crate. Every variant originates in a
/// renderer sink; tracking itself is infallible.
pub use error::Error;

/// The instrumented numeric wrapper and its operator table.
///
/// # Example
///
/// ```rust
/// use lifescope::{BinOp, Traced, Tracker};
///
/// let tracker = Tracker::new();
/// let mut a = Traced::named(&tracker, 1, "a");
/// let b = Traced::named(&tracker, 2, "b");
/// a += &b;
/// assert_eq!(a.get(), BinOp::Add.apply(1, 2));
/// ```
pub use traced::{BinOp, Traced};

/// The dispatcher handle and the aggregate counters.
///
/// # Example
///
/// ```rust
/// use lifescope::{Traced, Tracker};
///
/// let tracker = Tracker::new();
/// let a = Traced::new(&tracker, 7);
/// let b = a.clone();
/// assert_eq!(tracker.totals().objects, 2);
/// # drop(b);
/// ```
pub use tracker::{Totals, Tracker};
