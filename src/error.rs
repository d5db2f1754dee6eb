use std::{io, path::PathBuf};

use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the failure modes of event rendering: acquiring a backing sink for a
/// renderer, and committing formatted output to it. Tracking itself never fails: recording an
/// event is a total operation, so every variant here originates in a renderer.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::Sink`] - A file-backed renderer could not create or open its output file.
///   Callers should treat this as fatal: a renderer that cannot write cannot guarantee
///   delivery of any event.
///
/// ## Commit Errors
/// - [`Error::Io`] - Writing an already-formatted event or artifact to a sink failed.
///
/// # Examples
///
/// ```rust,no_run
/// use lifescope::{render::HtmlRenderer, Error};
///
/// match HtmlRenderer::create("log/trace.html") {
///     Ok(renderer) => {
///         println!("renderer ready");
///     }
///     Err(Error::Sink { path, source }) => {
///         eprintln!("cannot open {}: {}", path.display(), source);
///     }
///     Err(e) => {
///         eprintln!("other error: {}", e);
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A renderer could not acquire its backing file.
    ///
    /// Raised at renderer construction time only. There is no degraded mode for a renderer
    /// without a sink, so this is the one error in the crate that callers are expected to
    /// treat as unrecoverable.
    ///
    /// # Fields
    ///
    /// * `path` - The file the renderer tried to create
    /// * `source` - The underlying I/O failure
    #[error("failed to open renderer sink {path:?}")]
    Sink {
        /// The file the renderer tried to create.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Sink I/O error.
    ///
    /// Wraps standard I/O errors raised while committing an event line or a finished
    /// artifact to a renderer's sink.
    #[error("{0}")]
    Io(#[from] io::Error),
}
