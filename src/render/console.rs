//! ANSI terminal rendering.

use std::io;

use crate::render::{text::TextRenderer, Color, StyledSink};

/// Bright/bold color escapes for UNIX terminals.
mod ansi {
    pub(super) const RESET: &str = "\x1b[0m";
    pub(super) const BLACK: &str = "\x1b[1;30m";
    pub(super) const RED: &str = "\x1b[1;31m";
    pub(super) const GREEN: &str = "\x1b[1;32m";
    pub(super) const YELLOW: &str = "\x1b[1;33m";
    pub(super) const BLUE: &str = "\x1b[1;34m";
    pub(super) const PURPLE: &str = "\x1b[1;35m";
    pub(super) const CYAN: &str = "\x1b[1;36m";
    pub(super) const WHITE: &str = "\x1b[1;37m";
}

/// Styling sink that wraps segments in ANSI color escapes.
///
/// Writes to any [`io::Write`]; color can be disabled for dumb terminals or captured
/// output, in which case segments pass through verbatim.
pub struct ConsoleSink<W> {
    out: W,
    color: bool,
}

impl<W: io::Write> ConsoleSink<W> {
    fn code(color: Color) -> Option<&'static str> {
        match color {
            Color::Default => None,
            Color::Black => Some(ansi::BLACK),
            Color::Red => Some(ansi::RED),
            Color::Green => Some(ansi::GREEN),
            Color::Yellow => Some(ansi::YELLOW),
            Color::Blue => Some(ansi::BLUE),
            Color::Purple => Some(ansi::PURPLE),
            Color::Cyan => Some(ansi::CYAN),
            Color::White => Some(ansi::WHITE),
        }
    }
}

impl<W: io::Write> StyledSink for ConsoleSink<W> {
    fn write_styled(&mut self, color: Color, text: &str) -> io::Result<()> {
        match Self::code(color) {
            Some(code) if self.color => {
                write!(self.out, "{code}{text}{}", ansi::RESET)
            }
            _ => self.out.write_all(text.as_bytes()),
        }
    }

    fn finish(&mut self, summary: &str) -> io::Result<()> {
        writeln!(self.out, "\n{summary}")?;
        self.out.flush()
    }
}

/// The plain-text backend: indented, color-tagged event lines on a terminal.
///
/// # Examples
///
/// ```rust
/// use lifescope::{render::ConsoleRenderer, Tracker};
///
/// let tracker = Tracker::new();
/// tracker.add_renderer(Box::new(ConsoleRenderer::stdout()));
/// ```
pub type ConsoleRenderer<W = io::Stdout> = TextRenderer<ConsoleSink<W>>;

impl TextRenderer<ConsoleSink<io::Stdout>> {
    /// Creates a colored console renderer on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: io::Write> TextRenderer<ConsoleSink<W>> {
    /// Creates a colored console renderer over an arbitrary writer.
    pub fn with_writer(out: W) -> Self {
        TextRenderer::new(ConsoleSink { out, color: true })
    }

    /// Enables or disables ANSI color escapes.
    #[must_use]
    pub fn colored(mut self, enabled: bool) -> Self {
        self.sink.color = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        render::{Event, Render},
        tracker::{EventKind, TrackedRecord},
    };

    fn construct_event(record: &TrackedRecord) -> Event<'_> {
        Event {
            kind: EventKind::Construct,
            target: record,
            source: None,
            op: None,
        }
    }

    #[test]
    fn test_colored_output_wraps_tag_in_escapes() {
        let mut renderer = ConsoleRenderer::with_writer(Vec::new());
        let record = TrackedRecord {
            id: Some(0),
            name: "a".to_string(),
            value: "5".to_string(),
            ..TrackedRecord::default()
        };

        renderer.event(&construct_event(&record), 0).unwrap();

        let text = String::from_utf8(renderer.sink.out.clone()).unwrap();
        assert!(text.contains("\x1b[1;37mCTOR \x1b[0m"));
        assert!(text.contains("\x1b[1;33m\"a\" \x1b[0m"));
    }

    #[test]
    fn test_plain_output_has_no_escapes() {
        let mut renderer = ConsoleRenderer::with_writer(Vec::new()).colored(false);
        let record = TrackedRecord {
            id: Some(0),
            name: "a".to_string(),
            value: "5".to_string(),
            ..TrackedRecord::default()
        };

        renderer.event(&construct_event(&record), 0).unwrap();

        let text = String::from_utf8(renderer.sink.out.clone()).unwrap();
        assert_eq!(text, "CTOR \"a\" (id: 0, val: 5, addr: 00000000)\n");
    }
}
