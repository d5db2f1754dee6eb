//! Styled HTML file rendering.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{
    render::{escape::escape_html, text::TextRenderer, Color, StyledSink},
    Error, Result,
};

const FONT_SIZE: u32 = 14;

/// Styling sink that wraps segments in `<b><font color=#...>` markup.
///
/// The sink exclusively owns its output file for its whole lifetime. The document header
/// (dark background, generation timestamp) is written at creation; the footer (run summary,
/// closing tags) at finish.
pub struct HtmlSink {
    out: BufWriter<File>,
}

impl HtmlSink {
    fn hex(color: Color) -> Option<&'static str> {
        match color {
            Color::Default => None,
            Color::Black => Some("666666"),
            Color::Red => Some("f14c4c"),
            Color::Green => Some("23d18b"),
            Color::Yellow => Some("f5f543"),
            Color::Blue => Some("3b8eea"),
            Color::Purple => Some("d670d6"),
            Color::Cyan => Some("28b5d8"),
            Color::White => Some("e5e5e5"),
        }
    }
}

impl StyledSink for HtmlSink {
    fn write_styled(&mut self, color: Color, text: &str) -> io::Result<()> {
        let text = escape_html(text);
        match Self::hex(color) {
            Some(hex) => write!(self.out, "<b><font color=#{hex}>{text}</font></b>"),
            None => self.out.write_all(text.as_bytes()),
        }
    }

    fn finish(&mut self, summary: &str) -> io::Result<()> {
        write!(self.out, "\n\n{}\n</span></pre>\n", escape_html(summary))?;
        self.out.flush()
    }
}

/// The rich-text backend: the event log as a styled, self-contained HTML file.
///
/// Same event semantics and layout as the console backend; only the styling medium and the
/// sink differ. The file opens with a header naming the generation time and closes with the
/// run summary.
///
/// # Examples
///
/// ```rust,no_run
/// use lifescope::{render::HtmlRenderer, Tracker};
///
/// let tracker = Tracker::new();
/// tracker.add_renderer(Box::new(HtmlRenderer::create("trace.html")?));
/// # Ok::<(), lifescope::Error>(())
/// ```
pub type HtmlRenderer = TextRenderer<HtmlSink>;

impl TextRenderer<HtmlSink> {
    /// Creates the output file and writes the document header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`] if the file cannot be created. Callers should treat this as
    /// fatal; there is no degraded mode for a renderer without a sink.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Sink {
            path: path.to_path_buf(),
            source,
        })?;

        let mut out = BufWriter::new(file);
        writeln!(
            out,
            "<pre style = \"background-color: #1e1e1e; color: #FFFFFF\">\
             <span class=\"inner-pre\" style=\"font-size: {FONT_SIZE}px\">"
        )?;

        let mut sink = HtmlSink { out };
        sink.write_styled(Color::Red, "lifescope log ")?;
        sink.write_styled(
            Color::Default,
            &format!(
                "generated on {}\n\n",
                chrono::Local::now().format("%a %b %e %H:%M:%S %Y")
            ),
        )?;

        Ok(TextRenderer::new(sink))
    }
}
