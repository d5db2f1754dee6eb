//! The shared styled-text formatting layer.
//!
//! Both text backends render the same indented, tagged event lines; they differ only in how
//! styled segments reach the sink. [`TextRenderer`] owns the event formatting and delegates
//! styling to its [`StyledSink`] strategy.

use std::io;

use crate::{
    render::{Color, Event, Render},
    tracker::{EventKind, Totals, TrackedRecord},
    Result,
};

/// Indentation width per call-stack level.
const TAB_SIZE: usize = 4;

/// The per-backend styling strategy of the text renderers.
///
/// A sink commits styled text segments to its output medium: the console sink wraps them in
/// ANSI escapes, the HTML sink in `<font>` markup. Implementations own their output for
/// their whole lifetime and flush it in [`finish`](StyledSink::finish).
pub trait StyledSink {
    /// Writes one text segment in the given color.
    ///
    /// # Errors
    ///
    /// Returns any I/O failure of the underlying writer.
    fn write_styled(&mut self, color: Color, text: &str) -> io::Result<()>;

    /// Writes the trailing run summary and flushes the output.
    ///
    /// # Errors
    ///
    /// Returns any I/O failure of the underlying writer.
    fn finish(&mut self, summary: &str) -> io::Result<()>;
}

/// Text renderer generic over its styling strategy.
///
/// Renders one indented, color-tagged line per lifecycle event in a fixed layout:
///
/// ```text
/// CTOR "lol" (id: 0, val: 54, addr: 7ffd4a80)
/// COPY "tmp1" (id: 1, val: 54, addr: 7ffd4a88) from "lol" (id: 0, val: 54, addr: 7ffd4a80)
/// ```
///
/// Scope entry prints the scope name and an opening brace and indents subsequent lines;
/// scope exit outdents and closes the brace. The tag vocabulary and colors are shared by
/// every text backend: `CTOR`/`=`/`{op}=` in white, `COPY`/`COPY=` in red, `MOVE`/`MOVE=`
/// in green, `DTOR` in blue.
pub struct TextRenderer<S> {
    pub(crate) sink: S,
}

impl<S: StyledSink> TextRenderer<S> {
    /// Creates a text renderer over the given styling sink.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    fn indent(&mut self, depth: usize) -> io::Result<()> {
        self.sink
            .write_styled(Color::Default, &" ".repeat(TAB_SIZE * depth))
    }

    /// Renders the fixed record layout: `"name" (id: N, val: V, addr: HEX)`.
    fn print_record(&mut self, record: &TrackedRecord) -> io::Result<()> {
        self.sink
            .write_styled(Color::Yellow, &format!("\"{}\" ", record.name))?;
        self.sink.write_styled(Color::Default, "(id: ")?;
        self.sink.write_styled(Color::Purple, &record.display_id())?;
        self.sink.write_styled(Color::Default, ", val: ")?;
        self.sink.write_styled(Color::Purple, &record.value)?;
        self.sink.write_styled(Color::Default, ", addr: ")?;
        self.sink
            .write_styled(Color::Purple, &format!("{:08x}", record.address))?;
        self.sink.write_styled(Color::Default, ")")
    }

    fn tag_color(kind: EventKind) -> Color {
        match kind {
            EventKind::Construct | EventKind::Assign | EventKind::OpAssign => Color::White,
            EventKind::CopyConstruct | EventKind::CopyAssign => Color::Red,
            EventKind::MoveConstruct | EventKind::MoveAssign => Color::Green,
            EventKind::Destruct => Color::Blue,
        }
    }
}

impl<S: StyledSink> Render for TextRenderer<S> {
    fn enter_scope(&mut self, name: &str, depth: usize) -> Result<()> {
        self.indent(depth)?;
        self.sink.write_styled(Color::Default, name)?;
        self.sink.write_styled(Color::Default, "\n")?;
        self.indent(depth)?;
        self.sink.write_styled(Color::Default, "{\n")?;
        Ok(())
    }

    fn exit_scope(&mut self, depth: usize) -> Result<()> {
        self.indent(depth)?;
        self.sink.write_styled(Color::Default, "}\n")?;
        Ok(())
    }

    fn event(&mut self, event: &Event<'_>, depth: usize) -> Result<()> {
        self.indent(depth)?;
        let tag = event.kind.tag(event.op);
        self.sink
            .write_styled(Self::tag_color(event.kind), &format!("{tag} "))?;
        self.print_record(event.target)?;

        if let Some(source) = event.source {
            self.sink.write_styled(Color::Default, " from ")?;
            self.print_record(source)?;
        }

        self.sink.write_styled(Color::Default, "\n")?;
        Ok(())
    }

    fn finish(&mut self, totals: &Totals) -> Result<()> {
        self.sink.finish(&totals.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that records every styled segment for assertions.
    #[derive(Default)]
    struct CaptureSink {
        segments: Vec<(Color, String)>,
        summary: Option<String>,
    }

    impl StyledSink for CaptureSink {
        fn write_styled(&mut self, color: Color, text: &str) -> io::Result<()> {
            self.segments.push((color, text.to_string()));
            Ok(())
        }

        fn finish(&mut self, summary: &str) -> io::Result<()> {
            self.summary = Some(summary.to_string());
            Ok(())
        }
    }

    fn record(id: u64, name: &str, value: &str) -> TrackedRecord {
        TrackedRecord {
            id: Some(id),
            name: name.to_string(),
            value: value.to_string(),
            address: 0x1000,
            ..TrackedRecord::default()
        }
    }

    fn rendered(renderer: &TextRenderer<CaptureSink>) -> String {
        renderer
            .sink
            .segments
            .iter()
            .map(|(_, text)| text.as_str())
            .collect()
    }

    #[test]
    fn test_construct_line_layout() {
        let mut renderer = TextRenderer::new(CaptureSink::default());
        let target = record(0, "lol", "54");
        let event = Event {
            kind: EventKind::Construct,
            target: &target,
            source: None,
            op: None,
        };

        renderer.event(&event, 1).unwrap();

        assert_eq!(
            rendered(&renderer),
            "    CTOR \"lol\" (id: 0, val: 54, addr: 00001000)\n"
        );
    }

    #[test]
    fn test_copy_line_includes_source() {
        let mut renderer = TextRenderer::new(CaptureSink::default());
        let source = record(0, "a", "5");
        let target = record(1, "tmp1", "5");
        let event = Event {
            kind: EventKind::CopyConstruct,
            target: &target,
            source: Some(&source),
            op: None,
        };

        renderer.event(&event, 0).unwrap();

        let text = rendered(&renderer);
        assert!(text.starts_with("COPY \"tmp1\" "));
        assert!(text.contains(" from \"a\" (id: 0, val: 5, addr: 00001000)"));
        assert_eq!(renderer.sink.segments[0].0, Color::Red);
    }

    #[test]
    fn test_scope_braces_and_indent() {
        let mut renderer = TextRenderer::new(CaptureSink::default());
        renderer.enter_scope("main", 0).unwrap();
        renderer.exit_scope(0).unwrap();

        assert_eq!(rendered(&renderer), "main\n{\n}\n");
    }

    #[test]
    fn test_finish_forwards_summary() {
        let mut renderer = TextRenderer::new(CaptureSink::default());
        let totals = Totals {
            objects: 2,
            copies: 1,
            moves: 0,
        };

        renderer.finish(&totals).unwrap();

        assert_eq!(
            renderer.sink.summary.as_deref(),
            Some("2 objects created, 1 copied, 0 moved")
        );
    }

    #[test]
    fn test_tag_colors() {
        assert_eq!(
            TextRenderer::<CaptureSink>::tag_color(EventKind::Construct),
            Color::White
        );
        assert_eq!(
            TextRenderer::<CaptureSink>::tag_color(EventKind::MoveAssign),
            Color::Green
        );
        assert_eq!(
            TextRenderer::<CaptureSink>::tag_color(EventKind::Destruct),
            Color::Blue
        );
    }
}
