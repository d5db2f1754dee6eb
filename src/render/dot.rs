//! Graphviz DOT rendering of value flow.
//!
//! This backend builds a directed graph in which every node is one *version* of a tracked
//! value: a fresh identity starts at version 0 and each assignment to the same identity
//! allocates the next version, so the graph shows value evolution over time without losing
//! earlier states. Edges record causality (copy, move, assign, destruct) and real-time
//! event order (sequential-execution edges chaining each emitted node to the previous one).
//!
//! DOT requires every node referenced by an edge to be declared first, so the renderer
//! accumulates two ordered entry streams, nodes and links, and concatenates them
//! node-stream-first when the artifact is written at finish.

use std::{
    collections::HashMap,
    fmt::{self, Write as _},
    fs::File,
    io::{self, Write as _},
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    render::{
        escape::{escape_dot, escape_html},
        Event, Render,
    },
    tracker::{EventKind, Totals, TrackedRecord},
    Error, Result,
};

/// Deferred-entry key of the graph-level summary label.
const SUMMARY_KEY: &str = "summary";

/// Per-channel darkening applied for each level of scope nesting.
const CLUSTER_SHADE_STEP: u8 = 0x14;

/// One version of a tracked identity, as a graph node.
///
/// Negative version numbers are reserved for synthetic operator nodes so that they can
/// never collide with real value versions; the direct-edge model emitted here does not
/// allocate any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GraphNode {
    id: u64,
    version: i32,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_id_{}_index_{}", self.id, self.version)
    }
}

/// Edge taxonomy, each kind with its own color/style attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    /// Real-time event ordering.
    Exec,
    /// Lifetime-closing edge from a value's origin to its destruction node.
    Destruct,
    Copy,
    Move,
    Assign,
}

impl LinkKind {
    fn attributes(self) -> &'static str {
        match self {
            LinkKind::Assign => "[color=black]",
            LinkKind::Copy => "[color=\"#f14c4c\"]",
            LinkKind::Move => "[color=\"#23d18b\"]",
            LinkKind::Exec => "[weight=100, style=dashed, color=\"#d670d6\"]",
            LinkKind::Destruct => "[style=dashed, color=\"#3b8eea\"]",
        }
    }
}

/// One pending piece of artifact text.
///
/// A `Deferred` entry names content that is only known at flush time; it is resolved
/// against the renderer's content table while the artifact is written.
#[derive(Debug)]
enum Entry {
    Literal(String),
    Deferred(String),
}

/// An append-only, ordered stream of artifact entries.
#[derive(Debug, Default)]
struct EntryStream {
    entries: Vec<Entry>,
}

impl EntryStream {
    fn defer(&mut self, key: &str) {
        self.entries.push(Entry::Deferred(key.to_string()));
    }

    fn write_to(
        &self,
        out: &mut dyn io::Write,
        contents: &HashMap<String, String>,
    ) -> io::Result<()> {
        for entry in &self.entries {
            match entry {
                Entry::Literal(text) => out.write_all(text.as_bytes())?,
                Entry::Deferred(key) => {
                    if let Some(text) = contents.get(key) {
                        out.write_all(text.as_bytes())?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Write for EntryStream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(Entry::Literal(last)) = self.entries.last_mut() {
            last.push_str(s);
        } else {
            self.entries.push(Entry::Literal(s.to_string()));
        }
        Ok(())
    }
}

/// The graph backend: value flow as a Graphviz DOT artifact, optionally rendered to PNG.
///
/// # Graph model
///
/// - Every construction declares version 0 of a fresh identity; every assignment to an
///   existing identity declares its next version.
/// - Each declared node is chained to the previously declared one with a dashed
///   sequential-execution edge, so the left-to-right reading order of the graph is the
///   real event order.
/// - Copy and move constructions add a causal edge from the source's current version to
///   the new node (red and green respectively); copy/move/operator assignments add a black
///   assign edge. Literal assignments have no causal predecessor.
/// - Destruction declares a diamond `DTR` node and closes the value's lifetime arc with a
///   dashed blue edge from version 0 of the same identity.
/// - Scope entry opens a `subgraph cluster` shaded darker for each nesting level.
///
/// # Artifact
///
/// The `.dot` file is written at [`finish`](Render::finish): first every node declaration,
/// then every edge declaration, then the closing brace. If an image path is configured the
/// external Graphviz tool is invoked on the artifact; a missing or failing tool is logged
/// and otherwise ignored, leaving the artifact in place.
///
/// # Examples
///
/// ```rust,no_run
/// use lifescope::{render::DotRenderer, Tracker};
///
/// let tracker = Tracker::new();
/// let renderer = DotRenderer::create("trace.dot")?.with_image("trace.png");
/// tracker.add_renderer(Box::new(renderer));
/// # Ok::<(), lifescope::Error>(())
/// ```
pub struct DotRenderer {
    path: PathBuf,
    /// Taken at finish; `None` afterwards.
    file: Option<File>,
    image: Option<PathBuf>,
    graphviz: String,
    nodes: EntryStream,
    links: EntryStream,
    contents: HashMap<String, String>,
    /// Next version per tracked identity.
    versions: HashMap<u64, i32>,
    /// Tail of the sequential-execution chain.
    last: Option<GraphNode>,
    clusters: usize,
}

impl DotRenderer {
    /// Creates the artifact file and the graph preamble.
    ///
    /// The file is opened eagerly so that an unwritable path fails here, at construction,
    /// rather than at the end of the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`] if the artifact file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Sink {
            path: path.to_path_buf(),
            source,
        })?;

        let mut renderer = Self {
            path: path.to_path_buf(),
            file: Some(file),
            image: None,
            graphviz: "dot".to_string(),
            nodes: EntryStream::default(),
            links: EntryStream::default(),
            contents: HashMap::new(),
            versions: HashMap::new(),
            last: None,
            clusters: 0,
        };

        let _ = writeln!(renderer.nodes, "digraph\n{{\ndpi = 400;");
        let _ = write!(renderer.nodes, "label=\"");
        renderer.nodes.defer(SUMMARY_KEY);
        let _ = writeln!(renderer.nodes, "\"\nlabelloc=b;");
        renderer.end_node();

        Ok(renderer)
    }

    /// Also renders the artifact to a PNG at the given path when the run finishes.
    #[must_use]
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    /// Overrides the Graphviz command invoked for image rendering (default `dot`).
    #[must_use]
    pub fn with_graphviz_command(mut self, command: impl Into<String>) -> Self {
        self.graphviz = command.into();
        self
    }

    /// Returns the artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Allocates the next version node for an identity (version 0 on first contact).
    fn alloc_node(&mut self, id: u64) -> GraphNode {
        let version = self.versions.entry(id).or_insert(0);
        let node = GraphNode { id, version: *version };
        *version += 1;
        node
    }

    /// Returns the latest declared version of an identity.
    fn current_node(&self, id: u64) -> GraphNode {
        let version = self.versions.get(&id).copied().unwrap_or(1) - 1;
        GraphNode { id, version }
    }

    /// Declares a value-version node as a record table: name, reason, id/val/addr.
    fn declare_value_node(&mut self, node: GraphNode, record: &TrackedRecord, reason: &str) {
        let _ = writeln!(
            self.nodes,
            "{node} [shape=none, label=<\n<TABLE BORDER=\"2\">"
        );
        let _ = writeln!(
            self.nodes,
            "<TR>\n<TD COLSPAN=\"3\"><FONT COLOR=\"#d1d110\">\"{}\"</FONT></TD>\n</TR>",
            escape_html(&record.name)
        );
        let _ = writeln!(
            self.nodes,
            "<TR>\n<TD COLSPAN=\"3\"><FONT COLOR=\"#e5e5e5\">{}</FONT></TD>\n</TR>",
            escape_html(reason)
        );
        let _ = writeln!(
            self.nodes,
            "<TR>\n<TD>id: <FONT COLOR=\"#d670d6\">\"{}\"</FONT></TD>\n\
             <TD>val: <FONT COLOR=\"#d670d6\">\"{}\"</FONT></TD>\n\
             <TD>addr: <FONT COLOR=\"#d670d6\">\"{:x}\"</FONT></TD>\n</TR>",
            record.display_id(),
            escape_html(&record.value),
            record.address
        );
        let _ = writeln!(self.nodes, "</TABLE>\n>];");
        self.end_node();
    }

    /// Declares the diamond node marking a destruction.
    fn declare_destruct_node(&mut self, node: GraphNode, record: &TrackedRecord) {
        let _ = writeln!(
            self.nodes,
            "{node} [label = \"DTR \\\"{}\\\"\", shape = \"diamond\", \
             style = \"filled, bold\", fillcolor = \"#3b8eea\", fontsize = 15]",
            escape_dot(&record.name)
        );
        self.end_node();
    }

    fn end_node(&mut self) {
        let _ = writeln!(
            self.nodes,
            "\n// {}",
            "-".repeat(75)
        );
    }

    fn link(&mut self, from: GraphNode, to: GraphNode, kind: LinkKind) {
        let _ = writeln!(self.links, "{from} -> {to}{};", kind.attributes());
    }

    /// Chains a newly declared node into the sequential-execution order.
    fn link_exec(&mut self, to: GraphNode) {
        if let Some(last) = self.last {
            self.link(last, to, LinkKind::Exec);
        }
        self.last = Some(to);
    }
}

impl Render for DotRenderer {
    fn enter_scope(&mut self, name: &str, depth: usize) -> Result<()> {
        let shade = 0xFFu8.saturating_sub(
            CLUSTER_SHADE_STEP.saturating_mul(u8::try_from(depth + 1).unwrap_or(u8::MAX)),
        );
        let _ = writeln!(self.nodes, "subgraph cluster_{} {{", self.clusters);
        self.clusters += 1;
        let _ = writeln!(self.nodes, "label=\"{}\"", escape_dot(name));
        let _ = writeln!(
            self.nodes,
            "style=filled; color=\"#{shade:02x}{shade:02x}{shade:02x}\""
        );
        self.end_node();
        Ok(())
    }

    fn exit_scope(&mut self, _depth: usize) -> Result<()> {
        let _ = writeln!(self.nodes, "}}");
        Ok(())
    }

    fn event(&mut self, event: &Event<'_>, _depth: usize) -> Result<()> {
        let Some(id) = event.target.id else {
            return Ok(());
        };
        let reason = event.kind.tag(event.op);

        match event.kind {
            EventKind::Construct => {
                let node = self.alloc_node(id);
                self.declare_value_node(node, event.target, &reason);
                self.link_exec(node);
            }
            EventKind::CopyConstruct | EventKind::MoveConstruct => {
                let node = self.alloc_node(id);
                self.declare_value_node(node, event.target, &reason);
                self.link_exec(node);

                let kind = if event.kind == EventKind::CopyConstruct {
                    LinkKind::Copy
                } else {
                    LinkKind::Move
                };
                if let Some(source_id) = event.source.and_then(|s| s.id) {
                    let source_node = self.current_node(source_id);
                    self.link(source_node, node, kind);
                }
            }
            EventKind::Assign => {
                let node = self.alloc_node(id);
                self.declare_value_node(node, event.target, &reason);
                self.link_exec(node);
            }
            EventKind::CopyAssign | EventKind::MoveAssign | EventKind::OpAssign => {
                let node = self.alloc_node(id);
                self.declare_value_node(node, event.target, &reason);
                self.link_exec(node);

                if let Some(source_id) = event.source.and_then(|s| s.id) {
                    let source_node = self.current_node(source_id);
                    self.link(source_node, node, LinkKind::Assign);
                }
            }
            EventKind::Destruct => {
                let node = self.alloc_node(id);
                self.declare_destruct_node(node, event.target);
                self.link_exec(node);
                self.link(GraphNode { id, version: 0 }, node, LinkKind::Destruct);
            }
        }

        Ok(())
    }

    fn finish(&mut self, totals: &Totals) -> Result<()> {
        self.contents
            .insert(SUMMARY_KEY.to_string(), escape_dot(&totals.to_string()));

        let Some(mut file) = self.file.take() else {
            return Ok(());
        };

        self.nodes.write_to(&mut file, &self.contents)?;
        self.links.write_to(&mut file, &self.contents)?;
        file.write_all(b"}\n")?;
        file.flush()?;
        drop(file);

        if let Some(image) = &self.image {
            match Command::new(&self.graphviz)
                .arg("-Tpng")
                .arg(&self.path)
                .arg("-o")
                .arg(image)
                .status()
            {
                Ok(status) if status.success() => {
                    log::debug!("rendered {} to {}", self.path.display(), image.display());
                }
                Ok(status) => {
                    log::warn!("graphviz exited with {status} on {}", self.path.display());
                }
                Err(e) => {
                    log::warn!("failed to invoke graphviz command {:?}: {e}", self.graphviz);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_versions_increment_per_identity() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = DotRenderer::create(dir.path().join("trace.dot")).unwrap();

        assert_eq!(renderer.alloc_node(0), GraphNode { id: 0, version: 0 });
        assert_eq!(renderer.alloc_node(0), GraphNode { id: 0, version: 1 });
        assert_eq!(renderer.alloc_node(1), GraphNode { id: 1, version: 0 });
        assert_eq!(renderer.current_node(0), GraphNode { id: 0, version: 1 });
        assert_eq!(renderer.current_node(1), GraphNode { id: 1, version: 0 });
    }

    #[test]
    fn test_node_names() {
        assert_eq!(
            GraphNode { id: 3, version: 2 }.to_string(),
            "node_id_3_index_2"
        );
    }

    #[test]
    fn test_entry_stream_defers_content() {
        let mut stream = EntryStream::default();
        let _ = write!(stream, "before ");
        stream.defer("late");
        let _ = write!(stream, " after");

        let mut contents = HashMap::new();
        contents.insert("late".to_string(), "resolved".to_string());

        let mut out = Vec::new();
        stream.write_to(&mut out, &contents).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "before resolved after");
    }

    #[test]
    fn test_entry_stream_unresolved_key_renders_empty() {
        let mut stream = EntryStream::default();
        stream.defer("missing");

        let mut out = Vec::new();
        stream.write_to(&mut out, &HashMap::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_exec_chain_links_previous_node() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = DotRenderer::create(dir.path().join("trace.dot")).unwrap();

        let first = renderer.alloc_node(0);
        renderer.link_exec(first);
        assert!(renderer.links.entries.is_empty(), "no edge before a predecessor exists");

        let second = renderer.alloc_node(1);
        renderer.link_exec(second);

        let mut out = Vec::new();
        renderer.links.write_to(&mut out, &HashMap::new()).unwrap();
        let links = String::from_utf8(out).unwrap();
        assert!(links.contains("node_id_0_index_0 -> node_id_1_index_0"));
        assert!(links.contains("style=dashed"));
    }
}
