//! File-backed renderer artifacts: HTML log and Graphviz DOT graph.

use std::fs;

use lifescope::prelude::*;

/// Runs the shared scenario: two named values, one compound assignment, one copy,
/// everything destructed inside a `main` scope.
fn run_scenario(tracker: &Tracker) {
    let _main = tracker.scope("main");
    let mut a = Traced::named(tracker, 5, "a");
    let b = Traced::named(tracker, 7, "b");
    a += &b;
    let c = a.clone();
    drop(c);
}

#[test]
fn html_artifact_has_header_events_and_footer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.html");

    let tracker = Tracker::new();
    tracker.add_renderer(Box::new(HtmlRenderer::create(&path).unwrap()));
    run_scenario(&tracker);
    tracker.finish().unwrap();

    let html = fs::read_to_string(&path).unwrap();

    assert!(html.starts_with("<pre style = \"background-color: #1e1e1e;"));
    assert!(html.contains("lifescope log "));
    assert!(html.contains("generated on "));

    // Tagged events carry the palette markup.
    assert!(html.contains("<b><font color=#e5e5e5>CTOR </font></b>"));
    assert!(html.contains("<b><font color=#e5e5e5>+= </font></b>"));
    assert!(html.contains("<b><font color=#f14c4c>COPY </font></b>"));
    assert!(html.contains("<b><font color=#3b8eea>DTOR </font></b>"));
    assert!(html.contains("<b><font color=#f5f543>\"a\" </font></b>"));

    assert!(html.ends_with("3 objects created, 1 copied, 0 moved\n</span></pre>\n"));
}

#[test]
fn html_renderer_fails_fatally_on_unopenable_sink() {
    let result = HtmlRenderer::create("/nonexistent-dir/trace.html");
    assert!(matches!(result, Err(Error::Sink { .. })));
}

#[test]
fn dot_renderer_fails_fatally_on_unopenable_sink() {
    let result = DotRenderer::create("/nonexistent-dir/trace.dot");
    assert!(matches!(result, Err(Error::Sink { .. })));
}

#[test]
fn dot_artifact_declares_nodes_before_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.dot");

    let tracker = Tracker::new();
    tracker.add_renderer(Box::new(DotRenderer::create(&path).unwrap()));
    run_scenario(&tracker);
    tracker.finish().unwrap();

    let dot = fs::read_to_string(&path).unwrap();

    assert!(dot.starts_with("digraph"));
    assert!(dot.trim_end().ends_with('}'));

    let first_edge = dot.find(" -> ").expect("artifact must contain edges");
    let last_declaration = dot.rfind("shape").expect("artifact must declare nodes");
    assert!(
        last_declaration < first_edge,
        "every node declaration must precede every edge declaration"
    );
}

#[test]
fn dot_artifact_versions_and_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.dot");

    let tracker = Tracker::new();
    tracker.add_renderer(Box::new(DotRenderer::create(&path).unwrap()));
    run_scenario(&tracker);
    tracker.finish().unwrap();

    let dot = fs::read_to_string(&path).unwrap();

    // Identity 0 ("a"): version 0 at construction, 1 after `+=`, 2 for the DTR node.
    assert!(dot.contains("node_id_0_index_0 [shape=none"));
    assert!(dot.contains("node_id_0_index_1 [shape=none"));
    assert!(dot.contains("node_id_0_index_2 [label = \"DTR \\\"a\\\"\""));

    // The compound assignment draws a black assign edge from b's current version.
    assert!(dot.contains("node_id_1_index_0 -> node_id_0_index_1[color=black];"));

    // The copy draws a red edge from a's latest version to the fresh identity.
    assert!(dot.contains("node_id_0_index_1 -> node_id_2_index_0[color=\"#f14c4c\"];"));

    // Every destructed identity closes its lifetime arc back to version 0.
    for id in 0..3 {
        let dtr_edge = format!("node_id_{id}_index_0 -> node_id_{id}_index_");
        let found = dot
            .lines()
            .any(|l| l.starts_with(&dtr_edge) && l.contains("#3b8eea"));
        assert!(found, "missing destruct edge for identity {id}");
    }

    // Scope cluster with depth-derived shading.
    assert!(dot.contains("subgraph cluster_0 {"));
    assert!(dot.contains("label=\"main\""));
    assert!(dot.contains("style=filled; color=\"#ebebeb\""));

    // Deferred summary label resolved at finish.
    assert!(dot.contains("label=\"3 objects created, 1 copied, 0 moved\""));

    // Seven events, six sequential-execution edges.
    let exec_edges = dot.matches("weight=100").count();
    assert_eq!(exec_edges, 6);
}

#[test]
fn dot_finish_survives_missing_graphviz_tool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.dot");
    let image = dir.path().join("trace.png");

    let renderer = DotRenderer::create(&path)
        .unwrap()
        .with_image(&image)
        .with_graphviz_command("lifescope-missing-graphviz-binary");

    let tracker = Tracker::new();
    tracker.add_renderer(Box::new(renderer));
    let a = Traced::named(&tracker, 1, "a");
    drop(a);

    tracker.finish().unwrap();

    assert!(path.exists(), "artifact must remain in place");
    assert!(!image.exists(), "no image without the external tool");
}

#[test]
fn finish_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.dot");

    let tracker = Tracker::new();
    tracker.add_renderer(Box::new(DotRenderer::create(&path).unwrap()));
    let a = Traced::named(&tracker, 1, "a");
    drop(a);

    tracker.finish().unwrap();
    let first = fs::read(&path).unwrap();
    tracker.finish().unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn dropping_the_tracker_flushes_renderers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.dot");

    {
        let tracker = Tracker::new();
        tracker.add_renderer(Box::new(DotRenderer::create(&path).unwrap()));
        let a = Traced::named(&tracker, 1, "a");
        drop(a);
    }

    let dot = fs::read_to_string(&path).unwrap();
    assert!(dot.trim_end().ends_with('}'), "drop must flush the artifact");
}
