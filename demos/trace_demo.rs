//! Demonstration driver: one small teaching scenario through every backend.
//!
//! ```sh
//! cargo run --example trace_demo -- --out-dir target/trace --html --dot
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lifescope::prelude::*;

/// trace_demo - replay a value-lifecycle scenario through the lifescope backends
#[derive(Debug, Parser)]
#[command(name = "trace_demo", version, about, long_about = None)]
struct Cli {
    /// Directory for the HTML and DOT artifacts.
    #[arg(long, default_value = "trace-out")]
    out_dir: PathBuf,

    /// Suppress the console backend.
    #[arg(long)]
    no_console: bool,

    /// Also write the styled HTML log.
    #[arg(long)]
    html: bool,

    /// Also write the Graphviz artifact and render a PNG if `dot` is available.
    #[arg(long)]
    dot: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

/// A helper returning a fresh value, to show scope attribution of temporaries.
fn get_lol(tracker: &Tracker) -> Traced {
    let _scope = tracker.scope("get_lol");
    Traced::new(tracker, 45)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("lifescope", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let tracker = Tracker::new();
    if !cli.no_console {
        tracker.add_renderer(Box::new(ConsoleRenderer::stdout()));
    }
    if cli.html || cli.dot {
        std::fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    }
    if cli.html {
        let path = cli.out_dir.join("trace.html");
        tracker.add_renderer(Box::new(HtmlRenderer::create(&path)?));
        println!("writing {}", path.display());
    }
    if cli.dot {
        let path = cli.out_dir.join("trace.dot");
        let renderer =
            DotRenderer::create(&path)?.with_image(cli.out_dir.join("trace.png"));
        tracker.add_renderer(Box::new(renderer));
        println!("writing {}", path.display());
    }

    {
        let _main = tracker.scope("main");

        let lol = Traced::named(&tracker, 54, "lol");
        let mut lol2 = Traced::named(&tracker, 0, "lol2");

        let mut sum = &lol + &lol;
        lol2.assign_from(&mut sum);

        let mut fresh = get_lol(&tracker);
        lol2.assign_from(&mut fresh);

        println!("\nlol2 = {} via {}", lol2.get(), lol2.history());
    }

    tracker.finish()?;
    Ok(())
}
