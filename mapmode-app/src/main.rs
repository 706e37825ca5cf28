//! Runs one of the mapmode demos.
//!
//! ```text
//! mapmode-app <polygon|zooming|markers|clustering> [--fixtures DIR] [--options FILE] [--script FILE]
//! ```
//!
//! With `--script` the demo is driven headlessly by a JSON list of steps and
//! one report line is printed per step. Without it the egui viewer opens.

mod script;
#[cfg(feature = "gui")]
mod viewer;

use anyhow::{Context, Result};
use clap::Parser;
use mapmode::{
    core::config::DemoOptions,
    demos::DemoKind,
    prelude::*,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mapmode-app")]
#[command(version, about = "Runs one of the mapmode demos", long_about = None)]
struct Args {
    /// Demo to run: polygon, zooming, markers or clustering
    demo: DemoKind,

    /// Directory holding the GeoJSON fixtures
    #[arg(long, default_value = "fixtures")]
    fixtures: PathBuf,

    /// JSON file overriding the demo's preset options
    #[arg(long)]
    options: Option<PathBuf>,

    /// JSON list of steps to replay headlessly
    #[arg(long)]
    script: Option<PathBuf>,
}

fn build_demo(args: &Args) -> Result<DemoSpec> {
    let options = match &args.options {
        Some(path) => DemoOptions::from_json_file(path)?,
        None => args.demo.profile().resolve(),
    };
    let demo = args
        .demo
        .build_with(&args.fixtures, options)
        .with_context(|| format!("building the {} demo", args.demo))?;
    log::info!(
        "{} demo: {} overview features, drill-down {}",
        demo.name,
        demo.overview.dataset.len(),
        if demo.drill_down.is_some() { "yes" } else { "no" }
    );
    Ok(demo)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let demo = build_demo(&args)?;

    match &args.script {
        Some(path) => {
            let steps = script::load(path)?;
            for report in script::replay(demo, &steps)? {
                println!("{}", serde_json::to_string(&report)?);
            }
            Ok(())
        }
        None => run_viewer(demo),
    }
}

#[cfg(feature = "gui")]
fn run_viewer(demo: DemoSpec) -> Result<()> {
    viewer::run(demo)
}

#[cfg(not(feature = "gui"))]
fn run_viewer(_demo: DemoSpec) -> Result<()> {
    anyhow::bail!("built without the gui feature; pass --script to replay headlessly")
}
