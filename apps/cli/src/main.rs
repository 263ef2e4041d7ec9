// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assise CLI: rebuild a wall from a scene file and print what the
//! placement assistant sees.
//!
//! Units are placed in file order, their joints synthesized and refreshed,
//! then suggestions are generated around the reference unit for the
//! selected unit type. The report (units with adjacency, course stacks,
//! joint meshes, suggestions) is written as JSON.
//!
//! Usage:
//!   assise <scene.json> [options]

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use assise_core::{EngineConfig, SceneArena};
use assise_placement::{Engine, FixedSelection};

mod report;
mod scene_file;

use report::SceneReport;
use scene_file::SceneFile;

#[derive(Debug, Default)]
struct Options {
    scene_path: PathBuf,
    reference: Option<usize>,
    recess_cm: Option<f64>,
    output: Option<PathBuf>,
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,assise=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }
    let options = parse_options(&args)?;
    run(&options)
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options {
        scene_path: PathBuf::from(&args[1]),
        ..Options::default()
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--reference" => {
                i += 1;
                options.reference = Some(value(args, i)?.parse().context("Invalid reference index")?);
            }
            "--recess" => {
                i += 1;
                options.recess_cm = Some(value(args, i)?.parse().context("Invalid recess depth")?);
            }
            "--output" => {
                i += 1;
                options.output = Some(PathBuf::from(value(args, i)?));
            }
            "--compact" => {
                options.compact = true;
            }
            other => {
                print_usage();
                bail!("Unknown option: {}", other);
            }
        }
        i += 1;
    }
    Ok(options)
}

fn value(args: &[String], i: usize) -> Result<&str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("Missing value for {}", args[i - 1]))
}

fn run(options: &Options) -> Result<()> {
    let started = Instant::now();
    let file = SceneFile::load(&options.scene_path)?;
    let config = file.config.clone().unwrap_or_else(EngineConfig::from_env);

    let mut engine = Engine::new(SceneArena::new(), config)
        .context("Cannot load suggestion rules")?
        .with_library(FixedSelection(file.selection.clone()));

    for o in &file.joint_thickness {
        engine
            .set_course_joint_thickness(o.family, o.index, o.thickness_cm)
            .with_context(|| format!("Cannot set {} course {} joint thickness", o.family, o.index))?;
    }

    let mut ids = Vec::with_capacity(file.units.len());
    for (index, draft) in file.units.iter().cloned().enumerate() {
        let id = engine
            .add_unit(draft)
            .with_context(|| format!("Cannot place unit #{}", index))?;
        ids.push(id);
    }
    let frame = engine.process_frame(Instant::now());
    tracing::debug!(
        events = frame.events,
        joints_refreshed = frame.joints_refreshed,
        "Scene settled"
    );

    if let Some(depth) = options.recess_cm.or(file.recess_cm) {
        engine.apply_recess(depth).context("Cannot apply recess")?;
    }

    let reference = options.reference.or(file.reference);
    let suggestions = match reference {
        Some(index) => {
            let id = *ids.get(index).with_context(|| {
                format!("Reference #{} is out of range ({} units)", index, ids.len())
            })?;
            engine.suggestions_for_selection(id)
        }
        None => Vec::new(),
    };

    let report = SceneReport::build(&engine, &ids, reference, suggestions);
    let json = if options.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    match &options.output {
        Some(path) => std::fs::write(path, json.as_bytes())
            .with_context(|| format!("Cannot write report to '{}'", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    tracing::info!(
        units = report.units.len(),
        joints = report.joints.len(),
        suggestions = report.suggestions.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Report written"
    );
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: assise <scene.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --reference <n>   Suggest around unit #n of the scene file");
    eprintln!("  --recess <cm>     Recess every joint by this depth");
    eprintln!("  --output <path>   Write the report to a file instead of stdout");
    eprintln!("  --compact         Single-line JSON");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG          Log filter (default: info,assise=debug)");
    eprintln!("  ASSISE_*          Engine settings when the scene file has no config");
}
