// Headless runtime - replays a scripted input session against a demo scene
// and prints the per-frame interaction reports as JSON.

use std::path::PathBuf;

use clap::Parser;
use engine::logging::info;
use engine::scene::SceneGraph;
use xr_interaction::{InteractionConfig, InteractionDriver, ReferenceFrame};

mod demo_scene;
mod script;

use script::Step;

#[derive(Parser)]
#[command(name = "headless_runtime")]
#[command(about = "Replay controller input against a demo scene without a headset")]
struct Args {
    /// JSON script of poses, gestures and ticks
    #[arg(short, long)]
    script: PathBuf,

    /// Interaction config (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the report output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    engine::logging::init_logging("XR_LOG");

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => InteractionConfig::load(path)?,
        None => InteractionConfig::default(),
    };
    let steps = script::load(&args.script)?;
    info!("replaying {} steps from {}", steps.len(), args.script.display());

    let mut scene = SceneGraph::new();
    let mut driver = InteractionDriver::new(&mut scene, config)?;
    demo_scene::build(&mut scene, driver.interactive_group())?;

    let mut reports = Vec::new();
    for step in steps {
        match step {
            Step::Pose(pose) => {
                driver.set_tracked_pose(&mut scene, pose.controller, &pose.rigid_transform())?
            }
            Step::Event(event) => {
                let outcome = driver.handle_event(&mut scene, event)?;
                info!("{} on {}: {:?}", event.name(), event.controller(), outcome);
            }
            Step::Tick(frames) => {
                for _ in 0..frames {
                    reports.push(driver.tick(&mut scene)?);
                }
            }
            Step::SessionStart => driver.session_start(&mut scene, ReferenceFrame::base())?,
            Step::SessionEnd => driver.session_end(&mut scene)?,
        }
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{}", output);

    Ok(())
}
