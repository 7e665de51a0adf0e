use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::GuiBridge;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use trajcore::prelude::DEFAULT_CADENCE_MS;
use workflow::config::ReplayConfig;
use workflow::runner::{Dataset, Runner};

mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Trajectory playback replay driver and data bridge")]
struct Args {
    /// Snapshot stream produced by the simulation (JSON array of triples)
    #[arg(long, default_value = "public/data.json")]
    data: PathBuf,
    /// Load a replay config from YAML instead of the flags below
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_CADENCE_MS)]
    cadence_ms: u64,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Agent whose velocity and time are reported per frame
    #[arg(long)]
    readout_agent: Option<String>,
    /// Play the dataset once on the autoplay clock, logging every frame
    #[arg(long, default_value_t = false)]
    replay: bool,
    /// Serve the dataset over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let replay_config = if let Some(path) = args.workflow {
        ReplayConfig::load(path)?
    } else {
        ReplayConfig::from_args(args.data, args.cadence_ms, args.bind, args.readout_agent)
    };

    let dataset = Arc::new(Dataset::load_or_empty(&replay_config.data));
    let runner = Runner::new(replay_config.clone(), dataset.clone());
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating replay runtime")?;

    if args.replay {
        let report = runtime.block_on(runner.replay(async {
            let _ = signal::ctrl_c().await;
        }))?;
        println!(
            "Replay -> frames {}, final index {}, completed {}, ticks {}, stale ticks {}",
            report.frames_shown,
            report.final_index,
            report.completed,
            report.metrics.ticks_applied,
            report.metrics.stale_ticks
        );
    }
    if args.serve {
        let gui_bridge = GuiBridge::new(runner.dataset(), replay_config.readout_agent.clone());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        runtime.block_on(gui_bridge.serve(replay_config.bind, async {
            let _ = signal::ctrl_c().await;
        }))?;
    }
    if !args.replay && !args.serve {
        info!(
            "loaded {} frames from {}; pass --replay or --serve",
            dataset.series().frame_count(),
            replay_config.data.display()
        );
    }

    Ok(())
}
