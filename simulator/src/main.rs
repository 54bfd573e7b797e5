use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use sinecore::engine::{Command, Engine};
use sinecore::signal::LogSink;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Interactive sine generator driver")]
struct Args {
    /// Run a fixed number of ticks without a timer and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 50.0)]
    amplitude: f64,
    /// Frequency in Hz
    #[arg(long, default_value_t = 10.0)]
    frequency: f64,
    /// Phase in degrees
    #[arg(long, default_value_t = 0.0)]
    phase: f64,
    /// Tick period in milliseconds
    #[arg(long, default_value_t = 100)]
    interval: u64,
    /// Ticks produced by an offline run
    #[arg(long, default_value_t = 1000)]
    ticks: usize,
    /// Keep the GUI bridge alive and generate in real time
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Start generating immediately when serving
    #[arg(long, default_value_t = false)]
    autostart: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig {
            ticks: args.ticks,
            autostart: args.autostart,
            ..WorkflowConfig::from_args(args.amplitude, args.frequency, args.phase, args.interval)
        }
    };
    workflow_config.validate()?;

    if args.offline {
        let runner = Runner::new(workflow_config.clone());
        let result = runner.execute()?;

        let range = result
            .range
            .map(|r| format!("{:.4}..{:.4}", r.start, r.end))
            .unwrap_or_else(|| "empty".into());
        println!(
            "Offline run -> emitted {}, buffered {}, evicted {}, range {}, rms {:.4}",
            result.emitted,
            result.samples.len(),
            result.evictions,
            range,
            result.rms
        );

        let extent = result
            .value_extent
            .map(|e| format!("{:.4}..{:.4}", e.start, e.end))
            .unwrap_or_else(|| "empty".into());
        let report = format!(
            "amplitude={} frequency={} phase={} emitted={} buffered={} range={} values={} rms={:.6}\n",
            workflow_config.amplitude,
            workflow_config.frequency,
            workflow_config.phase_degrees,
            result.emitted,
            result.samples.len(),
            range,
            extent,
            result.rms
        );
        let report_path = PathBuf::from("tools/data/offline_samples.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for sampling engine")?;
        runtime.block_on(async {
            let (engine, handle) = Engine::new(workflow_config.to_sampler_config(), LogSink::new());
            let task = engine.spawn();
            let gui_bridge = GuiBridge::new(handle.clone());

            if workflow_config.autostart {
                handle
                    .send(Command::Start(workflow_config.to_start_request()))
                    .context("starting generation")?;
            }

            tokio::spawn(gui_bridge.clone().serve(gui_bind_address()));
            gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");

            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            handle.send(Command::Shutdown).context("stopping engine")?;
            task.await.context("joining sampling engine")?;
            let metrics = handle.metrics();
            gui_bridge.publish_status(&format!(
                "Stopped after {} ticks ({} evictions)",
                metrics.ticks, metrics.evictions
            ));
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
