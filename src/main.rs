use anyhow::Result;
use clap::Parser;
use crystallite_lib::app::{App, RunOptions};
use crystallite_lib::model::metrics::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless 2D crystallization run", long_about = None)]
struct Args {
    /// Config file; missing file means defaults
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Step budget; the run also stops once a single crystal remains
    #[arg(short, long, default_value_t = 10_000)]
    steps: u64,

    /// Temperature control in [0, 100]
    #[arg(short, long)]
    temperature: Option<f64>,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final snapshot here (.json or .json.gz)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Log a progress line every N steps (0 = off)
    #[arg(long, default_value_t = 0)]
    report_every: u64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut app = App::new(RunOptions {
        config_path: args.config,
        steps: args.steps,
        temperature: args.temperature,
        seed: args.seed,
        snapshot: args.snapshot,
        report_every: args.report_every,
    })?;
    let report = app.run()?;

    println!(
        "step {} | phase {} | free {} | clusters {} ({} in phase) | sites {} | complete {}",
        report.step,
        report.phase,
        report.free_particles,
        report.total_clusters,
        report.phase_clusters,
        report.total_sites,
        report.complete
    );
    Ok(())
}
