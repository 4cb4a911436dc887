//! Headless runner: loads configuration, applies command-line overrides,
//! drives a [`World`] and optionally writes the final snapshot.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::model::config::AppConfig;
use crate::model::persistence::save_snapshot;
use crate::model::world::World;
use crystallite_data::StepReport;

/// Everything the runner can be told from outside.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub steps: u64,
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
    pub snapshot: Option<PathBuf>,
    /// Steps between progress lines; 0 disables them.
    pub report_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.toml"),
            steps: 10_000,
            temperature: None,
            seed: None,
            snapshot: None,
            report_every: 0,
        }
    }
}

pub struct App {
    pub world: World,
    pub options: RunOptions,
}

impl App {
    pub fn new(options: RunOptions) -> Result<Self> {
        let config = AppConfig::load_or_default(&options.config_path)
            .with_context(|| format!("loading {}", options.config_path.display()))?;
        Ok(Self::with_config(config, options))
    }

    /// Builds the world from an already-loaded config; overrides in
    /// `options` win over the file.
    pub fn with_config(mut config: AppConfig, options: RunOptions) -> Self {
        if let Some(seed) = options.seed {
            config.world.seed = Some(seed);
        }
        if let Some(t) = options.temperature {
            config.world.initial_temperature = t;
        }
        let world = World::new(config);
        Self { world, options }
    }

    /// Steps until the crystal is complete or the step budget runs out.
    pub fn run(&mut self) -> Result<StepReport> {
        let mut report = self.world.report();
        for _ in 0..self.options.steps {
            report = self.world.update();
            if self.options.report_every > 0 && report.step % self.options.report_every == 0 {
                tracing::info!(
                    step = report.step,
                    phase = %report.phase,
                    free = report.free_particles,
                    clusters = report.total_clusters,
                    sites = report.total_sites,
                    "Progress"
                );
            }
            if report.complete {
                break;
            }
        }

        tracing::info!(
            step = report.step,
            complete = report.complete,
            free = report.free_particles,
            clusters = report.total_clusters,
            sites = report.total_sites,
            merges = self.world.metrics.counter(crate::model::metrics::MERGES),
            "Run finished"
        );

        if let Some(path) = &self.options.snapshot {
            save_snapshot(&self.world.snapshot(), path)
                .with_context(|| format!("saving snapshot to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Snapshot written");
        }
        Ok(report)
    }
}
