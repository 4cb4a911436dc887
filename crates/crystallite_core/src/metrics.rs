//! Run statistics and structured logging for the simulation.
//!
//! Counters accumulate over a run; the per-step report itself is produced by
//! the world and only recorded here.

use crystallite_data::StepReport;
use std::collections::BTreeMap;

pub const PARTICLE_BINDINGS: &str = "particle_bindings";
pub const NUCLEATIONS: &str = "nucleations";
pub const MERGES: &str = "merges";
pub const MERGE_CONFLICTS: &str = "merge_conflicts";

/// Cumulative counters for one simulation run.
#[derive(Debug, Clone)]
pub struct Metrics {
    step_count: u64,
    log_interval: u64,
    counters: BTreeMap<String, u64>,
    last_report: Option<StepReport>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(500)
    }
}

impl Metrics {
    /// Creates a collector that logs a summary every `log_interval` steps.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            step_count: 0,
            log_interval: log_interval.max(1),
            counters: BTreeMap::new(),
            last_report: None,
        }
    }

    /// Records a completed step and folds its event counts into the totals.
    pub fn record_step(&mut self, report: &StepReport) {
        self.step_count += 1;
        self.add(PARTICLE_BINDINGS, report.particle_bindings as u64);
        self.add(NUCLEATIONS, report.nucleations as u64);
        self.add(MERGES, report.merges as u64);
        self.last_report = Some(*report);

        tracing::debug!(
            step = report.step,
            phase = %report.phase,
            free = report.free_particles,
            clusters = report.total_clusters,
            sites = report.total_sites,
            "Step"
        );

        if self.step_count % self.log_interval == 0 {
            tracing::info!(
                step = report.step,
                phase = %report.phase,
                temperature = report.temperature,
                free = report.free_particles,
                clusters = report.total_clusters,
                sites = report.total_sites,
                bindings = self.counter(PARTICLE_BINDINGS),
                nucleations = self.counter(NUCLEATIONS),
                merges = self.counter(MERGES),
                "Simulation progress"
            );
        }
    }

    /// Increments a named counter by one.
    pub fn increment_counter(&mut self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &str, amount: u64) {
        *self.counters.entry(name.to_string()).or_insert(0) += amount;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }

    /// Forgets everything; used when the world is reseeded.
    pub fn reset(&mut self) {
        self.step_count = 0;
        self.counters.clear();
        self.last_report = None;
    }

    /// Logs a simulation event.
    pub fn log_event(&self, event_type: &str, details: &str) {
        tracing::info!(event_type = event_type, details = details, "Simulation event");
    }
}

/// Initialize tracing subscriber for logging. Honors `RUST_LOG`, defaulting
/// to `info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
