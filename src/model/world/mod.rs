//! The simulation context: both live sets, the clock, the temperature
//! control and the seeded generator every random draw comes from.

use crate::model::config::AppConfig;
use crate::model::metrics::Metrics;
use crate::model::spatial_hash::SpatialHash;
use crystallite_data::{Cluster, Particle, StepReport};
use rand_chacha::ChaCha8Rng;

pub mod commands;
pub mod init;
pub mod snapshot;
pub mod update;

/// One independent crystallization run.
///
/// Several worlds may coexist; nothing is global. Commands such as
/// [`World::reset`] and [`World::jolt`] must be issued between steps.
pub struct World {
    pub width: f64,
    pub height: f64,
    /// Completed steps since the last reset.
    pub step: u64,
    pub particles: Vec<Particle>,
    /// Live clusters in creation order.
    pub clusters: Vec<Cluster>,
    pub config: AppConfig,
    pub metrics: Metrics,
    temperature: f64,
    spatial_hash: SpatialHash,
    rng: ChaCha8Rng,
    next_cluster_id: u64,
    last_report: StepReport,
    position_buffer: Vec<(f64, f64)>,
}
