//! Records handed to renderers, HUDs and persistence.

use super::lattice::LatticeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Cluster state sufficient to place every site in world space via the
/// lattice basis of `kind` at angle `theta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub id: u64,
    pub kind: LatticeKind,
    pub spacing: f64,
    pub spacing2: f64,
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub bounding_radius: f64,
    pub sites: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: f64,
    pub height: f64,
    pub step: u64,
    pub temperature: f64,
    pub phase: LatticeKind,
    pub particles: Vec<ParticleSnapshot>,
    pub clusters: Vec<ClusterSnapshot>,
}

impl WorldSnapshot {
    pub fn total_sites(&self) -> usize {
        self.clusters.iter().map(|c| c.sites.len()).sum()
    }
}

/// Aggregate state after one step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u64,
    pub phase: LatticeKind,
    pub temperature: f64,
    pub free_particles: usize,
    pub total_clusters: usize,
    pub phase_clusters: usize,
    pub total_sites: usize,
    pub particle_bindings: usize,
    pub nucleations: usize,
    pub merges: usize,
    /// No free particles left and exactly one cluster.
    pub complete: bool,
}
