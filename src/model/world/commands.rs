//! Host-side controls. All of these are safe between steps only; none of
//! them fails, and addressing a cluster that no longer exists is a no-op.

use crate::model::cluster::{cluster_with_sites, ClusterLogic};
use crate::model::particle::{Bounds, ParticleLogic};
use crate::model::phase::{self, PhaseParams};
use crate::model::world::World;
use crystallite_data::{Cluster, LatticeKind, Particle, Pose};

impl World {
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Changes the control value for subsequent steps. Live state is kept.
    pub fn set_temperature(&mut self, t: f64) {
        let t = phase::clamp_temperature(t);
        if t != self.temperature {
            tracing::debug!(from = self.temperature, to = t, "Temperature changed");
        }
        self.temperature = t;
    }

    /// Active lattice phase at the current temperature.
    pub fn phase(&self) -> LatticeKind {
        phase::phase_for_temperature(self.temperature)
    }

    pub fn phase_params(&self) -> PhaseParams {
        PhaseParams::from_temperature(self.temperature, &self.config.binding)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Extra random impulse for every particle and cluster, scaled by the
    /// current drift.
    pub fn jolt(&mut self) {
        let drift = self.phase_params().drift;
        let strength = drift * self.config.physics.jolt_strength;
        let cluster_strength = strength * self.config.physics.cluster_drift_scale;
        let angular = self.config.physics.angular_noise * self.config.physics.jolt_strength;

        for particle in &mut self.particles {
            particle.kick(strength, &mut self.rng);
        }
        for cluster in &mut self.clusters {
            cluster.kick(cluster_strength, angular, &mut self.rng);
        }
        tracing::debug!(strength, "Jolt");
    }

    /// Adds a free particle, clamped into the domain.
    pub fn spawn_particle(&mut self, x: f64, y: f64, vx: f64, vy: f64) {
        let mut particle = Particle::new(x, y, vx, vy, self.config.particle.radius);
        particle.confine(self.bounds(), 0.0);
        particle.velocity.vx = vx;
        particle.velocity.vy = vy;
        self.particles.push(particle);
    }

    /// Adds a cluster holding `sites` and returns its id. The site set must
    /// be non-empty and connected; otherwise nothing is added.
    pub fn spawn_cluster(&mut self, kind: LatticeKind, pose: Pose, sites: &[(i32, i32)]) -> Option<u64> {
        let id = self.next_cluster_id;
        let mut cluster = cluster_with_sites(id, kind, &self.config.lattice, pose, sites);
        if cluster.site_count() == 0 || !cluster.is_connected() {
            tracing::warn!(sites = sites.len(), "Rejected empty or disconnected cluster");
            return None;
        }
        cluster.confine(self.bounds(), self.config.physics.restitution);
        self.next_cluster_id += 1;
        self.clusters.push(cluster);
        Some(id)
    }

    pub fn cluster(&self, id: u64) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    pub fn cluster_mut(&mut self, id: u64) -> Option<&mut Cluster> {
        self.clusters.iter_mut().find(|c| c.id == id)
    }

    /// Removes cluster `id` if it is still live.
    pub fn remove_cluster(&mut self, id: u64) -> Option<Cluster> {
        let idx = self.clusters.iter().position(|c| c.id == id)?;
        Some(self.clusters.remove(idx))
    }

    /// Empties both live sets without reseeding.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.clusters.clear();
        self.spatial_hash.clear();
    }
}
