use crate::model::cluster::ClusterLogic;
use crate::model::particle::ParticleLogic;
use crate::model::world::World;
use crystallite_data::WorldSnapshot;

impl World {
    /// Renderer-facing copy of the current state. Sites are in lattice
    /// coordinates; map them with `lattice::site_world_position`.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            width: self.width,
            height: self.height,
            step: self.step,
            temperature: self.temperature,
            phase: self.phase(),
            particles: self.particles.iter().map(|p| p.to_snapshot()).collect(),
            clusters: self.clusters.iter().map(|c| c.to_snapshot()).collect(),
        }
    }
}
