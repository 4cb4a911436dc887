pub mod macros;

use crystallite_data::{LatticeKind, Pose};
use crystallite_lib::model::config::AppConfig;
use crystallite_lib::model::world::World;

/// Temperature inside each phase band.
#[allow(dead_code)]
pub const HEX_TEMPERATURE: f64 = 10.0;
#[allow(dead_code)]
pub const SQUARE_TEMPERATURE: f64 = 50.0;
#[allow(dead_code)]
pub const RECT_TEMPERATURE: f64 = 90.0;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    particles: Vec<(f64, f64, f64, f64)>,
    clusters: Vec<(LatticeKind, Pose, Vec<(i32, i32)>)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    /// Seeded, empty world: no particles, no seed cluster.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.particle_count = 0;
        config.world.seed_clusters = 0;
        config.world.seed = Some(1);
        Self {
            config,
            particles: Vec::new(),
            clusters: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.config.world.initial_temperature = t;
        self
    }

    /// Every Bernoulli trial succeeds.
    pub fn with_forced_binding(mut self) -> Self {
        self.config.binding.particle_probability_override = Some(1.0);
        self.config.binding.cluster_probability_override = Some(1.0);
        self
    }

    /// Every Bernoulli trial fails.
    pub fn with_binding_disabled(mut self) -> Self {
        self.config.binding.particle_probability_override = Some(0.0);
        self.config.binding.cluster_probability_override = Some(0.0);
        self
    }

    pub fn with_particle(mut self, x: f64, y: f64) -> Self {
        self.particles.push((x, y, 0.0, 0.0));
        self
    }

    pub fn with_moving_particle(mut self, x: f64, y: f64, vx: f64, vy: f64) -> Self {
        self.particles.push((x, y, vx, vy));
        self
    }

    pub fn with_cluster(mut self, kind: LatticeKind, x: f64, y: f64, theta: f64, sites: &[(i32, i32)]) -> Self {
        self.clusters.push((kind, Pose { x, y, theta }, sites.to_vec()));
        self
    }

    /// Population scattered by the world's own reset.
    pub fn with_random_particles(mut self, count: usize) -> Self {
        self.config.world.particle_count = count;
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config);
        for (x, y, vx, vy) in self.particles {
            world.spawn_particle(x, y, vx, vy);
        }
        for (kind, pose, sites) in self.clusters {
            world.spawn_cluster(kind, pose, &sites);
        }
        world
    }
}

/// Free particles plus occupied sites; binding only moves units between
/// the two.
#[allow(dead_code)]
pub fn total_units(world: &World) -> usize {
    world.particles.len() + world.clusters.iter().map(|c| c.site_count()).sum::<usize>()
}
