use crate::model::cluster::{cluster_with_sites, ClusterLogic};
use crate::model::config::AppConfig;
use crate::model::lattice;
use crate::model::metrics::Metrics;
use crate::model::phase;
use crate::model::spatial_hash::SpatialHash;
use crate::model::world::World;
use crystallite_data::{Particle, Pose, StepReport};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Initial speed range of scattered particles, per axis.
const SPAWN_SPEED: f64 = 0.5;

impl World {
    /// Builds a world from `config` (sanitized first) and seeds it.
    ///
    /// With `world.seed` unset the generator is seeded from entropy.
    pub fn new(config: AppConfig) -> Self {
        let config = config.sanitized();
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Same as [`World::new`] but with a caller-supplied generator; the
    /// configured seed is ignored.
    pub fn with_rng(config: AppConfig, rng: ChaCha8Rng) -> Self {
        let config = config.sanitized();
        let width = config.world.width;
        let height = config.world.height;
        let mut world = Self {
            width,
            height,
            step: 0,
            particles: Vec::with_capacity(config.world.particle_count),
            clusters: Vec::new(),
            temperature: phase::clamp_temperature(config.world.initial_temperature),
            spatial_hash: SpatialHash::new(config.particle.capture_radius, width, height),
            rng,
            next_cluster_id: 0,
            last_report: StepReport::default(),
            position_buffer: Vec::new(),
            metrics: Metrics::new(config.metrics.log_interval),
            config,
        };
        world.reset();
        tracing::info!(
            fingerprint = %world.config.fingerprint(),
            particles = world.particles.len(),
            "World created"
        );
        world
    }

    /// Clears both live sets and reseeds them: particles scattered
    /// uniformly inside the spawn margin, plus `world.seed_clusters`
    /// single-site clusters of the current phase. The temperature is kept.
    pub fn reset(&mut self) {
        self.clear();
        self.step = 0;
        self.next_cluster_id = 0;
        self.metrics.reset();

        let radius = self.config.particle.radius;
        let margin = self.config.world.spawn_margin.max(radius);
        for _ in 0..self.config.world.particle_count {
            let x = span(&mut self.rng, margin, self.width - margin);
            let y = span(&mut self.rng, margin, self.height - margin);
            let vx = self.rng.gen_range(-SPAWN_SPEED..=SPAWN_SPEED);
            let vy = self.rng.gen_range(-SPAWN_SPEED..=SPAWN_SPEED);
            self.particles.push(Particle::new(x, y, vx, vy, radius));
        }

        let kind = self.phase();
        let period = lattice::symmetry_period(kind);
        for n in 0..self.config.world.seed_clusters {
            let pose = if n == 0 {
                Pose {
                    x: self.width * 0.5,
                    y: self.height * 0.5,
                    theta: 0.0,
                }
            } else {
                Pose {
                    x: span(&mut self.rng, margin, self.width - margin),
                    y: span(&mut self.rng, margin, self.height - margin),
                    theta: self.rng.gen_range(0.0..period),
                }
            };
            let id = self.next_cluster_id;
            self.next_cluster_id += 1;
            let mut cluster = cluster_with_sites(id, kind, &self.config.lattice, pose, &[(0, 0)]);
            cluster.confine(self.bounds(), self.config.physics.restitution);
            self.clusters.push(cluster);
        }

        self.last_report = self.report();
        tracing::debug!(
            particles = self.particles.len(),
            clusters = self.clusters.len(),
            phase = %kind,
            "World reset"
        );
    }
}

/// Uniform in `[lo, hi]`, or the midpoint when the interval is empty.
fn span<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}
