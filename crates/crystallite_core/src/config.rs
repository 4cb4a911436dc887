//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections map onto `config.toml`. Every section is
//! `#[serde(default)]`, so a file only needs the keys it changes.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags of the headless runner (override the file)
//!
//! Physically meaningless values are clamped into range by
//! [`AppConfig::sanitized`], never rejected.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 800.0
//! height = 600.0
//! particle_count = 400
//! seed = 42
//!
//! [lattice]
//! spacing = 18.0
//! aspect_ratio = 1.4
//!
//! [binding]
//! angle_tolerance = 0.15
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// Domain extent, population and seeding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub particle_count: usize,
    /// Distance from each wall kept free when scattering particles on reset.
    pub spawn_margin: f64,
    /// Single-site clusters placed on reset, the first one at the domain centre.
    pub seed_clusters: usize,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub initial_temperature: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            particle_count: 400,
            spawn_margin: 20.0,
            seed_clusters: 1,
            seed: None,
            initial_temperature: 20.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LatticeConfig {
    /// Base spacing `a`.
    pub spacing: f64,
    /// Rect lattices use `a2 = spacing × aspect_ratio`.
    pub aspect_ratio: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            spacing: 18.0,
            aspect_ratio: 1.4,
        }
    }
}

impl LatticeConfig {
    /// `(a, a2)` for a lattice of `kind`.
    pub fn spacings(&self, kind: crystallite_data::LatticeKind) -> (f64, f64) {
        match kind {
            crystallite_data::LatticeKind::Rect => (self.spacing, self.spacing * self.aspect_ratio),
            _ => (self.spacing, self.spacing),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub radius: f64,
    pub capture_radius: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            capture_radius: 6.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Linear velocity factor applied every step.
    pub friction: f64,
    /// Angular velocity factor; damps less than `friction`.
    pub angular_friction: f64,
    /// Fraction of normal speed kept on a wall bounce.
    pub restitution: f64,
    /// Width of the uniform angular kick a cluster receives each step.
    pub angular_noise: f64,
    /// Cluster translational noise as a fraction of particle drift.
    pub cluster_drift_scale: f64,
    /// Impulse multiplier for `jolt`, relative to the current drift.
    pub jolt_strength: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.96,
            angular_friction: 0.98,
            restitution: 0.6,
            angular_noise: 0.004,
            cluster_drift_scale: 0.25,
            jolt_strength: 4.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BindingConfig {
    /// Largest orientation residual (radians) at which two clusters may merge.
    pub angle_tolerance: f64,
    /// Cap on candidate sites collected per cluster scan.
    pub max_candidates: usize,
    /// Replaces the temperature-derived particle-binding probability.
    pub particle_probability_override: Option<f64>,
    /// Replaces the temperature-derived cluster-binding probability.
    pub cluster_probability_override: Option<f64>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            angle_tolerance: 0.15,
            max_candidates: 256,
            particle_probability_override: None,
            cluster_probability_override: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Steps between `info`-level progress lines.
    pub log_interval: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { log_interval: 500 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub lattice: LatticeConfig,
    pub particle: ParticleConfig,
    pub physics: PhysicsConfig,
    pub binding: BindingConfig,
    pub metrics: MetricsConfig,
}

fn clamp_logged(field: &str, value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    let clamped = if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback.clamp(lo, hi)
    };
    if clamped != value {
        tracing::warn!(field, value, clamped, "Config value out of range, clamped");
    }
    clamped
}

fn clamp_count(field: &str, value: usize, lo: usize, hi: usize) -> usize {
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        tracing::warn!(field, value, clamped, "Config value out of range, clamped");
    }
    clamped
}

fn clamp_probability(field: &str, value: Option<f64>) -> Option<f64> {
    value.map(|p| clamp_logged(field, p, 0.0, 1.0, 1.0))
}

impl AppConfig {
    /// Copy with every field clamped into its physically valid range.
    ///
    /// Order matters: the domain is fixed first, then lengths that must fit
    /// inside it, then radii that must fit inside the lattice spacing.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let d = AppConfig::default();
        let mut c = self.clone();

        c.world.width = clamp_logged("world.width", c.world.width, 50.0, 20_000.0, d.world.width);
        c.world.height = clamp_logged("world.height", c.world.height, 50.0, 20_000.0, d.world.height);
        let short_side = c.world.width.min(c.world.height);
        c.world.particle_count = clamp_count("world.particle_count", c.world.particle_count, 0, 200_000);
        c.world.spawn_margin = clamp_logged(
            "world.spawn_margin",
            c.world.spawn_margin,
            0.0,
            short_side / 4.0,
            d.world.spawn_margin,
        );
        c.world.seed_clusters = clamp_count("world.seed_clusters", c.world.seed_clusters, 0, 64);
        c.world.initial_temperature = clamp_logged(
            "world.initial_temperature",
            c.world.initial_temperature,
            crate::phase::TEMPERATURE_MIN,
            crate::phase::TEMPERATURE_MAX,
            d.world.initial_temperature,
        );

        c.lattice.spacing = clamp_logged(
            "lattice.spacing",
            c.lattice.spacing,
            1.0,
            short_side / 4.0,
            d.lattice.spacing,
        );
        c.lattice.aspect_ratio = clamp_logged(
            "lattice.aspect_ratio",
            c.lattice.aspect_ratio,
            0.25,
            4.0,
            d.lattice.aspect_ratio,
        );

        c.particle.radius = clamp_logged(
            "particle.radius",
            c.particle.radius,
            0.1,
            short_side / 8.0,
            d.particle.radius,
        );
        c.particle.capture_radius = clamp_logged(
            "particle.capture_radius",
            c.particle.capture_radius,
            0.1,
            c.lattice.spacing,
            d.particle.capture_radius,
        );

        c.physics.friction = clamp_logged("physics.friction", c.physics.friction, 0.0, 0.999, d.physics.friction);
        c.physics.angular_friction = clamp_logged(
            "physics.angular_friction",
            c.physics.angular_friction,
            0.0,
            0.999,
            d.physics.angular_friction,
        );
        c.physics.restitution = clamp_logged(
            "physics.restitution",
            c.physics.restitution,
            0.0,
            1.0,
            d.physics.restitution,
        );
        c.physics.angular_noise = clamp_logged(
            "physics.angular_noise",
            c.physics.angular_noise,
            0.0,
            0.5,
            d.physics.angular_noise,
        );
        c.physics.cluster_drift_scale = clamp_logged(
            "physics.cluster_drift_scale",
            c.physics.cluster_drift_scale,
            0.0,
            1.0,
            d.physics.cluster_drift_scale,
        );
        c.physics.jolt_strength = clamp_logged(
            "physics.jolt_strength",
            c.physics.jolt_strength,
            0.0,
            100.0,
            d.physics.jolt_strength,
        );

        c.binding.angle_tolerance = clamp_logged(
            "binding.angle_tolerance",
            c.binding.angle_tolerance,
            0.0,
            PI,
            d.binding.angle_tolerance,
        );
        c.binding.max_candidates = clamp_count("binding.max_candidates", c.binding.max_candidates, 1, 1_000_000);
        c.binding.particle_probability_override =
            clamp_probability("binding.particle_probability_override", c.binding.particle_probability_override);
        c.binding.cluster_probability_override =
            clamp_probability("binding.cluster_probability_override", c.binding.cluster_probability_override);

        if c.metrics.log_interval == 0 {
            tracing::warn!(field = "metrics.log_interval", "Config value out of range, clamped");
            c.metrics.log_interval = 1;
        }

        c
    }

    /// Parses TOML and clamps the result.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        Ok(config.sanitized())
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    /// A file that exists but does not parse is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Digest of every parameter that shapes a trajectory. The seed is
    /// included; the logging section is not.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.lattice).as_bytes());
        hasher.update(format!("{:?}", self.particle).as_bytes());
        hasher.update(format!("{:?}", self.physics).as_bytes());
        hasher.update(format!("{:?}", self.binding).as_bytes());
        hex::encode(hasher.finalize())
    }
}
