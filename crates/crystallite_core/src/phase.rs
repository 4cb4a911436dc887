//! Temperature control mapped to the active lattice phase and the
//! per-step drift and binding probabilities.

use crate::config::BindingConfig;
use crystallite_data::LatticeKind;

pub const TEMPERATURE_MIN: f64 = 0.0;
pub const TEMPERATURE_MAX: f64 = 100.0;

const DRIFT_BASE: f64 = 0.05;
const DRIFT_PER_DEGREE: f64 = 0.012;
const BIND_PROBABILITY_COLD: f64 = 0.95;
const BIND_PROBABILITY_PER_DEGREE: f64 = 0.008;
const CLUSTER_PROBABILITY_OFFSET: f64 = 0.15;
const CLUSTER_PROBABILITY_MIN: f64 = 0.05;
const CLUSTER_PROBABILITY_MAX: f64 = 0.95;

/// Band boundaries: cold hex, warm square, hot rect.
const HEX_BELOW: f64 = TEMPERATURE_MAX / 3.0;
const SQUARE_BELOW: f64 = 2.0 * TEMPERATURE_MAX / 3.0;

pub fn clamp_temperature(t: f64) -> f64 {
    if t.is_finite() {
        t.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX)
    } else {
        TEMPERATURE_MIN
    }
}

pub fn phase_for_temperature(t: f64) -> LatticeKind {
    let t = clamp_temperature(t);
    if t < HEX_BELOW {
        LatticeKind::Hex
    } else if t < SQUARE_BELOW {
        LatticeKind::Square
    } else {
        LatticeKind::Rect
    }
}

/// Everything the step needs that depends on temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseParams {
    pub temperature: f64,
    pub kind: LatticeKind,
    /// Width of the uniform velocity kick a particle receives per step.
    pub drift: f64,
    pub particle_bind_probability: f64,
    pub cluster_bind_probability: f64,
}

impl PhaseParams {
    pub fn from_temperature(temperature: f64, binding: &BindingConfig) -> Self {
        let t = clamp_temperature(temperature);
        let derived_particle =
            (BIND_PROBABILITY_COLD - BIND_PROBABILITY_PER_DEGREE * t).clamp(0.0, 1.0);
        let derived_cluster = (derived_particle - CLUSTER_PROBABILITY_OFFSET)
            .clamp(CLUSTER_PROBABILITY_MIN, CLUSTER_PROBABILITY_MAX);

        let particle_bind_probability = binding
            .particle_probability_override
            .map_or(derived_particle, |p| p.clamp(0.0, 1.0));
        let cluster_bind_probability = binding
            .cluster_probability_override
            .map_or(derived_cluster, |p| p.clamp(0.0, 1.0));

        Self {
            temperature: t,
            kind: phase_for_temperature(t),
            drift: DRIFT_BASE + DRIFT_PER_DEGREE * t,
            particle_bind_probability,
            cluster_bind_probability,
        }
    }

    /// Probability for a particle pair to nucleate a new cluster.
    pub fn nucleation_probability(&self) -> f64 {
        self.particle_bind_probability * 0.5
    }
}
