//! Motion of free particles: damped random walk with inelastic walls.

use crate::config::PhysicsConfig;
use crystallite_data::{Particle, ParticleSnapshot};
use rand::Rng;

/// Rectangular domain `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Uniform sample in `[-width/2, width/2]`.
#[inline]
pub(crate) fn centered_noise<R: Rng + ?Sized>(rng: &mut R, width: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * width
}

/// Keeps `pos` inside `[lo, hi]`, turning the velocity component inward
/// with `restitution` when the wall is hit. If the interval is empty (the
/// body is wider than the domain) the body is parked at its midpoint.
#[inline]
pub(crate) fn reflect_axis(pos: f64, vel: f64, lo: f64, hi: f64, restitution: f64) -> (f64, f64) {
    if lo > hi {
        return ((lo + hi) * 0.5, 0.0);
    }
    if pos < lo {
        (lo, vel.abs() * restitution)
    } else if pos > hi {
        (hi, -vel.abs() * restitution)
    } else {
        (pos, vel)
    }
}

pub trait ParticleLogic {
    /// One step: uniform kick of width `drift` per axis, friction, unit-time
    /// integration, then wall reflection.
    fn step<R: Rng + ?Sized>(&mut self, bounds: Bounds, drift: f64, physics: &PhysicsConfig, rng: &mut R);
    /// Clamps into the domain, reflecting velocity on contact.
    fn confine(&mut self, bounds: Bounds, restitution: f64);
    /// Extra random impulse of width `2 × strength` per axis.
    fn kick<R: Rng + ?Sized>(&mut self, strength: f64, rng: &mut R);
    fn to_snapshot(&self) -> ParticleSnapshot;
}

impl ParticleLogic for Particle {
    fn step<R: Rng + ?Sized>(&mut self, bounds: Bounds, drift: f64, physics: &PhysicsConfig, rng: &mut R) {
        self.velocity.vx += centered_noise(rng, drift);
        self.velocity.vy += centered_noise(rng, drift);
        self.velocity.vx *= physics.friction;
        self.velocity.vy *= physics.friction;
        self.position.x += self.velocity.vx;
        self.position.y += self.velocity.vy;
        self.confine(bounds, physics.restitution);
    }

    fn confine(&mut self, bounds: Bounds, restitution: f64) {
        let r = self.radius;
        let (x, vx) = reflect_axis(self.position.x, self.velocity.vx, r, bounds.width - r, restitution);
        let (y, vy) = reflect_axis(self.position.y, self.velocity.vy, r, bounds.height - r, restitution);
        self.position.x = x;
        self.position.y = y;
        self.velocity.vx = vx;
        self.velocity.vy = vy;
    }

    fn kick<R: Rng + ?Sized>(&mut self, strength: f64, rng: &mut R) {
        self.velocity.vx += centered_noise(rng, 2.0 * strength);
        self.velocity.vy += centered_noise(rng, 2.0 * strength);
    }

    fn to_snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            x: self.position.x,
            y: self.position.y,
            radius: self.radius,
        }
    }
}
