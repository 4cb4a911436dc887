use serde::{Deserialize, Serialize};

/// World position in domain units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

/// Linear velocity, in domain units per step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub const fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }
}

/// A free, mobile lattice-forming unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Position,
    pub velocity: Velocity,
    /// Draw and wall-contact radius.
    pub radius: f64,
}

impl Particle {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Self {
        Self {
            position: Position::new(x, y),
            velocity: Velocity::new(vx, vy),
            radius,
        }
    }

    pub fn at_rest(x: f64, y: f64, radius: f64) -> Self {
        Self::new(x, y, 0.0, 0.0, radius)
    }
}
