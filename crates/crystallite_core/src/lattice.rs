//! Lattice geometry for the three crystal symmetries.
//!
//! Pure functions only. World offsets follow `world(i, j) = pose + i·e1 + j·e2`,
//! where the basis `(e1, e2)` comes from [`basis_vectors`]. Rotations act on
//! integer coordinates and are exact permutations of the lattice.

use crystallite_data::{LatticeKind, Pose, SiteKey};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};

/// 2D vector as `(x, y)`.
pub type Vec2 = (f64, f64);

const SQUARE_NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const HEX_NEIGHBORS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

/// Basis vectors of a lattice of `kind` with primary spacing `a1` rotated by
/// `theta`. `a2` is the secondary spacing and is ignored for hex, whose second
/// vector has length `a1` at `theta + 60°`.
pub fn basis_vectors(kind: LatticeKind, a1: f64, theta: f64, a2: f64) -> (Vec2, Vec2) {
    let (s, c) = theta.sin_cos();
    let e1 = (a1 * c, a1 * s);
    let e2 = match kind {
        LatticeKind::Square | LatticeKind::Rect => (-a2 * s, a2 * c),
        LatticeKind::Hex => {
            let (s60, c60) = (theta + FRAC_PI_3).sin_cos();
            (a1 * c60, a1 * s60)
        }
    };
    (e1, e2)
}

/// Precomputed basis for repeated coordinate-to-offset mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub e1: Vec2,
    pub e2: Vec2,
}

impl Basis {
    pub fn new(kind: LatticeKind, a1: f64, theta: f64, a2: f64) -> Self {
        let (e1, e2) = basis_vectors(kind, a1, theta, a2);
        Self { e1, e2 }
    }

    /// Offset of `key` from the lattice origin.
    #[inline]
    pub fn offset(&self, key: SiteKey) -> Vec2 {
        let i = f64::from(key.i());
        let j = f64::from(key.j());
        (i * self.e1.0 + j * self.e2.0, i * self.e1.1 + j * self.e2.1)
    }

    /// World position of `key` for a lattice anchored at `(ox, oy)`.
    #[inline]
    pub fn world(&self, ox: f64, oy: f64, key: SiteKey) -> Vec2 {
        let (dx, dy) = self.offset(key);
        (ox + dx, oy + dy)
    }
}

/// World position of a site given a full pose. Intended for renderers working
/// from snapshots.
pub fn site_world_position(kind: LatticeKind, a1: f64, a2: f64, pose: &Pose, key: SiteKey) -> Vec2 {
    Basis::new(kind, a1, pose.theta, a2).world(pose.x, pose.y, key)
}

/// Lattice-adjacency offsets: 4 for square and rect, 6 for hex.
pub fn neighbor_offsets(kind: LatticeKind) -> &'static [(i32, i32)] {
    match kind {
        LatticeKind::Square | LatticeKind::Rect => &SQUARE_NEIGHBORS,
        LatticeKind::Hex => &HEX_NEIGHBORS,
    }
}

/// Order of the rotational symmetry group: 4, 2 or 6.
pub fn symmetry_order(kind: LatticeKind) -> i32 {
    match kind {
        LatticeKind::Square => 4,
        LatticeKind::Rect => 2,
        LatticeKind::Hex => 6,
    }
}

/// Smallest rotation under which the lattice maps onto itself.
pub fn symmetry_period(kind: LatticeKind) -> f64 {
    match kind {
        LatticeKind::Square => FRAC_PI_2,
        LatticeKind::Rect => PI,
        LatticeKind::Hex => FRAC_PI_3,
    }
}

/// One counter-clockwise rotation by the symmetry period.
pub fn rotate_once(kind: LatticeKind, key: SiteKey) -> SiteKey {
    let (i, j) = key.coords();
    match kind {
        LatticeKind::Square => SiteKey::new(-j, i),
        LatticeKind::Rect => SiteKey::new(-i, -j),
        LatticeKind::Hex => {
            // axial (q, r) -> cube (x, y, z) -> rotate 60° -> axial
            let x = i;
            let z = j;
            let y = -x - z;
            let (rx, _ry, rz) = (-z, -x, -y);
            SiteKey::new(rx, rz)
        }
    }
}

/// Rotation by `steps` symmetry periods; negative steps rotate clockwise.
pub fn rotate(kind: LatticeKind, key: SiteKey, steps: i32) -> SiteKey {
    let turns = steps.rem_euclid(symmetry_order(kind));
    (0..turns).fold(key, |k, _| rotate_once(kind, k))
}

/// Wraps an angle into `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let w = angle.rem_euclid(TAU);
    if w > PI {
        w - TAU
    } else {
        w
    }
}

/// Rotation count `k` and absolute residual `err` aligning orientation
/// `theta_b` onto `theta_a` under the symmetry of `kind`.
///
/// `theta_a ≈ theta_b + k·period`, with `err = |wrap(theta_a − theta_b) − k·period|`.
pub fn symmetry_step(kind: LatticeKind, theta_a: f64, theta_b: f64) -> (i32, f64) {
    let period = symmetry_period(kind);
    let delta = wrap_angle(theta_a - theta_b);
    let k = (delta / period).round();
    let err = (delta - k * period).abs();
    (k as i32, err)
}

/// Nearest multiple of the symmetry period.
pub fn snap_angle(kind: LatticeKind, angle: f64) -> f64 {
    let period = symmetry_period(kind);
    wrap_angle((angle / period).round() * period)
}

/// True when every site is reachable from every other through lattice
/// adjacency. Empty and single-site sets are connected.
pub fn is_connected(kind: LatticeKind, sites: &BTreeSet<SiteKey>) -> bool {
    let Some(&start) = sites.iter().next() else {
        return true;
    };
    let mut seen: HashSet<SiteKey> = HashSet::with_capacity(sites.len());
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);
    while let Some(key) = queue.pop_front() {
        for &(di, dj) in neighbor_offsets(kind) {
            let next = key.offset(di, dj);
            if sites.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == sites.len()
}
