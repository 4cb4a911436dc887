//! Rigid-body motion, candidate discovery and structural updates for
//! clusters.

use crate::config::{LatticeConfig, PhysicsConfig};
use crate::lattice::{self, Basis};
use crate::particle::{centered_noise, reflect_axis, Bounds};
use crystallite_data::{Candidate, Cluster, ClusterSnapshot, LatticeKind, Pose, SiteKey};
use rand::Rng;
use std::collections::HashSet;

/// Bounding-radius margin as a fraction of the larger lattice spacing.
pub const BOUNDING_MARGIN_FACTOR: f64 = 0.6;

/// Cluster of `kind` with spacings from `lattice` and no sites yet.
pub fn empty_cluster(id: u64, kind: LatticeKind, lattice: &LatticeConfig, pose: Pose) -> Cluster {
    let (a, a2) = lattice.spacings(kind);
    Cluster::new(id, kind, a, a2, pose)
}

/// Cluster holding `sites`, bounding radius already computed.
pub fn cluster_with_sites(
    id: u64,
    kind: LatticeKind,
    lattice: &LatticeConfig,
    pose: Pose,
    sites: &[(i32, i32)],
) -> Cluster {
    let mut cluster = empty_cluster(id, kind, lattice, pose);
    for &(i, j) in sites {
        cluster.add(i, j);
    }
    cluster.recompute_bounding_radius();
    cluster
}

pub trait ClusterLogic {
    fn basis(&self) -> Basis;
    /// Mass in particle units: the number of occupied sites.
    fn mass(&self) -> f64;
    fn max_spacing(&self) -> f64;
    fn site_world(&self, key: SiteKey) -> (f64, f64);
    /// Rigid-body noise, friction, integration and wall reflection using the
    /// bounding radius. Always invalidates the candidate cache.
    fn step<R: Rng + ?Sized>(&mut self, bounds: Bounds, drift: f64, physics: &PhysicsConfig, rng: &mut R);
    fn confine(&mut self, bounds: Bounds, restitution: f64);
    /// Extra random linear and angular impulse.
    fn kick<R: Rng + ?Sized>(&mut self, strength: f64, angular_strength: f64, rng: &mut R);
    /// Recomputes the candidate cache if dirty. At most `max_count` distinct
    /// candidates are collected.
    fn refresh_candidates(&mut self, max_count: usize);
    fn candidates(&mut self, max_count: usize) -> &[Candidate];
    /// Occupies `(i, j)`; idempotent.
    fn add(&mut self, i: i32, j: i32) -> bool;
    fn recompute_bounding_radius(&mut self);
    /// Mass-weighted average of linear and angular velocity with a body of
    /// `other_mass` moving at `(vx, vy, omega)`.
    fn absorb_momentum(&mut self, other_mass: f64, vx: f64, vy: f64, omega: f64);
    fn is_connected(&self) -> bool;
    fn to_snapshot(&self) -> ClusterSnapshot;
}

impl ClusterLogic for Cluster {
    fn basis(&self) -> Basis {
        Basis::new(self.kind, self.spacing, self.pose.theta, self.spacing2)
    }

    #[inline]
    fn mass(&self) -> f64 {
        self.site_count() as f64
    }

    #[inline]
    fn max_spacing(&self) -> f64 {
        self.spacing.max(self.spacing2)
    }

    fn site_world(&self, key: SiteKey) -> (f64, f64) {
        self.basis().world(self.pose.x, self.pose.y, key)
    }

    fn step<R: Rng + ?Sized>(&mut self, bounds: Bounds, drift: f64, physics: &PhysicsConfig, rng: &mut R) {
        let linear = drift * physics.cluster_drift_scale;
        self.velocity.vx += centered_noise(rng, linear);
        self.velocity.vy += centered_noise(rng, linear);
        self.velocity.omega += centered_noise(rng, physics.angular_noise);

        self.velocity.vx *= physics.friction;
        self.velocity.vy *= physics.friction;
        self.velocity.omega *= physics.angular_friction;

        self.pose.x += self.velocity.vx;
        self.pose.y += self.velocity.vy;
        self.pose.theta = lattice::wrap_angle(self.pose.theta + self.velocity.omega);

        self.confine(bounds, physics.restitution);
        self.invalidate_candidates();
    }

    fn confine(&mut self, bounds: Bounds, restitution: f64) {
        let r = self.bounding_radius;
        let (x, vx) = reflect_axis(self.pose.x, self.velocity.vx, r, bounds.width - r, restitution);
        let (y, vy) = reflect_axis(self.pose.y, self.velocity.vy, r, bounds.height - r, restitution);
        if x != self.pose.x || y != self.pose.y {
            self.invalidate_candidates();
        }
        self.pose.x = x;
        self.pose.y = y;
        self.velocity.vx = vx;
        self.velocity.vy = vy;
    }

    fn kick<R: Rng + ?Sized>(&mut self, strength: f64, angular_strength: f64, rng: &mut R) {
        self.velocity.vx += centered_noise(rng, 2.0 * strength);
        self.velocity.vy += centered_noise(rng, 2.0 * strength);
        self.velocity.omega += centered_noise(rng, 2.0 * angular_strength);
    }

    fn refresh_candidates(&mut self, max_count: usize) {
        if !self.candidates_dirty() {
            return;
        }
        let max_count = max_count.max(1);
        let basis = self.basis();
        let offsets = lattice::neighbor_offsets(self.kind);
        let mut out = self.take_candidate_buffer();
        out.clear();
        let mut seen: HashSet<SiteKey> = HashSet::new();

        'scan: for &key in self.sites() {
            for &(di, dj) in offsets {
                let next = key.offset(di, dj);
                if self.contains(next) || !seen.insert(next) {
                    continue;
                }
                let (x, y) = basis.world(self.pose.x, self.pose.y, next);
                out.push(Candidate { key: next, x, y });
                if out.len() >= max_count {
                    break 'scan;
                }
            }
        }

        self.store_candidates(out);
    }

    fn candidates(&mut self, max_count: usize) -> &[Candidate] {
        self.refresh_candidates(max_count);
        self.candidate_cache()
    }

    fn add(&mut self, i: i32, j: i32) -> bool {
        self.insert_site(SiteKey::new(i, j))
    }

    fn recompute_bounding_radius(&mut self) {
        let basis = self.basis();
        let max_sq = self
            .sites()
            .iter()
            .map(|&key| {
                let (dx, dy) = basis.offset(key);
                dx * dx + dy * dy
            })
            .fold(0.0_f64, f64::max);
        self.bounding_radius = max_sq.sqrt() + BOUNDING_MARGIN_FACTOR * self.max_spacing();
    }

    fn absorb_momentum(&mut self, other_mass: f64, vx: f64, vy: f64, omega: f64) {
        let own = self.mass();
        let total = own + other_mass;
        if total <= 0.0 {
            return;
        }
        self.velocity.vx = (own * self.velocity.vx + other_mass * vx) / total;
        self.velocity.vy = (own * self.velocity.vy + other_mass * vy) / total;
        self.velocity.omega = (own * self.velocity.omega + other_mass * omega) / total;
    }

    fn is_connected(&self) -> bool {
        lattice::is_connected(self.kind, self.sites())
    }

    fn to_snapshot(&self) -> ClusterSnapshot {
        ClusterSnapshot {
            id: self.id,
            kind: self.kind,
            spacing: self.spacing,
            spacing2: self.spacing2,
            x: self.pose.x,
            y: self.pose.y,
            theta: self.pose.theta,
            bounding_radius: self.bounding_radius,
            sites: self.sites().iter().map(|k| k.coords()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square_at(x: f64, y: f64, sites: &[(i32, i32)]) -> Cluster {
        cluster_with_sites(
            1,
            LatticeKind::Square,
            &LatticeConfig::default(),
            Pose { x, y, theta: 0.0 },
            sites,
        )
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut once = square_at(100.0, 100.0, &[(0, 0)]);
        let mut twice = once.clone();
        once.add(1, 0);
        twice.add(1, 0);
        twice.add(1, 0);
        assert_eq!(once.sites(), twice.sites());
    }

    #[test]
    fn test_single_site_square_has_four_candidates() {
        let mut c = square_at(100.0, 100.0, &[(0, 0)]);
        let cands = c.candidates(64);
        assert_eq!(cands.len(), 4);
        let right = cands
            .iter()
            .find(|cand| cand.key == SiteKey::new(1, 0))
            .copied()
            .unwrap();
        assert!((right.x - 118.0).abs() < 1e-9);
        assert!((right.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hex_candidates_deduplicated() {
        let mut c = cluster_with_sites(
            2,
            LatticeKind::Hex,
            &LatticeConfig::default(),
            Pose::default(),
            &[(0, 0), (1, 0)],
        );
        let cands = c.candidates(64).to_vec();
        let unique: HashSet<SiteKey> = cands.iter().map(|c| c.key).collect();
        assert_eq!(unique.len(), cands.len());
        // Two hex sites share two neighbours: 6 + 6 - 2 (each other) - 2 (shared) = 8.
        assert_eq!(cands.len(), 8);
        assert!(cands.iter().all(|cand| !c.contains(cand.key)));
    }

    #[test]
    fn test_candidate_cap_respected() {
        let sites: Vec<(i32, i32)> = (0..20).map(|i| (i, 0)).collect();
        let mut c = square_at(200.0, 200.0, &sites);
        assert_eq!(c.candidates(5).len(), 5);
    }

    #[test]
    fn test_add_invalidates_candidates_immediately() {
        let mut c = square_at(100.0, 100.0, &[(0, 0)]);
        assert!(c.candidates(64).iter().any(|cand| cand.key == SiteKey::new(1, 0)));
        c.add(1, 0);
        assert!(!c.candidates(64).iter().any(|cand| cand.key == SiteKey::new(1, 0)));
        assert!(c.candidates(64).iter().any(|cand| cand.key == SiteKey::new(2, 0)));
    }

    #[test]
    fn test_bounding_radius_grows_with_sites() {
        let mut c = square_at(100.0, 100.0, &[(0, 0)]);
        let before = c.bounding_radius;
        assert!((before - BOUNDING_MARGIN_FACTOR * 18.0).abs() < 1e-9);
        c.add(0, 2);
        c.recompute_bounding_radius();
        assert!((c.bounding_radius - (36.0 + BOUNDING_MARGIN_FACTOR * 18.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rect_radius_uses_larger_spacing() {
        let c = cluster_with_sites(
            3,
            LatticeKind::Rect,
            &LatticeConfig::default(),
            Pose::default(),
            &[(0, 0), (0, 1)],
        );
        let a2 = 18.0 * 1.4;
        assert!((c.bounding_radius - (a2 + BOUNDING_MARGIN_FACTOR * a2)).abs() < 1e-9);
    }

    #[test]
    fn test_step_keeps_bounding_circle_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let physics = PhysicsConfig::default();
        let bounds = Bounds::new(200.0, 200.0);
        let mut c = square_at(30.0, 170.0, &[(0, 0), (1, 0), (2, 0)]);
        c.velocity.vx = -20.0;
        c.velocity.vy = 20.0;
        for _ in 0..50 {
            c.step(bounds, 1.0, &physics, &mut rng);
            let r = c.bounding_radius;
            assert!(c.pose.x >= r && c.pose.x <= bounds.width - r);
            assert!(c.pose.y >= r && c.pose.y <= bounds.height - r);
            assert!(c.candidates_dirty());
        }
    }

    #[test]
    fn test_absorb_momentum_mass_weighted() {
        let mut c = square_at(100.0, 100.0, &[(0, 0), (1, 0), (2, 0)]);
        c.velocity.vx = 1.0;
        c.absorb_momentum(1.0, 5.0, 4.0, 0.4);
        assert!((c.velocity.vx - 2.0).abs() < 1e-12);
        assert!((c.velocity.vy - 1.0).abs() < 1e-12);
        assert!((c.velocity.omega - 0.1).abs() < 1e-12);
    }
}
