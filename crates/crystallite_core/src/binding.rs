//! The three binding rules, run once per step in fixed order:
//! particle to cluster, particle pair to new cluster, cluster merge.
//!
//! Every decision is a Bernoulli draw from the injected RNG, so a seeded
//! generator reproduces a run exactly.

use crate::cluster::{empty_cluster, ClusterLogic};
use crate::config::AppConfig;
use crate::lattice::{self, rotate, symmetry_step};
use crate::particle::Bounds;
use crate::phase::PhaseParams;
use crate::spatial_hash::SpatialHash;
use crystallite_data::{Cluster, LatticeKind, Particle, Pose, SiteKey};
use rand::Rng;
use std::collections::HashSet;

/// Coarse particle reject: beyond `bounding_radius + factor × max(a, a2)`.
const PARTICLE_REACH_FACTOR: f64 = 1.5;

pub struct BindingContext<'a, R: Rng> {
    pub config: &'a AppConfig,
    pub phase: PhaseParams,
    pub bounds: Bounds,
    pub rng: &'a mut R,
}

impl<'a, R: Rng> BindingContext<'a, R> {
    #[inline]
    fn capture_sq(&self) -> f64 {
        let r = self.config.particle.capture_radius;
        r * r
    }
}

/// Event counts for one pass over the three rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingOutcome {
    pub particle_bindings: usize,
    pub nucleations: usize,
    pub merges: usize,
    pub merge_conflicts: usize,
}

/// Alignment of cluster B onto A's integer frame: `p_A = rotate(p_B, rotation) + t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub rotation: i32,
    pub translation: (i32, i32),
}

impl Alignment {
    #[inline]
    pub fn apply(&self, kind: LatticeKind, key: SiteKey) -> SiteKey {
        let (ti, tj) = self.translation;
        rotate(kind, key, self.rotation).offset(ti, tj)
    }
}

/// Runs all three rules and drops consumed particles from the live set.
///
/// `index` must have been built from `particles` after this step's motion.
pub fn run<R: Rng>(
    ctx: &mut BindingContext<R>,
    particles: &mut Vec<Particle>,
    clusters: &mut Vec<Cluster>,
    index: &SpatialHash,
    next_cluster_id: &mut u64,
) -> BindingOutcome {
    let mut consumed = vec![false; particles.len()];
    let mut outcome = BindingOutcome {
        particle_bindings: bind_particles_to_clusters(ctx, particles, &mut consumed, clusters),
        ..Default::default()
    };
    outcome.nucleations = nucleate_pairs(ctx, particles, &mut consumed, clusters, index, next_cluster_id);

    let mut flags = consumed.iter();
    particles.retain(|_| !flags.next().copied().unwrap_or(false));

    let (merges, conflicts) = merge_clusters(ctx, clusters);
    outcome.merges = merges;
    outcome.merge_conflicts = conflicts;
    outcome
}

/// Rule 1. Each live particle gets at most one trial per phase-matching
/// cluster, against the first candidate site inside the capture radius, and
/// binds at most once.
pub fn bind_particles_to_clusters<R: Rng>(
    ctx: &mut BindingContext<R>,
    particles: &[Particle],
    consumed: &mut [bool],
    clusters: &mut [Cluster],
) -> usize {
    let capture_sq = ctx.capture_sq();
    let max_candidates = ctx.config.binding.max_candidates;
    let probability = ctx.phase.particle_bind_probability;
    let mut bound = 0;

    for (pi, particle) in particles.iter().enumerate() {
        if consumed[pi] {
            continue;
        }
        let (px, py) = (particle.position.x, particle.position.y);

        for cluster in clusters.iter_mut() {
            if cluster.kind != ctx.phase.kind {
                continue;
            }
            let reach = cluster.bounding_radius + PARTICLE_REACH_FACTOR * cluster.max_spacing();
            let (dx, dy) = (px - cluster.pose.x, py - cluster.pose.y);
            if dx * dx + dy * dy > reach * reach {
                continue;
            }

            let hit = cluster.candidates(max_candidates).iter().find(|c| {
                let (cx, cy) = (c.x - px, c.y - py);
                cx * cx + cy * cy <= capture_sq
            });
            let Some(site) = hit.map(|c| c.key) else {
                continue;
            };
            if !ctx.rng.gen_bool(probability) {
                continue;
            }

            cluster.absorb_momentum(1.0, particle.velocity.vx, particle.velocity.vy, 0.0);
            cluster.add(site.i(), site.j());
            cluster.recompute_bounding_radius();
            cluster.confine(ctx.bounds, ctx.config.physics.restitution);
            consumed[pi] = true;
            bound += 1;
            tracing::trace!(cluster = cluster.id, i = site.i(), j = site.j(), "Particle bound");
            break;
        }
    }
    bound
}

/// Rule 2. Pairs of still-live particles inside the capture radius fuse into
/// a new two-site cluster of the active phase with probability
/// [`PhaseParams::nucleation_probability`].
pub fn nucleate_pairs<R: Rng>(
    ctx: &mut BindingContext<R>,
    particles: &[Particle],
    consumed: &mut [bool],
    clusters: &mut Vec<Cluster>,
    index: &SpatialHash,
    next_cluster_id: &mut u64,
) -> usize {
    let capture_sq = ctx.capture_sq();
    let probability = ctx.phase.nucleation_probability();
    let kind = ctx.phase.kind;
    let mut nearby = Vec::new();
    let mut created = 0;

    for i in 0..particles.len() {
        if consumed[i] {
            continue;
        }
        let first = &particles[i];
        index.neighbors_into(first.position.x, first.position.y, &mut nearby);

        for &j in &nearby {
            if j <= i || j >= particles.len() || consumed[j] {
                continue;
            }
            let second = &particles[j];
            let dx = second.position.x - first.position.x;
            let dy = second.position.y - first.position.y;
            if dx * dx + dy * dy > capture_sq {
                continue;
            }
            if !ctx.rng.gen_bool(probability) {
                continue;
            }

            let pose = Pose {
                x: first.position.x,
                y: first.position.y,
                theta: lattice::snap_angle(kind, dy.atan2(dx)),
            };
            let id = *next_cluster_id;
            *next_cluster_id += 1;
            let mut cluster = empty_cluster(id, kind, &ctx.config.lattice, pose);
            cluster.add(0, 0);
            cluster.add(1, 0);
            cluster.velocity.vx = (first.velocity.vx + second.velocity.vx) * 0.5;
            cluster.velocity.vy = (first.velocity.vy + second.velocity.vy) * 0.5;
            cluster.recompute_bounding_radius();
            cluster.confine(ctx.bounds, ctx.config.physics.restitution);
            tracing::trace!(cluster = id, kind = %kind, theta = pose.theta, "Nucleation");
            clusters.push(cluster);

            consumed[i] = true;
            consumed[j] = true;
            created += 1;
            break;
        }
    }
    created
}

/// Rule 3. Returns `(merges, conflicts)`.
///
/// After every merge the pair scan restarts from the front. Pairs already
/// tried this pass are skipped by id, except pairs involving the host of a
/// merge: its sites changed, so they are tried again. Each merge removes a
/// cluster, so the scan terminates.
pub fn merge_clusters<R: Rng>(ctx: &mut BindingContext<R>, clusters: &mut Vec<Cluster>) -> (usize, usize) {
    let mut tried: HashSet<(u64, u64)> = HashSet::new();
    let mut merges = 0;
    let mut conflicts = 0;

    'restart: loop {
        for a in 0..clusters.len() {
            for b in (a + 1)..clusters.len() {
                let key = (clusters[a].id.min(clusters[b].id), clusters[a].id.max(clusters[b].id));
                if !tried.insert(key) {
                    continue;
                }
                let (ca, cb) = pair_mut(clusters, a, b);
                let Some(alignment) = try_align(ctx, ca, cb, &mut conflicts) else {
                    continue;
                };
                if !ctx.rng.gen_bool(ctx.phase.cluster_bind_probability) {
                    continue;
                }

                let absorbed = clusters.remove(b);
                let host = &mut clusters[a];
                merge_into(host, &absorbed, alignment);
                host.confine(ctx.bounds, ctx.config.physics.restitution);
                let host_id = host.id;
                tried.retain(|&(x, y)| x != host_id && y != host_id);
                tracing::trace!(
                    host = host.id,
                    absorbed = absorbed.id,
                    rotation = alignment.rotation,
                    sites = host.site_count(),
                    "Clusters merged"
                );
                merges += 1;
                continue 'restart;
            }
        }
        break;
    }
    (merges, conflicts)
}

/// Moves every site of `b` into `a` under `alignment` and blends momentum.
pub fn merge_into(a: &mut Cluster, b: &Cluster, alignment: Alignment) {
    a.absorb_momentum(b.mass(), b.velocity.vx, b.velocity.vy, b.velocity.omega);
    for &key in b.sites() {
        let (i, j) = alignment.apply(a.kind, key).coords();
        a.add(i, j);
    }
    a.recompute_bounding_radius();
}

/// First conflict-free alignment of `b` onto `a`, or `None` when the pair is
/// out of reach, misaligned, or every contact collides.
fn try_align<R: Rng>(
    ctx: &BindingContext<R>,
    a: &mut Cluster,
    b: &mut Cluster,
    conflicts: &mut usize,
) -> Option<Alignment> {
    if a.kind != ctx.phase.kind || b.kind != ctx.phase.kind || a.kind != b.kind {
        return None;
    }
    let capture = ctx.config.particle.capture_radius;
    let reach = a.bounding_radius + b.bounding_radius + capture;
    let (dx, dy) = (b.pose.x - a.pose.x, b.pose.y - a.pose.y);
    if dx * dx + dy * dy > reach * reach {
        return None;
    }
    let (k, err) = symmetry_step(a.kind, a.pose.theta, b.pose.theta);
    if err > ctx.config.binding.angle_tolerance {
        return None;
    }

    // B's frame reaches A's frame by turning back `k` periods.
    let rotation = -k;
    let capture_sq = capture * capture;
    let max_candidates = ctx.config.binding.max_candidates;

    for (target, source) in contacts(a, b, capture_sq, max_candidates) {
        let turned = rotate(a.kind, source, rotation);
        let alignment = Alignment {
            rotation,
            translation: (target.i() - turned.i(), target.j() - turned.j()),
        };
        if has_conflict(a, b, alignment) {
            *conflicts += 1;
            continue;
        }
        return Some(alignment);
    }
    None
}

/// `(A-frame key, B-frame key)` pairs that should coincide after merging.
///
/// A's candidates are matched against B's occupied sites first, then B's
/// candidates against A's occupied sites.
fn contacts(a: &mut Cluster, b: &mut Cluster, capture_sq: f64, max_candidates: usize) -> Vec<(SiteKey, SiteKey)> {
    let mut out = Vec::new();

    let b_sites: Vec<(SiteKey, f64, f64)> = occupied_world(b);
    for cand in a.candidates(max_candidates) {
        for &(key, x, y) in &b_sites {
            if within(cand.x, cand.y, x, y, capture_sq) {
                out.push((cand.key, key));
            }
        }
    }

    let a_sites: Vec<(SiteKey, f64, f64)> = occupied_world(a);
    for cand in b.candidates(max_candidates) {
        for &(key, x, y) in &a_sites {
            if within(cand.x, cand.y, x, y, capture_sq) {
                out.push((key, cand.key));
            }
        }
    }
    out
}

fn occupied_world(cluster: &Cluster) -> Vec<(SiteKey, f64, f64)> {
    let basis = cluster.basis();
    cluster
        .sites()
        .iter()
        .map(|&key| {
            let (x, y) = basis.world(cluster.pose.x, cluster.pose.y, key);
            (key, x, y)
        })
        .collect()
}

#[inline]
fn within(ax: f64, ay: f64, bx: f64, by: f64, limit_sq: f64) -> bool {
    let (dx, dy) = (ax - bx, ay - by);
    dx * dx + dy * dy <= limit_sq
}

/// True if any transformed site of `b` lands on an occupied site of `a`.
pub fn has_conflict(a: &Cluster, b: &Cluster, alignment: Alignment) -> bool {
    b.sites().iter().any(|&key| a.contains(alignment.apply(a.kind, key)))
}

/// Two distinct mutable elements, `a < b`.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    let (head, tail) = items.split_at_mut(b);
    (&mut head[a], &mut tail[0])
}
