use super::lattice::{LatticeKind, SiteKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rigid-body pose: lattice origin in world space plus orientation (radians).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// Rigid-body velocity: linear per step and angular (radians) per step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidVelocity {
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
}

/// An unoccupied lattice coordinate adjacent to an occupied one, with its
/// world position at the time it was computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub key: SiteKey,
    pub x: f64,
    pub y: f64,
}

fn candidates_start_dirty() -> bool {
    true
}

/// A rigid, rotatable aggregate of bound lattice sites.
///
/// The site set is private so every structural change goes through
/// [`Cluster::insert_site`], which marks the candidate cache dirty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: u64,
    pub kind: LatticeKind,
    /// Primary spacing `a`.
    pub spacing: f64,
    /// Secondary spacing `a2`; equals `spacing` for square and hex.
    pub spacing2: f64,
    pub pose: Pose,
    pub velocity: RigidVelocity,
    pub bounding_radius: f64,
    sites: BTreeSet<SiteKey>,
    #[serde(skip)]
    candidates: Vec<Candidate>,
    #[serde(skip, default = "candidates_start_dirty")]
    candidates_dirty: bool,
}

impl Cluster {
    /// Empty cluster; callers add sites and then recompute the bounding radius.
    pub fn new(id: u64, kind: LatticeKind, spacing: f64, spacing2: f64, pose: Pose) -> Self {
        Self {
            id,
            kind,
            spacing,
            spacing2,
            pose,
            velocity: RigidVelocity::default(),
            bounding_radius: 0.0,
            sites: BTreeSet::new(),
            candidates: Vec::new(),
            candidates_dirty: true,
        }
    }

    pub fn sites(&self) -> &BTreeSet<SiteKey> {
        &self.sites
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn contains(&self, key: SiteKey) -> bool {
        self.sites.contains(&key)
    }

    /// Occupies `key`. Returns false (and leaves the cache alone) when it was
    /// already occupied.
    pub fn insert_site(&mut self, key: SiteKey) -> bool {
        let inserted = self.sites.insert(key);
        if inserted {
            self.candidates_dirty = true;
        }
        inserted
    }

    pub fn invalidate_candidates(&mut self) {
        self.candidates_dirty = true;
    }

    #[inline]
    pub fn candidates_dirty(&self) -> bool {
        self.candidates_dirty
    }

    /// Last stored candidate list. Only meaningful while not dirty.
    pub fn candidate_cache(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Replaces the candidate cache and marks it fresh.
    pub fn store_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.candidates_dirty = false;
    }

    /// Buffer of the previous candidate list, for reuse by the next computation.
    pub fn take_candidate_buffer(&mut self) -> Vec<Candidate> {
        std::mem::take(&mut self.candidates)
    }
}
