use serde::{Deserialize, Serialize};
use std::fmt;

/// Crystal symmetry class of a cluster. Fixed for the cluster's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LatticeKind {
    #[default]
    Square,
    Rect,
    Hex,
}

impl LatticeKind {
    pub const ALL: [LatticeKind; 3] = [LatticeKind::Square, LatticeKind::Rect, LatticeKind::Hex];

    pub fn name(self) -> &'static str {
        match self {
            LatticeKind::Square => "square",
            LatticeKind::Rect => "rect",
            LatticeKind::Hex => "hex",
        }
    }
}

impl fmt::Display for LatticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer lattice coordinate `(i, j)` packed into one 64-bit key.
///
/// `i` occupies the high half and `j` the low half, both as two's-complement
/// `i32`. Ordering is by the packed value: arbitrary but stable, which is what
/// deterministic iteration over a site set needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct SiteKey(u64);

impl SiteKey {
    #[inline]
    pub const fn new(i: i32, j: i32) -> Self {
        Self(((i as u32 as u64) << 32) | (j as u32 as u64))
    }

    #[inline]
    pub const fn i(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    #[inline]
    pub const fn j(self) -> i32 {
        self.0 as u32 as i32
    }

    #[inline]
    pub const fn coords(self) -> (i32, i32) {
        (self.i(), self.j())
    }

    /// Key shifted by an integer offset.
    #[inline]
    pub const fn offset(self, di: i32, dj: i32) -> Self {
        Self::new(self.i().wrapping_add(di), self.j().wrapping_add(dj))
    }

    #[inline]
    pub const fn packed(self) -> u64 {
        self.0
    }
}

impl From<(i32, i32)> for SiteKey {
    fn from((i, j): (i32, i32)) -> Self {
        Self::new(i, j)
    }
}

impl From<SiteKey> for (i32, i32) {
    fn from(key: SiteKey) -> Self {
        key.coords()
    }
}
