//! Plain data records shared by the crystallite crates.
//!
//! Nothing in here knows how to move, bind or render; behaviour lives in
//! `crystallite_core` as extension traits over these types.

pub mod data;

pub use data::cluster::{Candidate, Cluster, Pose, RigidVelocity};
pub use data::entity::{Particle, Position, Velocity};
pub use data::lattice::{LatticeKind, SiteKey};
pub use data::snapshot::{ClusterSnapshot, ParticleSnapshot, StepReport, WorldSnapshot};
