//! # Crystallite Core
//!
//! The simulation engine for Crystallite, a 2D crystallization sandbox.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Lattice geometry for square, rectangular and hexagonal symmetry
//! - Damped random-walk motion for particles and rigid clusters
//! - The binding engine (particle capture, nucleation, cluster merging)
//! - Temperature-to-phase mapping
//! - Spatial hashing for neighbourhood queries
//! - Configuration, metrics collection and structured logging
//!
//! ## Architecture
//!
//! Data records live in `crystallite_data`; behaviour is attached here
//! through extension traits ([`ParticleLogic`], [`ClusterLogic`]). All
//! randomness comes from an injected generator, so a seeded run is
//! reproducible.
//!
//! ## Example
//!
//! ```
//! use crystallite_core::cluster::{cluster_with_sites, ClusterLogic};
//! use crystallite_core::config::LatticeConfig;
//! use crystallite_data::{LatticeKind, Pose};
//!
//! let mut cluster = cluster_with_sites(
//!     0,
//!     LatticeKind::Hex,
//!     &LatticeConfig::default(),
//!     Pose::default(),
//!     &[(0, 0)],
//! );
//! assert_eq!(cluster.candidates(64).len(), 6);
//! ```

/// Particle capture, nucleation and cluster merging
pub mod binding;
/// Rigid-body motion and structure of clusters
pub mod cluster;
/// Configuration management for simulation parameters
pub mod config;
/// Lattice bases, rotations and symmetry alignment
pub mod lattice;
/// Run statistics and logging setup
pub mod metrics;
/// Free-particle motion and wall reflection
pub mod particle;
/// Temperature bands and derived probabilities
pub mod phase;
/// Spatial hashing for O(1) proximity queries
pub mod spatial_hash;

pub use binding::{BindingContext, BindingOutcome};
pub use cluster::ClusterLogic;
pub use metrics::{init_logging, Metrics};
pub use particle::{Bounds, ParticleLogic};
pub use phase::PhaseParams;
