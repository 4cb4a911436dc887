//! Core data structures for the crystallite simulation.

pub mod cluster;
pub mod entity;
pub mod lattice;
pub mod snapshot;
