//! Simulation model: the core crates re-exported under one roof plus the
//! [`world::World`] context that owns a run.

pub use crystallite_core::{ClusterLogic, ParticleLogic};
pub mod binding {
    pub use crystallite_core::binding::*;
}
pub mod cluster {
    pub use crystallite_core::cluster::*;
}
pub mod config {
    pub use crystallite_core::config::*;
}
pub mod lattice {
    pub use crystallite_core::lattice::*;
}
pub mod metrics {
    pub use crystallite_core::metrics::*;
}
pub mod particle {
    pub use crystallite_core::particle::*;
}
pub mod phase {
    pub use crystallite_core::phase::*;
}
pub mod spatial_hash {
    pub use crystallite_core::spatial_hash::*;
}
pub mod state {
    pub use crystallite_data::*;
}
pub mod persistence {
    pub use crystallite_io::*;
}

pub mod world;
