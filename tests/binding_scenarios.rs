mod common;

use common::{WorldBuilder, HEX_TEMPERATURE, SQUARE_TEMPERATURE};
use crystallite_data::{LatticeKind, SiteKey};
use crystallite_lib::model::metrics::{MERGES, MERGE_CONFLICTS, NUCLEATIONS, PARTICLE_BINDINGS};
use crystallite_lib::model::ClusterLogic;

fn site_keys(sites: &[(i32, i32)]) -> Vec<SiteKey> {
    let mut keys: Vec<SiteKey> = sites.iter().map(|&s| SiteKey::from(s)).collect();
    keys.sort();
    keys
}

#[test]
fn test_particle_next_to_candidate_binds() {
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0)])
        .with_particle(419.0, 300.0)
        .build();
    let radius_before = world.clusters[0].bounding_radius;

    let report = world.update();

    assert_eq!(report.particle_bindings, 1);
    assert!(world.particles.is_empty());
    assert_eq!(world.clusters.len(), 1);
    let sites: Vec<SiteKey> = world.clusters[0].sites().iter().copied().collect();
    assert_eq!(sites, site_keys(&[(0, 0), (1, 0)]));
    assert!(world.clusters[0].bounding_radius > radius_before);
    assert_eq!(world.metrics.counter(PARTICLE_BINDINGS), 1);
}

#[test]
fn test_particle_out_of_reach_stays_free() {
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0)])
        .with_particle(600.0, 100.0)
        .build();

    let report = world.update();

    assert_eq!(report.particle_bindings, 0);
    assert_eq!(world.particles.len(), 1);
    assert_eq!(world.clusters[0].site_count(), 1);
}

#[test]
fn test_zero_probability_never_binds() {
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_binding_disabled()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0)])
        .with_particle(419.0, 300.0)
        .with_particle(420.0, 301.0)
        .build();

    world.run(20);

    assert_eq!(world.particles.len(), 2);
    assert_eq!(world.clusters.len(), 1);
    assert_eq!(world.clusters[0].site_count(), 1);
}

#[test]
fn test_inactive_phase_cluster_does_not_grow() {
    // Hex phase is active; the square cluster is frozen.
    let mut world = WorldBuilder::new()
        .with_temperature(HEX_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0)])
        .with_particle(419.0, 300.0)
        .build();

    let report = world.update();

    assert_eq!(report.particle_bindings, 0);
    assert_eq!(world.clusters[0].site_count(), 1);
    assert_eq!(report.phase_clusters, 0);
}

#[test]
fn test_aligned_clusters_merge() {
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0)])
        .with_cluster(LatticeKind::Square, 418.0, 300.0, 0.0, &[(0, 0)])
        .build();

    let report = world.update();

    assert_eq!(report.merges, 1);
    assert_eq!(world.clusters.len(), 1);
    let survivor = &world.clusters[0];
    assert_eq!(survivor.id, 0);
    assert_eq!(survivor.site_count(), 2);
    assert!(survivor.is_connected());
    assert!(world.cluster(1).is_none());
    assert_eq!(world.metrics.counter(MERGES), 1);
}

#[test]
fn test_merge_chain_independent_of_creation_order() {
    // The outer pair only touches after the middle cluster joins the host.
    for order in [[400.0, 418.0, 436.0], [400.0, 436.0, 418.0], [436.0, 400.0, 418.0]] {
        let mut builder = WorldBuilder::new()
            .with_temperature(SQUARE_TEMPERATURE)
            .with_forced_binding();
        for x in order {
            builder = builder.with_cluster(LatticeKind::Square, x, 300.0, 0.0, &[(0, 0)]);
        }
        let mut world = builder.build();

        let report = world.update();

        assert_eq!(report.merges, 2, "creation order {:?}", order);
        assert_eq!(world.clusters.len(), 1);
        assert_eq!(world.clusters[0].site_count(), 3);
        assert!(world.clusters[0].is_connected());
    }
}

#[test]
fn test_hex_merge_across_rotation() {
    // B is turned one hex period; its (0, 0) sits on A's candidate (2, 0)
    // and its (1, 0) lands on A's (2, 1).
    let period = std::f64::consts::FRAC_PI_3;
    let mut world = WorldBuilder::new()
        .with_temperature(HEX_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Hex, 400.0, 300.0, 0.0, &[(0, 0), (1, 0)])
        .with_cluster(LatticeKind::Hex, 436.0, 300.0, period, &[(0, 0), (1, 0)])
        .build();

    let report = world.update();

    assert_eq!(report.merges, 1);
    assert_eq!(world.clusters.len(), 1);
    let host = &world.clusters[0];
    assert_eq!(host.id, 0);
    assert_eq!(host.site_count(), 4);
    assert!(host.is_connected());
    let sites: Vec<SiteKey> = host.sites().iter().copied().collect();
    assert_eq!(sites, site_keys(&[(0, 0), (1, 0), (2, 0), (2, 1)]));
}

#[test]
fn test_clusters_of_different_kinds_never_merge() {
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0)])
        .with_cluster(LatticeKind::Hex, 418.0, 300.0, 0.0, &[(0, 0)])
        .build();

    let report = world.update();

    assert_eq!(report.merges, 0);
    assert_eq!(world.clusters.len(), 2);
}

#[test]
fn test_overlapping_merge_is_rejected() {
    // B's (0, 0) sits on A's candidate (1, 1) while B's (0, -1) sits on
    // A's occupied (1, 0); every alignment found collides.
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Square, 400.0, 300.0, 0.0, &[(0, 0), (1, 0), (2, 0)])
        .with_cluster(LatticeKind::Square, 418.0, 318.0, 0.0, &[(0, 0), (0, -1)])
        .build();

    let report = world.update();

    assert_eq!(report.merges, 0);
    assert_eq!(world.clusters.len(), 2);
    assert!(world.metrics.counter(MERGE_CONFLICTS) >= 1);
    assert_eq!(world.clusters[0].site_count(), 3);
    assert_eq!(world.clusters[1].site_count(), 2);
}

#[test]
fn test_close_pair_nucleates() {
    // Nucleation succeeds with half the particle probability; zero friction
    // keeps the pair in place until it does.
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_config(|c| c.physics.friction = 0.0)
        .with_particle(300.0, 300.0)
        .with_particle(303.0, 300.0)
        .build();

    let mut nucleations = 0;
    for _ in 0..64 {
        nucleations += world.update().nucleations;
        if nucleations > 0 {
            break;
        }
    }

    assert_eq!(nucleations, 1);
    assert!(world.particles.is_empty());
    assert_eq!(world.clusters.len(), 1);
    let nucleus = &world.clusters[0];
    assert_eq!(nucleus.kind, LatticeKind::Square);
    assert_eq!(nucleus.site_count(), 2);
    assert!(nucleus.is_connected());
    assert_eq!(world.metrics.counter(NUCLEATIONS), 1);
}

#[test]
fn test_distant_pair_does_not_nucleate() {
    let mut world = WorldBuilder::new()
        .with_temperature(SQUARE_TEMPERATURE)
        .with_forced_binding()
        .with_particle(100.0, 100.0)
        .with_particle(500.0, 400.0)
        .build();

    let report = world.update();

    assert_eq!(report.nucleations, 0);
    assert_eq!(world.particles.len(), 2);
    assert!(world.clusters.is_empty());
}

#[test]
fn test_temperature_change_switches_growing_phase() {
    let mut world = WorldBuilder::new()
        .with_temperature(HEX_TEMPERATURE)
        .with_forced_binding()
        .with_cluster(LatticeKind::Hex, 200.0, 300.0, 0.0, &[(0, 0)])
        .with_cluster(LatticeKind::Square, 600.0, 300.0, 0.0, &[(0, 0)])
        .build();
    assert_eq!(world.update().phase_clusters, 1);

    world.spawn_particle(619.0, 300.0, 0.0, 0.0);
    world.set_temperature(SQUARE_TEMPERATURE);
    let report = world.update();

    assert_eq!(report.phase, LatticeKind::Square);
    assert_eq!(report.particle_bindings, 1);
    assert_eq!(world.cluster(1).map(|c| c.site_count()), Some(2));
    assert_eq!(world.cluster(0).map(|c| c.site_count()), Some(1));
}
