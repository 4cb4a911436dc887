mod common;

use common::{total_units, WorldBuilder, HEX_TEMPERATURE, RECT_TEMPERATURE, SQUARE_TEMPERATURE};
use crystallite_data::{LatticeKind, Pose};

fn busy_world(seed: u64, temperature: f64) -> crystallite_lib::model::world::World {
    WorldBuilder::new()
        .with_seed(seed)
        .with_temperature(temperature)
        .with_random_particles(150)
        .with_config(|c| {
            // Room for a loose dendrite without it touching both walls.
            c.world.width = 1200.0;
            c.world.height = 900.0;
            c.lattice.spacing = 12.0;
            c.world.seed_clusters = 2;
        })
        .build()
}

#[test]
fn test_units_conserved_and_clusters_connected() {
    for (seed, temperature) in [(11, HEX_TEMPERATURE), (12, SQUARE_TEMPERATURE), (13, RECT_TEMPERATURE)] {
        let mut world = busy_world(seed, temperature);
        let units = total_units(&world);

        for _ in 0..300 {
            let report = world.update();
            assert_eq!(total_units(&world), units, "units lost at step {}", world.step);
            assert_eq!(report.free_particles + report.total_sites, units);
            assert_all_connected!(world);
            assert_inside_domain!(world);
        }
    }
}

#[test]
fn test_temperature_sweep_keeps_invariants() {
    let mut world = busy_world(21, HEX_TEMPERATURE);
    let units = total_units(&world);

    for t in [HEX_TEMPERATURE, SQUARE_TEMPERATURE, RECT_TEMPERATURE, HEX_TEMPERATURE] {
        world.set_temperature(t);
        for _ in 0..100 {
            world.update();
        }
        assert_eq!(total_units(&world), units);
        assert_all_connected!(world);
        assert_inside_domain!(world);
    }
}

#[test]
fn test_jolt_keeps_bodies_inside() {
    let mut world = busy_world(31, SQUARE_TEMPERATURE);
    for _ in 0..50 {
        world.jolt();
        world.update();
        assert_inside_domain!(world);
    }
}

#[test]
fn test_cluster_ids_are_unique_and_never_reused() {
    let mut world = busy_world(41, HEX_TEMPERATURE);
    let mut highest = world.clusters.iter().map(|c| c.id).max();

    for _ in 0..200 {
        world.update();
        let mut ids: Vec<u64> = world.clusters.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before, "duplicate cluster id at step {}", world.step);

        // New ids only ever grow past everything handed out so far.
        for c in &world.clusters {
            if highest.map_or(true, |h| c.id > h) {
                highest = Some(c.id);
            }
        }
    }

    let fresh = world.spawn_cluster(LatticeKind::Hex, Pose { x: 600.0, y: 450.0, theta: 0.0 }, &[(0, 0)]);
    assert!(fresh.is_some());
    assert!(highest.map_or(true, |h| fresh.map_or(false, |id| id > h)));
}

#[test]
fn test_report_matches_live_state() {
    let mut world = busy_world(51, SQUARE_TEMPERATURE);
    world.run(120);
    let report = world.report();

    assert_eq!(report.step, 120);
    assert_eq!(report.free_particles, world.particles.len());
    assert_eq!(report.total_clusters, world.clusters.len());
    let phase_clusters = world.clusters.iter().filter(|c| c.kind == world.phase()).count();
    assert_eq!(report.phase_clusters, phase_clusters);
    assert_eq!(report.complete, world.particles.is_empty() && world.clusters.len() == 1);
}

#[test]
fn test_reset_restores_population() {
    let mut world = busy_world(61, HEX_TEMPERATURE);
    world.run(100);
    world.reset();

    assert_eq!(world.step, 0);
    assert_eq!(world.particles.len(), 150);
    assert_eq!(world.clusters.len(), 2);
    assert!(world.clusters.iter().all(|c| c.site_count() == 1));
    assert_eq!(world.metrics.step_count(), 0);
}
