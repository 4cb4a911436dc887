/// Asserts that every live cluster is lattice-connected.
#[macro_export]
macro_rules! assert_all_connected {
    ($world:expr) => {
        for cluster in &$world.clusters {
            assert!(
                crystallite_lib::model::ClusterLogic::is_connected(cluster),
                "Cluster {} ({}) is disconnected at step {}",
                cluster.id,
                cluster.kind,
                $world.step
            );
        }
    };
}

/// Asserts that every particle and every cluster's bounding circle lies
/// inside the domain.
#[macro_export]
macro_rules! assert_inside_domain {
    ($world:expr) => {
        let eps = 1e-9;
        for p in &$world.particles {
            assert!(
                p.position.x >= p.radius - eps && p.position.x <= $world.width - p.radius + eps,
                "Particle x {} outside at step {}",
                p.position.x,
                $world.step
            );
            assert!(
                p.position.y >= p.radius - eps && p.position.y <= $world.height - p.radius + eps,
                "Particle y {} outside at step {}",
                p.position.y,
                $world.step
            );
        }
        for c in &$world.clusters {
            let r = c.bounding_radius;
            assert!(
                c.pose.x >= r - eps && c.pose.x <= $world.width - r + eps,
                "Cluster {} x {} within {} of a wall",
                c.id,
                c.pose.x,
                r
            );
            assert!(
                c.pose.y >= r - eps && c.pose.y <= $world.height - r + eps,
                "Cluster {} y {} within {} of a wall",
                c.id,
                c.pose.y,
                r
            );
        }
    };
}
