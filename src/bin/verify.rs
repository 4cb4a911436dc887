use clap::Parser;
use crystallite_lib::model::lattice::is_connected;
use crystallite_lib::model::persistence::load_snapshot;
use crystallite_data::SiteKey;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Check a saved snapshot for broken invariants", long_about = None)]
struct Args {
    /// Snapshot written by `crystallite --snapshot`
    #[arg(short, long, default_value = "snapshot.json.gz")]
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let snapshot = load_snapshot(&args.input)?;

    println!("Verifying {} (step {})...", args.input.display(), snapshot.step);

    let mut violations = Vec::new();
    for cluster in &snapshot.clusters {
        let sites: BTreeSet<SiteKey> = cluster.sites.iter().map(|&(i, j)| SiteKey::new(i, j)).collect();
        if !is_connected(cluster.kind, &sites) {
            violations.push(format!("cluster {} ({}) is disconnected", cluster.id, cluster.kind));
        }
    }
    for (idx, p) in snapshot.particles.iter().enumerate() {
        let inside_x = p.x >= p.radius && p.x <= snapshot.width - p.radius;
        let inside_y = p.y >= p.radius && p.y <= snapshot.height - p.radius;
        if !(inside_x && inside_y) {
            violations.push(format!("particle {} at ({:.2}, {:.2}) is outside the domain", idx, p.x, p.y));
        }
    }

    println!(
        "{} particles, {} clusters, {} sites",
        snapshot.particles.len(),
        snapshot.clusters.len(),
        snapshot.total_sites()
    );

    if violations.is_empty() {
        println!("OK: all clusters connected, all particles inside the domain");
        Ok(())
    } else {
        for v in &violations {
            println!("FAIL: {}", v);
        }
        anyhow::bail!("{} invariant violation(s)", violations.len())
    }
}
