use crate::model::binding::{self, BindingContext, BindingOutcome};
use crate::model::cluster::ClusterLogic;
use crate::model::metrics::MERGE_CONFLICTS;
use crate::model::particle::ParticleLogic;
use crate::model::phase::PhaseParams;
use crate::model::world::World;
use crystallite_data::StepReport;

impl World {
    /// Advances the simulation by one step.
    ///
    /// Order is fixed: particle and cluster motion, spatial index rebuild,
    /// then the binding rules (particle capture, nucleation, merging), then
    /// the aggregate report. Never fails; an empty world just ticks.
    pub fn update(&mut self) -> StepReport {
        self.step += 1;
        let phase = self.phase_params();
        let bounds = self.bounds();

        for particle in &mut self.particles {
            particle.step(bounds, phase.drift, &self.config.physics, &mut self.rng);
        }
        for cluster in &mut self.clusters {
            cluster.step(bounds, phase.drift, &self.config.physics, &mut self.rng);
        }

        self.pass_spatial_indexing();

        let outcome = {
            let mut ctx = BindingContext {
                config: &self.config,
                phase,
                bounds,
                rng: &mut self.rng,
            };
            binding::run(
                &mut ctx,
                &mut self.particles,
                &mut self.clusters,
                &self.spatial_hash,
                &mut self.next_cluster_id,
            )
        };

        let report = self.build_report(&phase, &outcome);
        self.metrics.record_step(&report);
        self.metrics.add(MERGE_CONFLICTS, outcome.merge_conflicts as u64);
        if report.complete && !self.last_report.complete {
            self.metrics.log_event("complete", &format!("single crystal at step {}", report.step));
        }
        self.last_report = report;
        report
    }

    /// Runs up to `steps` steps, stopping early once the run is complete.
    /// Returns the last report.
    pub fn run(&mut self, steps: u64) -> StepReport {
        let mut report = self.report();
        for _ in 0..steps {
            report = self.update();
            if report.complete {
                break;
            }
        }
        report
    }

    /// Aggregates of the current state with the event counts of the most
    /// recent step.
    pub fn report(&self) -> StepReport {
        let phase = self.phase_params();
        let outcome = BindingOutcome {
            particle_bindings: self.last_report.particle_bindings,
            nucleations: self.last_report.nucleations,
            merges: self.last_report.merges,
            merge_conflicts: 0,
        };
        self.build_report(&phase, &outcome)
    }

    fn pass_spatial_indexing(&mut self) {
        self.position_buffer.clear();
        self.position_buffer
            .extend(self.particles.iter().map(|p| (p.position.x, p.position.y)));
        self.spatial_hash.build(&self.position_buffer);
    }

    fn build_report(&self, phase: &PhaseParams, outcome: &BindingOutcome) -> StepReport {
        let free_particles = self.particles.len();
        let total_clusters = self.clusters.len();
        StepReport {
            step: self.step,
            phase: phase.kind,
            temperature: phase.temperature,
            free_particles,
            total_clusters,
            phase_clusters: self.clusters.iter().filter(|c| c.kind == phase.kind).count(),
            total_sites: self.clusters.iter().map(|c| c.site_count()).sum(),
            particle_bindings: outcome.particle_bindings,
            nucleations: outcome.nucleations,
            merges: outcome.merges,
            complete: free_particles == 0 && total_clusters == 1,
        }
    }
}
