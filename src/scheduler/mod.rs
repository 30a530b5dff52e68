//! Scheduling pipeline: greedy assignment, re-evaluation, KPIs, migration.
//!
//! [`OffloadScheduler`] wires the phases together: build and validate the
//! task graph, classify and prioritize, run the greedy initial assignment,
//! then refine with the migration local search. Each phase is also usable
//! on its own through the submodules.

pub mod initial;
pub mod kernel;
pub mod kpi;
pub mod migration;

pub use initial::InitialSchedule;
pub use kernel::Evaluation;
pub use kpi::{total_energy, Placement, ScheduleKpi, TaskSpan};
pub use migration::{best_move, ChosenMove, MigrationResult, MovePass};

use tracing::debug;

use crate::models::{FinishTimes, Platform, Schedule, TaskGraph, TaskId};
use crate::priority;
use crate::validation::ValidationError;

/// End-to-end offloading scheduler.
///
/// Runs the full pipeline over a problem instance and returns the final
/// schedule with its quality indicators.
///
/// # Example
///
/// ```
/// use mcc_offload::{OffloadScheduler, Platform};
///
/// let edges = vec![(1, 2), (1, 3), (2, 4), (3, 4)];
/// let costs = vec![
///     (1, vec![9.0, 7.0, 5.0]),
///     (2, vec![8.0, 6.0, 5.0]),
///     (3, vec![6.0, 5.0, 4.0]),
///     (4, vec![7.0, 5.0, 3.0]),
/// ];
/// let platform = Platform::new(vec![1.0, 2.0, 4.0], 0.5, 27.0);
///
/// let outcome = OffloadScheduler::new(platform).schedule(&edges, &costs).unwrap();
/// assert_eq!(outcome.schedule.task_count(), 4);
/// assert!(outcome.kpi.total_energy <= outcome.initial_kpi.total_energy);
/// ```
#[derive(Debug, Clone)]
pub struct OffloadScheduler {
    platform: Platform,
}

/// Everything the pipeline produces for one instance.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// The task graph with final classifications and priorities.
    pub graph: TaskGraph,
    /// The final venue assignment.
    pub schedule: Schedule,
    /// Finish times of the final schedule.
    pub finish_times: FinishTimes,
    /// Number of migrations the local search committed.
    pub iterations: usize,
    /// Quality of the greedy schedule before any migration.
    pub initial_kpi: ScheduleKpi,
    /// Quality of the final schedule.
    pub kpi: ScheduleKpi,
}

impl OffloadScheduler {
    /// Creates a scheduler for the given platform.
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// The platform this scheduler runs against.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Schedules a problem instance.
    ///
    /// Rejects invalid instances (id gaps, cost-table problems, cycles)
    /// with every detected violation; otherwise runs classification,
    /// prioritization, greedy assignment, and migration to convergence.
    pub fn schedule(
        &self,
        edges: &[(TaskId, TaskId)],
        cost_table: &[(TaskId, Vec<f64>)],
    ) -> Result<ScheduleOutcome, Vec<ValidationError>> {
        let mut graph = TaskGraph::build(edges, cost_table, self.platform.core_count())?;

        priority::classify(&mut graph, &self.platform);
        priority::compute_priorities(&mut graph);
        let order = priority::priority_order(&graph);

        let InitialSchedule {
            schedule,
            finish_times,
        } = initial::assign(&mut graph, &self.platform, &order);
        let initial_kpi = ScheduleKpi::calculate(&graph, &self.platform, &schedule, &finish_times);
        debug!(
            energy = initial_kpi.total_energy,
            makespan = initial_kpi.makespan,
            "greedy phase done"
        );

        let result = migration::optimize(&mut graph, &self.platform, schedule);
        let kpi = ScheduleKpi::calculate(&graph, &self.platform, &result.schedule, &result.finish_times);
        debug!(
            energy = kpi.total_energy,
            makespan = kpi.makespan,
            iterations = result.iterations,
            "migration phase done"
        );

        Ok(ScheduleOutcome {
            graph,
            schedule: result.schedule,
            finish_times: result.finish_times,
            iterations: result.iterations,
            initial_kpi,
            kpi,
        })
    }
}
