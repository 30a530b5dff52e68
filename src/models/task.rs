//! Task model.
//!
//! A task is one vertex of the application DAG: a unit of computation that
//! runs to completion on a single venue, with execution-cost estimates for
//! every local core and for the cloud.

use serde::{Deserialize, Serialize};

/// Task identifier. Ids are dense and 1-based: an instance with N tasks
/// uses exactly the ids `1..=N`.
pub type TaskId = usize;

/// A schedulable task.
///
/// Structural fields (`id`, `local_costs`, `predecessors`, `successors`,
/// `min_local_cost`, `remote_cost`) are fixed once the graph is built. The
/// remaining fields are written by later phases: classification flips when
/// a task is (re)assigned across the cloud boundary, and the cost/priority
/// estimates are filled in by the prioritization phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique 1-based task id.
    pub id: TaskId,
    /// Execution cost on each local core, indexed by core (venue − 1).
    pub local_costs: Vec<f64>,
    /// Cheapest local execution cost (min of `local_costs`).
    pub min_local_cost: f64,
    /// Estimated cloud execution cost: send + cloud compute + receive.
    pub remote_cost: f64,
    /// Whether this task is currently assigned to (or a-priori suited for)
    /// the cloud.
    pub is_cloud: bool,
    /// Scalar cost estimate used by the upward-rank recurrence.
    pub computation_cost: f64,
    /// Upward-rank priority: longest cost-weighted path to any sink.
    pub priority_level: f64,
    /// Ids of tasks that must finish before this one starts.
    pub predecessors: Vec<TaskId>,
    /// Ids of tasks that depend on this one.
    pub successors: Vec<TaskId>,
}

impl Task {
    /// Creates an unlinked task with no costs attached yet.
    pub(crate) fn new(id: TaskId) -> Self {
        Self {
            id,
            local_costs: Vec::new(),
            min_local_cost: 0.0,
            remote_cost: 0.0,
            is_cloud: false,
            computation_cost: 0.0,
            priority_level: 0.0,
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    /// Execution cost on the given local venue (1-based core number).
    #[inline]
    pub fn cost_on_venue(&self, venue: usize) -> f64 {
        debug_assert!(venue >= 1, "venue 0 is the cloud, not a core");
        self.local_costs[venue - 1]
    }

    /// Whether this task is a sink (no successors).
    #[inline]
    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_on_venue_is_one_based() {
        let mut task = Task::new(3);
        task.local_costs = vec![9.0, 7.0, 5.0];
        assert!((task.cost_on_venue(1) - 9.0).abs() < 1e-9);
        assert!((task.cost_on_venue(3) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_task_is_local_sink() {
        let task = Task::new(1);
        assert!(!task.is_cloud);
        assert!(task.is_sink());
        assert!(task.predecessors.is_empty());
    }
}
