//! Task graph model.
//!
//! The application DAG, built once from an edge list and a per-task cost
//! table and immutable afterwards except for the three per-task fields
//! owned by later phases (classification, computation cost, priority).
//!
//! Tasks live in a dense arena addressed by their 1-based id; predecessor
//! and successor relations are id sets over that arena.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_instance, ValidationError};

use super::task::{Task, TaskId};

/// The application task DAG with per-core execution costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    core_count: usize,
}

impl TaskGraph {
    /// Builds the graph from an edge list and a cost table.
    ///
    /// Each edge `(u, v)` creates tasks `u` and `v` on first reference and
    /// records `v` as a successor of `u` (and `u` as a predecessor of `v`).
    /// Each cost-table row `(id, costs)` attaches the local execution cost
    /// vector of task `id`, one entry per core.
    ///
    /// The instance is rejected — with every violation collected — when the
    /// referenced ids are not a contiguous 1-based range, a task lacks a
    /// cost row (or has several, or a row names an unknown task), a row's
    /// arity differs from `core_count`, or the edges induce a cycle.
    pub fn build(
        edges: &[(TaskId, TaskId)],
        cost_table: &[(TaskId, Vec<f64>)],
        core_count: usize,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_instance(edges, cost_table, core_count)?;

        let task_count = edges
            .iter()
            .map(|&(u, v)| u.max(v))
            .max()
            .unwrap_or(0);

        let mut tasks: Vec<Task> = (1..=task_count).map(Task::new).collect();
        for &(u, v) in edges {
            tasks[u - 1].successors.push(v);
            tasks[v - 1].predecessors.push(u);
        }

        for (id, costs) in cost_table {
            let task = &mut tasks[id - 1];
            task.local_costs = costs.clone();
            task.min_local_cost = costs.iter().fold(f64::INFINITY, |acc, &c| acc.min(c));
        }

        Ok(Self { tasks, core_count })
    }

    /// The task with the given id.
    #[inline]
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id - 1]
    }

    /// Mutable access for the phase that owns a task's writable fields.
    #[inline]
    pub(crate) fn task_mut(&mut self, id: TaskId) -> &mut Task {
        &mut self.tasks[id - 1]
    }

    /// Number of tasks.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of local cores each cost vector covers.
    #[inline]
    pub fn core_count(&self) -> usize {
        self.core_count
    }

    /// All task ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> {
        1..=self.tasks.len()
    }

    /// The task arena in id order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn sample_edges() -> Vec<(TaskId, TaskId)> {
        vec![(1, 2), (1, 3), (2, 4), (3, 4)]
    }

    fn sample_costs() -> Vec<(TaskId, Vec<f64>)> {
        vec![
            (1, vec![9.0, 7.0, 5.0]),
            (2, vec![8.0, 6.0, 5.0]),
            (3, vec![6.0, 5.0, 4.0]),
            (4, vec![7.0, 5.0, 3.0]),
        ]
    }

    #[test]
    fn test_build_wires_relations() {
        let graph = TaskGraph::build(&sample_edges(), &sample_costs(), 3).unwrap();
        assert_eq!(graph.task_count(), 4);
        assert_eq!(graph.task(1).successors, vec![2, 3]);
        assert_eq!(graph.task(4).predecessors, vec![2, 3]);
        assert!(graph.task(1).predecessors.is_empty());
        assert!(graph.task(4).is_sink());
    }

    #[test]
    fn test_build_attaches_costs() {
        let graph = TaskGraph::build(&sample_edges(), &sample_costs(), 3).unwrap();
        assert!((graph.task(2).cost_on_venue(2) - 6.0).abs() < 1e-9);
        assert!((graph.task(4).min_local_cost - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_rejects_cycle() {
        let edges = vec![(1, 2), (2, 3), (3, 1)];
        let costs: Vec<(TaskId, Vec<f64>)> = (1..=3).map(|id| (id, vec![1.0])).collect();
        let errors = TaskGraph::build(&edges, &costs, 1).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_build_rejects_missing_cost_row() {
        let mut costs = sample_costs();
        costs.remove(2);
        let errors = TaskGraph::build(&sample_edges(), &costs, 3).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingCostRow));
    }

    #[test]
    fn test_empty_instance_is_an_empty_graph() {
        let graph = TaskGraph::build(&[], &[], 3).unwrap();
        assert_eq!(graph.task_count(), 0);
    }

    #[test]
    fn test_graph_serializes() {
        let graph = TaskGraph::build(&sample_edges(), &sample_costs(), 3).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let back: TaskGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.task_count(), 4);
        assert_eq!(back.task(1).successors, vec![2, 3]);
    }
}
