//! Task classification and upward-rank prioritization.
//!
//! Before any venue is chosen, every task gets an a-priori cloud/local
//! classification and a scalar priority reflecting the longest
//! cost-weighted path from it to any sink. The greedy scheduler then
//! processes tasks in descending priority order, which guarantees every
//! predecessor is placed before its successors.
//!
//! # Reference
//! Topcuoglu, Hariri & Wu (2002), "Performance-Effective and Low-Complexity
//! Task Scheduling for Heterogeneous Computing" (upward rank)

use tracing::debug;

use crate::models::{Platform, TaskGraph, TaskId};

/// Primary assignment: classifies each task as cloud-suited or local.
///
/// A task is cloud-suited when the end-to-end remote cost (send + cloud
/// compute + receive — a platform constant, identical for all tasks)
/// undercuts its cheapest local execution.
pub fn classify(graph: &mut TaskGraph, platform: &Platform) {
    let remote = platform.remote_cost();
    let mut cloud_suited = 0usize;
    for id in 1..=graph.task_count() {
        let task = graph.task_mut(id);
        task.remote_cost = remote;
        task.is_cloud = remote < task.min_local_cost;
        if task.is_cloud {
            cloud_suited += 1;
        }
    }
    debug!(
        tasks = graph.task_count(),
        cloud_suited, "primary assignment complete"
    );
}

/// Computes every task's computation cost and upward-rank priority level.
///
/// The computation cost is the remote estimate for cloud-suited tasks and
/// the arithmetic mean of the local costs otherwise. Priority levels follow
/// the recurrence
///
/// ```text
/// priority(t) = cost(t)                                  if t is a sink
/// priority(t) = cost(t) + max over successors s of priority(s)
/// ```
///
/// evaluated in reverse topological order (explicit post-order, so deep
/// graphs cannot exhaust the call stack). Requires the graph be acyclic,
/// which construction already validated.
pub fn compute_priorities(graph: &mut TaskGraph) {
    for id in 1..=graph.task_count() {
        let task = graph.task_mut(id);
        task.computation_cost = if task.is_cloud {
            task.remote_cost
        } else {
            task.local_costs.iter().sum::<f64>() / task.local_costs.len() as f64
        };
    }

    let order = topological_order(graph);
    for &id in order.iter().rev() {
        let downstream = graph
            .task(id)
            .successors
            .iter()
            .map(|&s| graph.task(s).priority_level)
            .fold(0.0, f64::max);
        let cost = graph.task(id).computation_cost;
        graph.task_mut(id).priority_level = cost + downstream;
    }
}

/// All task ids in scheduling order: descending priority level, ties broken
/// by ascending id (deterministic for equal-priority tasks).
pub fn priority_order(graph: &TaskGraph) -> Vec<TaskId> {
    let mut order: Vec<TaskId> = (1..=graph.task_count()).collect();
    order.sort_by(|&a, &b| {
        graph
            .task(b)
            .priority_level
            .total_cmp(&graph.task(a).priority_level)
            .then_with(|| a.cmp(&b))
    });
    order
}

/// Topological order (predecessors before successors) via Kahn's algorithm.
fn topological_order(graph: &TaskGraph) -> Vec<TaskId> {
    let n = graph.task_count();
    let mut indegree: Vec<usize> = (1..=n).map(|id| graph.task(id).predecessors.len()).collect();
    let mut ready: Vec<TaskId> = (1..=n).filter(|&id| indegree[id - 1] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(id) = ready.pop() {
        order.push(id);
        for &s in &graph.task(id).successors {
            indegree[s - 1] -= 1;
            if indegree[s - 1] == 0 {
                ready.push(s);
            }
        }
    }

    debug_assert_eq!(order.len(), n, "construction guarantees an acyclic graph");
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> TaskGraph {
        // 1 → {2, 3} → 4
        let edges = [(1, 2), (1, 3), (2, 4), (3, 4)];
        let costs = vec![
            (1, vec![6.0, 8.0]),
            (2, vec![2.0, 4.0]),
            (3, vec![10.0, 12.0]),
            (4, vec![4.0, 4.0]),
        ];
        TaskGraph::build(&edges, &costs, 2).unwrap()
    }

    fn platform() -> Platform {
        Platform::new(vec![1.0, 2.0], 0.5, 100.0)
    }

    #[test]
    fn test_classify_marks_expensive_tasks_cloud() {
        let mut graph = diamond();
        classify(&mut graph, &platform());
        // remote = 5: only task 3 (min local 10) beats it
        assert!(!graph.task(1).is_cloud);
        assert!(!graph.task(2).is_cloud);
        assert!(graph.task(3).is_cloud);
        assert!(!graph.task(4).is_cloud);
        assert!((graph.task(3).remote_cost - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_computation_cost_by_classification() {
        let mut graph = diamond();
        classify(&mut graph, &platform());
        compute_priorities(&mut graph);
        // Local tasks: mean of local costs; cloud task 3: remote estimate
        assert!((graph.task(1).computation_cost - 7.0).abs() < 1e-9);
        assert!((graph.task(2).computation_cost - 3.0).abs() < 1e-9);
        assert!((graph.task(3).computation_cost - 5.0).abs() < 1e-9);
        assert!((graph.task(4).computation_cost - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_upward_rank_recurrence() {
        let mut graph = diamond();
        classify(&mut graph, &platform());
        compute_priorities(&mut graph);

        // Sink: priority equals computation cost
        assert!((graph.task(4).priority_level - 4.0).abs() < 1e-9);
        // Interior: cost + max over successor priorities
        for id in [1, 2, 3] {
            let task = graph.task(id);
            let expected = task.computation_cost
                + task
                    .successors
                    .iter()
                    .map(|&s| graph.task(s).priority_level)
                    .fold(0.0, f64::max);
            assert!((task.priority_level - expected).abs() < 1e-9);
        }
        // Concretely: p4=4, p2=7, p3=9, p1=7+9=16
        assert!((graph.task(1).priority_level - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_priority_order_descending_with_id_ties() {
        let mut graph = diamond();
        classify(&mut graph, &platform());
        compute_priorities(&mut graph);
        assert_eq!(priority_order(&graph), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_priority_order_on_reference_instance() {
        // The ten-task benchmark graph; all tasks are local a priori
        // (every min local cost ≤ remote estimate 5).
        let edges = [
            (1, 2),
            (2, 8),
            (3, 7),
            (4, 8),
            (1, 3),
            (2, 9),
            (4, 9),
            (1, 4),
            (1, 5),
            (1, 6),
            (5, 9),
            (6, 8),
            (7, 10),
            (8, 10),
            (9, 10),
        ];
        let costs = vec![
            (1, vec![9.0, 7.0, 5.0]),
            (2, vec![8.0, 6.0, 5.0]),
            (3, vec![6.0, 5.0, 4.0]),
            (4, vec![7.0, 5.0, 3.0]),
            (5, vec![5.0, 4.0, 2.0]),
            (6, vec![7.0, 6.0, 4.0]),
            (7, vec![8.0, 5.0, 3.0]),
            (8, vec![6.0, 4.0, 2.0]),
            (9, vec![5.0, 3.0, 2.0]),
            (10, vec![7.0, 4.0, 2.0]),
        ];
        let mut graph = TaskGraph::build(&edges, &costs, 3).unwrap();
        let platform = Platform::new(vec![1.0, 2.0, 4.0], 0.5, 27.0);

        classify(&mut graph, &platform);
        assert!((1..=10).all(|id| !graph.task(id).is_cloud));

        compute_priorities(&mut graph);
        assert!((graph.task(1).priority_level - 65.0 / 3.0).abs() < 1e-9);
        assert!((graph.task(10).priority_level - 13.0 / 3.0).abs() < 1e-9);
        // Tasks 2 and 3 tie at 44/3; ascending id breaks the tie
        assert!((graph.task(2).priority_level - graph.task(3).priority_level).abs() < 1e-9);
        assert_eq!(priority_order(&graph), vec![1, 2, 3, 6, 4, 5, 7, 8, 9, 10]);
    }

    #[test]
    fn test_empty_graph() {
        let mut graph = TaskGraph::build(&[], &[], 2).unwrap();
        classify(&mut graph, &platform());
        compute_priorities(&mut graph);
        assert!(priority_order(&graph).is_empty());
    }
}
