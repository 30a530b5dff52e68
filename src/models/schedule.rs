//! Schedule (solution) model.
//!
//! A schedule is a complete partition of all task ids into per-venue
//! execution lanes. Venue `0` is the cloud; venues `1..=core_count` are the
//! local cores. The order within a lane is the execution order on that
//! venue: every venue is a single-unit FIFO server, and the cloud lane
//! additionally serializes one uplink, one compute slot, and one downlink.
//!
//! Schedules are immutable per evaluation: a hypothetical migration is
//! materialized as a *new* schedule via [`Schedule::apply_move`], never by
//! mutating the committed one. This keeps the local search side-effect-free.

use serde::{Deserialize, Serialize};

use super::graph::TaskGraph;
use super::task::TaskId;

/// Venue index: `0` is the cloud lane, `1..=core_count` are local cores.
pub type VenueId = usize;

/// The cloud venue index.
pub const CLOUD_VENUE: VenueId = 0;

/// A single-task migration: remove `task` from venue `from`, reinsert it
/// into venue `to` at its priority-ordered position.
///
/// Ephemeral — only used to derive a hypothetical schedule for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// The task being migrated.
    pub task: TaskId,
    /// Venue the task currently occupies.
    pub from: VenueId,
    /// Venue the task would move to.
    pub to: VenueId,
}

/// Ordered task lanes, one per venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    lanes: Vec<Vec<TaskId>>,
}

impl Schedule {
    /// Creates an empty schedule for the cloud plus `core_count` cores.
    pub fn empty(core_count: usize) -> Self {
        Self {
            lanes: vec![Vec::new(); core_count + 1],
        }
    }

    /// Number of venues (cloud + cores).
    #[inline]
    pub fn venue_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of local cores.
    #[inline]
    pub fn core_count(&self) -> usize {
        self.lanes.len() - 1
    }

    /// The execution lane of a venue, in FIFO order.
    #[inline]
    pub fn lane(&self, venue: VenueId) -> &[TaskId] {
        &self.lanes[venue]
    }

    /// Appends a task to the back of a venue's lane.
    pub fn push(&mut self, venue: VenueId, task: TaskId) {
        self.lanes[venue].push(task);
    }

    /// Total number of scheduled tasks across all lanes.
    pub fn task_count(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    /// Iterates `(venue, task)` pairs in lane order.
    pub fn iter(&self) -> impl Iterator<Item = (VenueId, TaskId)> + '_ {
        self.lanes
            .iter()
            .enumerate()
            .flat_map(|(venue, lane)| lane.iter().map(move |&task| (venue, task)))
    }

    /// Builds the id → (venue, position) lookup for this schedule.
    ///
    /// Rebuilt fresh for every evaluation rather than cached — the lookup
    /// is only valid for the exact schedule it was derived from.
    pub fn placements(&self, task_count: usize) -> Vec<Option<(VenueId, usize)>> {
        let mut placements = vec![None; task_count];
        for (venue, lane) in self.lanes.iter().enumerate() {
            for (position, &task) in lane.iter().enumerate() {
                placements[task - 1] = Some((venue, position));
            }
        }
        placements
    }

    /// Materializes the hypothetical schedule a migration would produce.
    ///
    /// The task is removed from its source lane and inserted into the
    /// destination lane so that every task with priority ≥ its own keeps
    /// preceding it and every strictly lower-priority task follows it,
    /// preserving the existing relative order within both groups.
    pub fn apply_move(&self, graph: &TaskGraph, mv: &Move) -> Schedule {
        let moved_priority = graph.task(mv.task).priority_level;

        let mut lanes = self.lanes.clone();
        lanes[mv.from].retain(|&t| t != mv.task);

        let old_dest = std::mem::take(&mut lanes[mv.to]);
        let mut dest = Vec::with_capacity(old_dest.len() + 1);
        for &t in &old_dest {
            if t != mv.task && graph.task(t).priority_level >= moved_priority {
                dest.push(t);
            }
        }
        dest.push(mv.task);
        for &t in &old_dest {
            if graph.task(t).priority_level < moved_priority {
                dest.push(t);
            }
        }
        lanes[mv.to] = dest;

        Schedule { lanes }
    }
}

/// Completion time of every task, indexed by task id.
///
/// Fully recomputed (never incrementally patched) on each schedule
/// evaluation; times from a discarded candidate evaluation are stale the
/// moment another schedule is evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinishTimes {
    times: Vec<f64>,
}

impl FinishTimes {
    /// Creates a zeroed table for `task_count` tasks.
    pub fn new(task_count: usize) -> Self {
        Self {
            times: vec![0.0; task_count],
        }
    }

    /// Completion time of a task.
    #[inline]
    pub fn get(&self, task: TaskId) -> f64 {
        self.times[task - 1]
    }

    /// Records a task's completion time.
    #[inline]
    pub fn set(&mut self, task: TaskId, finish: f64) {
        self.times[task - 1] = finish;
    }

    /// The application makespan: the latest completion time (0 when empty).
    pub fn makespan(&self) -> f64 {
        self.times.iter().fold(0.0, |acc, &t| acc.max(t))
    }

    /// Number of tasks covered by this table.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the table covers no tasks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterates `(task, finish)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, f64)> + '_ {
        self.times
            .iter()
            .enumerate()
            .map(|(idx, &finish)| (idx + 1, finish))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Diamond 1 → {2, 3} → 4 on two cores; priorities set by hand so the
    // reinsertion rule can be exercised in isolation.
    fn sample_graph() -> TaskGraph {
        let edges = [(1, 2), (1, 3), (2, 4), (3, 4)];
        let costs: Vec<(TaskId, Vec<f64>)> = (1..=4).map(|id| (id, vec![2.0, 3.0])).collect();
        let mut graph = TaskGraph::build(&edges, &costs, 2).unwrap();
        for (id, priority) in [(1, 40.0), (2, 30.0), (3, 20.0), (4, 10.0)] {
            graph.task_mut(id).priority_level = priority;
        }
        graph
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::empty(2);
        s.push(1, 1);
        s.push(1, 2);
        s.push(2, 3);
        s.push(2, 4);
        s
    }

    #[test]
    fn test_empty_lanes() {
        let s = Schedule::empty(3);
        assert_eq!(s.venue_count(), 4);
        assert_eq!(s.core_count(), 3);
        assert_eq!(s.task_count(), 0);
        assert!(s.lane(CLOUD_VENUE).is_empty());
    }

    #[test]
    fn test_placements_cover_every_task_once() {
        let s = sample_schedule();
        let placements = s.placements(4);
        assert_eq!(placements[0], Some((1, 0)));
        assert_eq!(placements[1], Some((1, 1)));
        assert_eq!(placements[2], Some((2, 0)));
        assert_eq!(placements[3], Some((2, 1)));
    }

    #[test]
    fn test_apply_move_orders_destination_by_priority() {
        let graph = sample_graph();
        let s = sample_schedule();

        // Task 2 (priority 30) outranks both core-2 residents (20, 10)
        // and lands at the front of the lane.
        let moved = s.apply_move(
            &graph,
            &Move {
                task: 2,
                from: 1,
                to: 2,
            },
        );
        assert_eq!(moved.lane(1), &[1]);
        assert_eq!(moved.lane(2), &[2, 3, 4]);

        // Task 4 (priority 10) goes to the back of core 1.
        let moved = s.apply_move(
            &graph,
            &Move {
                task: 4,
                from: 2,
                to: 1,
            },
        );
        assert_eq!(moved.lane(1), &[1, 2, 4]);
        assert_eq!(moved.lane(2), &[3]);
    }

    #[test]
    fn test_apply_move_to_cloud() {
        let graph = sample_graph();
        let s = sample_schedule();
        let moved = s.apply_move(
            &graph,
            &Move {
                task: 1,
                from: 1,
                to: CLOUD_VENUE,
            },
        );
        assert_eq!(moved.lane(CLOUD_VENUE), &[1]);
        assert_eq!(moved.lane(1), &[2]);
        assert_eq!(moved.task_count(), 4);
    }

    #[test]
    fn test_apply_move_within_same_lane_is_stable() {
        let graph = sample_graph();
        let s = sample_schedule();
        // Reinserting a task into its own lane at its priority position
        // reproduces the lane unchanged.
        let moved = s.apply_move(
            &graph,
            &Move {
                task: 3,
                from: 2,
                to: 2,
            },
        );
        assert_eq!(moved, s);
    }

    #[test]
    fn test_finish_times_makespan() {
        let mut times = FinishTimes::new(3);
        times.set(1, 5.0);
        times.set(2, 12.0);
        times.set(3, 8.0);
        assert!((times.makespan() - 12.0).abs() < 1e-9);
        assert!((times.get(2) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_finish_times_empty() {
        let times = FinishTimes::new(0);
        assert!(times.is_empty());
        assert!((times.makespan() - 0.0).abs() < 1e-9);
    }
}
