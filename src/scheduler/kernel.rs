//! Full schedule re-evaluation.
//!
//! Recomputes every task's finish time for an arbitrary venue assignment,
//! honoring two independent precedence systems at once: the dependency DAG
//! and each venue's FIFO lane order. This is the evaluation oracle behind
//! every what-if migration as well as the re-validation of a committed
//! schedule.
//!
//! # Algorithm
//!
//! Dual-readiness counting. Each task tracks how many of its DAG
//! predecessors and how many of its lane predecessors are still
//! unfinalized; it becomes processable exactly when both counts reach
//! zero. Ready tasks are drained LIFO — the drain order cannot affect the
//! resulting times, because a task is only ever finalized after everything
//! either precedence system makes it wait on.
//!
//! Termination is guaranteed for any valid schedule: the graph is acyclic,
//! every lane is a linear order, and the counters strictly decrease, so
//! every task reaches readiness exactly once.
//!
//! The id → (venue, position) lookup is rebuilt from the schedule under
//! evaluation on every call; nothing is cached across evaluations.

use crate::models::{FinishTimes, Platform, Schedule, TaskGraph, TaskId, CLOUD_VENUE};

/// The outcome of one full re-evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Recomputed finish time of every task.
    pub finish_times: FinishTimes,
    /// The latest finish time across all tasks.
    pub makespan: f64,
}

/// Recomputes all finish times for `schedule`.
///
/// Pure with respect to its arguments; each call allocates a fresh
/// [`FinishTimes`]. The schedule must place every task exactly once, which
/// every schedule produced by this crate does by construction.
pub fn evaluate(graph: &TaskGraph, platform: &Platform, schedule: &Schedule) -> Evaluation {
    let n = graph.task_count();

    let mut venue_of = vec![CLOUD_VENUE; n];
    let mut position_of = vec![0usize; n];
    let mut placed = 0usize;
    for venue in 0..schedule.venue_count() {
        for (position, &task) in schedule.lane(venue).iter().enumerate() {
            venue_of[task - 1] = venue;
            position_of[task - 1] = position;
            placed += 1;
        }
    }
    debug_assert_eq!(placed, n, "schedule must place every task exactly once");

    let mut deps_remaining: Vec<usize> =
        (1..=n).map(|id| graph.task(id).predecessors.len()).collect();
    let mut lane_remaining: Vec<usize> = position_of.clone();

    let mut ready: Vec<TaskId> = (1..=n)
        .filter(|&id| deps_remaining[id - 1] == 0 && lane_remaining[id - 1] == 0)
        .collect();

    let mut times = FinishTimes::new(n);
    let mut finalized = 0usize;

    while let Some(id) = ready.pop() {
        let finish = finish_time(graph, platform, schedule, &venue_of, &position_of, &times, id);
        times.set(id, finish);
        finalized += 1;

        for &s in &graph.task(id).successors {
            deps_remaining[s - 1] -= 1;
            if deps_remaining[s - 1] == 0 && lane_remaining[s - 1] == 0 {
                ready.push(s);
            }
        }

        let venue = venue_of[id - 1];
        let position = position_of[id - 1];
        for &later in &schedule.lane(venue)[position + 1..] {
            lane_remaining[later - 1] -= 1;
            if lane_remaining[later - 1] == 0 && deps_remaining[later - 1] == 0 {
                ready.push(later);
            }
        }
    }

    debug_assert_eq!(finalized, n, "every task reaches dual readiness once");

    let makespan = times.makespan();
    Evaluation {
        finish_times: times,
        makespan,
    }
}

/// Finish time of one task, given everything it waits on is finalized.
///
/// Predecessor readiness: a cloud predecessor of a cloud task only gates it
/// at its wireless-send completion (`finish − (cloud compute + receive)`) —
/// the cloud pipeline forwards results without the device round trip. The
/// maximum is taken over these adjusted instants. The cloud/local test uses
/// placement in the schedule under evaluation, not the committed
/// classification flag, so hypothetical candidates evaluate correctly.
fn finish_time(
    graph: &TaskGraph,
    platform: &Platform,
    schedule: &Schedule,
    venue_of: &[usize],
    position_of: &[usize],
    times: &FinishTimes,
    id: TaskId,
) -> f64 {
    let venue = venue_of[id - 1];
    let on_cloud = venue == CLOUD_VENUE;

    let mut ready = 0.0f64;
    for &p in &graph.task(id).predecessors {
        let mut instant = times.get(p);
        if on_cloud && venue_of[p - 1] == CLOUD_VENUE {
            instant -= platform.cloud_tail();
        }
        ready = ready.max(instant);
    }

    if on_cloud {
        let position = position_of[id - 1];
        let channel_free = if position == 0 {
            0.0
        } else {
            times.get(schedule.lane(CLOUD_VENUE)[position - 1]) - platform.cloud_tail()
        };
        channel_free.max(ready) + platform.remote_cost()
    } else {
        let position = position_of[id - 1];
        let lane_free = schedule.lane(venue)[..position]
            .iter()
            .map(|&q| times.get(q))
            .fold(0.0, f64::max);
        lane_free.max(ready) + graph.task(id).cost_on_venue(venue)
    }
}
