//! Greedy initial venue selection.
//!
//! # Algorithm
//!
//! 1. Process tasks in descending priority order (predecessors first).
//! 2. For each task, estimate its finish time on the cloud and on every
//!    local core, given everything placed so far.
//! 3. Assign it to the venue with the earliest finish, appending to that
//!    venue's FIFO lane; a task that the cloud wins is reclassified as a
//!    cloud task even if the a-priori guess said local.
//!
//! The cloud estimate serializes the shared uplink: a new upload cannot
//! start before the previous cloud task's upload has completed, which is
//! that task's finish time minus the cloud-compute and receive tail.
//!
//! # Complexity
//! O(n · cores) over the whole pass.

use tracing::{debug, trace};

use crate::models::{FinishTimes, Platform, Schedule, TaskGraph, TaskId, VenueId, CLOUD_VENUE};

/// The initial schedule and the finish times recorded while building it.
#[derive(Debug, Clone)]
pub struct InitialSchedule {
    /// Complete venue assignment (every task in exactly one lane).
    pub schedule: Schedule,
    /// Finish time of every task under that assignment.
    pub finish_times: FinishTimes,
}

/// Runs the greedy pass over `order` (descending priority).
///
/// Reclassifies a task as cloud when the cloud finishes it strictly earlier
/// than the best local core.
pub fn assign(graph: &mut TaskGraph, platform: &Platform, order: &[TaskId]) -> InitialSchedule {
    let mut schedule = Schedule::empty(platform.core_count());
    let mut times = FinishTimes::new(graph.task_count());

    for &id in order {
        let finish_pred = graph
            .task(id)
            .predecessors
            .iter()
            .map(|&p| times.get(p))
            .fold(0.0, f64::max);

        let cloud = cloud_finish(platform, &schedule, &times, finish_pred);

        let (venue, finish) = if graph.task(id).is_cloud {
            (CLOUD_VENUE, cloud)
        } else {
            let (core, local) = best_core(graph, platform, &schedule, &times, id, finish_pred);
            if cloud < local {
                (CLOUD_VENUE, cloud)
            } else {
                (core, local)
            }
        };

        if venue == CLOUD_VENUE {
            graph.task_mut(id).is_cloud = true;
        }
        schedule.push(venue, id);
        times.set(id, finish);
        trace!(task = id, venue, finish, "venue selected");
    }

    debug!(
        makespan = times.makespan(),
        cloud_tasks = schedule.lane(CLOUD_VENUE).len(),
        "initial schedule complete"
    );
    InitialSchedule {
        schedule,
        finish_times: times,
    }
}

/// Finish time the task would have on the cloud.
///
/// With an empty cloud lane the upload starts as soon as the predecessors
/// allow; otherwise it also waits for the previous cloud task's upload to
/// clear the wireless channel.
fn cloud_finish(
    platform: &Platform,
    schedule: &Schedule,
    times: &FinishTimes,
    finish_pred: f64,
) -> f64 {
    let send_start = match schedule.lane(CLOUD_VENUE).last() {
        None => finish_pred,
        Some(&last) => {
            let last_send_done = times.get(last) - platform.cloud_tail();
            last_send_done.max(finish_pred)
        }
    };
    send_start + platform.remote_cost()
}

/// The local core with the earliest finish time for the task, FIFO after
/// whatever already occupies each lane. Ties keep the lowest core number.
fn best_core(
    graph: &TaskGraph,
    platform: &Platform,
    schedule: &Schedule,
    times: &FinishTimes,
    id: TaskId,
    finish_pred: f64,
) -> (VenueId, f64) {
    let mut best_core = 0;
    let mut best_finish = f64::INFINITY;
    for core in 1..=platform.core_count() {
        let lane_free = schedule
            .lane(core)
            .last()
            .map(|&t| times.get(t))
            .unwrap_or(0.0);
        let finish = finish_pred.max(lane_free) + graph.task(id).cost_on_venue(core);
        if finish < best_finish {
            best_finish = finish;
            best_core = core;
        }
    }
    (best_core, best_finish)
}
