//! Schedule quality metrics.
//!
//! Computes the device-side energy and timing indicators of a venue
//! assignment.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total energy | Σ cloud tasks send_power·send_time + Σ local tasks core_power·cost |
//! | Makespan | Latest completion time across all tasks |
//! | Deadline feasibility | makespan ≤ deadline |
//!
//! Cloud compute and the downlink receive draw no device energy in this
//! model; only the wireless send and local core execution do.

use crate::models::{FinishTimes, Platform, Schedule, TaskGraph, TaskId, VenueId, CLOUD_VENUE};

/// Total device energy of a venue assignment.
///
/// Venue-derived and pure: every task on the cloud lane costs one wireless
/// send, every task on a core costs that core's power times its execution
/// cost there. O(n).
pub fn total_energy(graph: &TaskGraph, platform: &Platform, schedule: &Schedule) -> f64 {
    let mut energy =
        schedule.lane(CLOUD_VENUE).len() as f64 * platform.send_power * platform.send_time;
    for core in 1..=schedule.core_count() {
        for &task in schedule.lane(core) {
            energy += platform.power_on_venue(core) * graph.task(task).cost_on_venue(core);
        }
    }
    energy
}

/// Where and when a task executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Offloaded: wireless send, cloud compute, wireless receive.
    Cloud {
        /// Upload start.
        send_start: f64,
        /// Upload end / cloud compute start.
        send_done: f64,
        /// Cloud compute end / download start.
        cloud_done: f64,
        /// Download end; the task's finish time.
        finish: f64,
    },
    /// Local execution on one core.
    Core {
        /// The core (1-based venue number).
        core: VenueId,
        /// Execution start.
        start: f64,
        /// Execution end; the task's finish time.
        finish: f64,
    },
}

/// One task's resolved venue and execution window.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpan {
    /// The task.
    pub task: TaskId,
    /// Its placement and timing.
    pub placement: Placement,
}

/// Aggregate quality indicators of a schedule, plus the per-task timeline
/// consumed by reporting.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Total device energy.
    pub total_energy: f64,
    /// Application completion time.
    pub makespan: f64,
    /// Whether the makespan meets the platform deadline.
    pub meets_deadline: bool,
    /// Per-task spans in ascending id order.
    pub timeline: Vec<TaskSpan>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its (already evaluated) finish times.
    ///
    /// Windows are recovered backwards from each finish time: a core task
    /// starts `cost` before it finishes; a cloud task's receive, compute,
    /// and send windows stack back from its finish.
    pub fn calculate(
        graph: &TaskGraph,
        platform: &Platform,
        schedule: &Schedule,
        finish_times: &FinishTimes,
    ) -> Self {
        let placements = schedule.placements(graph.task_count());

        let mut timeline = Vec::with_capacity(graph.task_count());
        for id in 1..=graph.task_count() {
            let Some((venue, _)) = placements[id - 1] else {
                continue;
            };
            let finish = finish_times.get(id);
            let placement = if venue == CLOUD_VENUE {
                let cloud_done = finish - platform.recv_time;
                let send_done = cloud_done - platform.cloud_compute_time;
                Placement::Cloud {
                    send_start: send_done - platform.send_time,
                    send_done,
                    cloud_done,
                    finish,
                }
            } else {
                Placement::Core {
                    core: venue,
                    start: finish - graph.task(id).cost_on_venue(venue),
                    finish,
                }
            };
            timeline.push(TaskSpan {
                task: id,
                placement,
            });
        }

        let makespan = finish_times.makespan();
        Self {
            total_energy: total_energy(graph, platform, schedule),
            makespan,
            meets_deadline: makespan <= platform.deadline,
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TaskGraph, Platform, Schedule, FinishTimes) {
        // 1 → 2 → 3; task 2 offloaded, tasks 1 and 3 on cores 1 and 2.
        let edges = [(1, 2), (2, 3)];
        let costs = vec![
            (1, vec![4.0, 6.0]),
            (2, vec![9.0, 9.0]),
            (3, vec![3.0, 2.0]),
        ];
        let graph = TaskGraph::build(&edges, &costs, 2).unwrap();
        let platform = Platform::new(vec![1.0, 2.0], 0.5, 20.0);

        let mut schedule = Schedule::empty(2);
        schedule.push(1, 1);
        schedule.push(CLOUD_VENUE, 2);
        schedule.push(2, 3);

        let mut times = FinishTimes::new(3);
        times.set(1, 4.0);
        times.set(2, 9.0); // send 4–7, cloud 7–8, recv 8–9
        times.set(3, 11.0);
        (graph, platform, schedule, times)
    }

    #[test]
    fn test_total_energy() {
        let (graph, platform, schedule, _) = sample();
        // Cloud: 0.5·3 = 1.5; core 1: 1·4 = 4; core 2: 2·2 = 4
        assert!((total_energy(&graph, &platform, &schedule) - 9.5).abs() < 1e-9);
    }

    #[test]
    fn test_kpi_timeline_windows() {
        let (graph, platform, schedule, times) = sample();
        let kpi = ScheduleKpi::calculate(&graph, &platform, &schedule, &times);

        assert!((kpi.makespan - 11.0).abs() < 1e-9);
        assert!(kpi.meets_deadline);
        assert_eq!(kpi.timeline.len(), 3);

        assert_eq!(
            kpi.timeline[0].placement,
            Placement::Core {
                core: 1,
                start: 0.0,
                finish: 4.0
            }
        );
        assert_eq!(
            kpi.timeline[1].placement,
            Placement::Cloud {
                send_start: 4.0,
                send_done: 7.0,
                cloud_done: 8.0,
                finish: 9.0
            }
        );
        assert_eq!(
            kpi.timeline[2].placement,
            Placement::Core {
                core: 2,
                start: 9.0,
                finish: 11.0
            }
        );
    }

    #[test]
    fn test_kpi_flags_deadline_miss() {
        let (graph, platform, schedule, times) = sample();
        let tight = Platform { deadline: 10.0, ..platform };
        let kpi = ScheduleKpi::calculate(&graph, &tight, &schedule, &times);
        assert!(!kpi.meets_deadline);
    }

    #[test]
    fn test_kpi_empty() {
        let graph = TaskGraph::build(&[], &[], 1).unwrap();
        let platform = Platform::new(vec![1.0], 0.5, 5.0);
        let kpi = ScheduleKpi::calculate(
            &graph,
            &platform,
            &Schedule::empty(1),
            &FinishTimes::new(0),
        );
        assert!((kpi.total_energy - 0.0).abs() < 1e-9);
        assert!((kpi.makespan - 0.0).abs() < 1e-9);
        assert!(kpi.meets_deadline);
        assert!(kpi.timeline.is_empty());
    }
}
