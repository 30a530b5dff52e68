//! Energy-aware task offloading for mobile-cloud computing.
//!
//! Decides, for a DAG of dependent tasks, which execution venue — one of
//! several heterogeneous local cores, or a cloud service behind a serialized
//! wireless link — each task runs on, minimizing total device energy under
//! an application completion-time deadline.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `TaskGraph`, `Platform`,
//!   `Schedule`, `Move`, `FinishTimes`
//! - **`priority`**: Cloud/local classification and upward-rank priorities
//! - **`scheduler`**: Greedy initial assignment, full schedule
//!   re-evaluation, energy/makespan KPIs, migration local search, and the
//!   `OffloadScheduler` facade
//! - **`validation`**: Instance integrity checks (id range, cost rows, DAG cycles)
//!
//! # Algorithm
//!
//! Two phases. First, tasks are classified and ranked, then greedily placed
//! on whichever venue finishes them earliest (list scheduling). Second, a
//! steepest-descent search migrates one task at a time between venues,
//! re-evaluating every finish time from scratch per candidate, until no
//! move reduces energy within the deadline.
//!
//! The result is a heuristic schedule — deterministic and fast, with no
//! global optimality guarantee.
//!
//! # References
//!
//! - Lin, Wang, Xie & Pedram (2015), "Task Scheduling with Dynamic Voltage
//!   and Frequency Scaling for Energy Minimization in the Mobile Cloud
//!   Computing Environment"
//! - Topcuoglu, Hariri & Wu (2002), "Performance-Effective and
//!   Low-Complexity Task Scheduling for Heterogeneous Computing"

pub mod models;
pub mod priority;
pub mod scheduler;
pub mod validation;

pub use models::{
    FinishTimes, Move, Platform, Schedule, Task, TaskGraph, TaskId, VenueId, CLOUD_VENUE,
};
pub use scheduler::{OffloadScheduler, ScheduleKpi, ScheduleOutcome};
pub use validation::{ValidationError, ValidationErrorKind};
