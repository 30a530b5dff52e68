//! Platform model.
//!
//! Describes the execution environment: local core power coefficients, the
//! wireless link, the cloud service latencies, and the application deadline.
//! All values are fixed for the lifetime of a scheduling run.

use serde::{Deserialize, Serialize};

/// Default wireless send time.
pub const DEFAULT_SEND_TIME: f64 = 3.0;
/// Default wireless receive time.
pub const DEFAULT_RECV_TIME: f64 = 1.0;
/// Default cloud compute time.
pub const DEFAULT_CLOUD_COMPUTE_TIME: f64 = 1.0;

/// Execution environment parameters.
///
/// The three latency constants default to 3 / 1 / 1 time units
/// (send / receive / cloud compute); override them with
/// [`Platform::with_latencies`] when the link or service differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Power coefficient of each local core, indexed by core (venue − 1).
    pub core_powers: Vec<f64>,
    /// Power coefficient of the wireless uplink while sending.
    pub send_power: f64,
    /// Time to upload one task's payload over the wireless link.
    pub send_time: f64,
    /// Time to download one task's result over the wireless link.
    pub recv_time: f64,
    /// Cloud-side execution time per task.
    pub cloud_compute_time: f64,
    /// Application completion-time deadline.
    pub deadline: f64,
}

impl Platform {
    /// Creates a platform with the default 3/1/1 latency constants.
    pub fn new(core_powers: Vec<f64>, send_power: f64, deadline: f64) -> Self {
        Self {
            core_powers,
            send_power,
            send_time: DEFAULT_SEND_TIME,
            recv_time: DEFAULT_RECV_TIME,
            cloud_compute_time: DEFAULT_CLOUD_COMPUTE_TIME,
            deadline,
        }
    }

    /// Overrides the wireless and cloud latency constants.
    pub fn with_latencies(mut self, send_time: f64, recv_time: f64, cloud_compute_time: f64) -> Self {
        self.send_time = send_time;
        self.recv_time = recv_time;
        self.cloud_compute_time = cloud_compute_time;
        self
    }

    /// Number of local cores.
    #[inline]
    pub fn core_count(&self) -> usize {
        self.core_powers.len()
    }

    /// Number of venues: the cloud lane plus every local core.
    #[inline]
    pub fn venue_count(&self) -> usize {
        self.core_count() + 1
    }

    /// End-to-end cloud execution cost: send + cloud compute + receive.
    ///
    /// Identical for every task; the payload size is not modelled.
    #[inline]
    pub fn remote_cost(&self) -> f64 {
        self.send_time + self.cloud_compute_time + self.recv_time
    }

    /// The tail of a cloud execution after its upload completes
    /// (cloud compute + receive). Subtracting this from a cloud task's
    /// finish time yields its wireless-send completion instant.
    #[inline]
    pub fn cloud_tail(&self) -> f64 {
        self.cloud_compute_time + self.recv_time
    }

    /// Power coefficient of the given local venue (1-based core number).
    #[inline]
    pub fn power_on_venue(&self, venue: usize) -> f64 {
        debug_assert!(venue >= 1, "venue 0 is the cloud, not a core");
        self.core_powers[venue - 1]
    }
}
