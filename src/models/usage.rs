// Per-interval usage derived from two adjacent snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usage of one container over one sampling step.
///
/// `time` is the later snapshot's time. Rates are bytes per second. Every
/// value is `None` when one of its operands was missing or undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSample {
    pub time: DateTime<Utc>,
    pub millis_elapsed: i64,
    pub cpu_percentage: Option<f64>,
    pub memory_percentage: Option<f64>,
    pub io_read_bytes_per_sec: Option<f64>,
    pub io_write_bytes_per_sec: Option<f64>,
    pub net_send_rate: Option<f64>,
    pub net_recv_rate: Option<f64>,
}
