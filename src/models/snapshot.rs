// Validated log snapshot models (one per log line)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cumulative CPU counters. `ncpu` is the number of online CPUs at sample time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuCounters {
    pub total: Option<f64>,
    pub system: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ncpu: Option<f64>,
}

/// Memory gauge (instantaneous, not cumulative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryGauge {
    pub used: Option<f64>,
    pub available: Option<f64>,
}

/// Cumulative block IO bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IoCounters {
    pub read: Option<f64>,
    pub write: Option<f64>,
}

/// Cumulative network bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NetCounters {
    pub send: Option<f64>,
    pub recv: Option<f64>,
}

/// One container's readings in a snapshot. A `None` leaf means the metric
/// was temporarily unavailable when the producer sampled it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ContainerStats {
    pub cpu: CpuCounters,
    pub memory: MemoryGauge,
    pub io: IoCounters,
    pub net: NetCounters,
}

/// A log line that passed schema validation.
///
/// The container key set is whatever the producer wrote on that line; it is
/// never assumed to match neighbouring lines. Deserializing goes through
/// `schema::validate`, so it cannot bypass the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ValidatedSnapshot {
    pub time: DateTime<Utc>,
    pub stats: BTreeMap<String, ContainerStats>,
}

impl ValidatedSnapshot {
    pub fn container(&self, name: &str) -> Option<&ContainerStats> {
        self.stats.get(name)
    }

    pub fn container_names(&self) -> impl Iterator<Item = &str> {
        self.stats.keys().map(String::as_str)
    }
}
