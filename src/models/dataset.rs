// Chart-ready models: points, datasets, metric and chart selectors

use serde::{Deserialize, Serialize};

use super::UsageSample;

/// One chart point: epoch millis on x, metric value on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownsampledPoint {
    pub x: Option<i64>,
    pub y: Option<f64>,
}

/// One named series, serialized the way generic charting libraries take it:
/// `{label, data, borderColor?, backgroundColor?, borderDash?}`.
///
/// Only dual-signed charts (IO read/write, net recv/send) carry styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<DownsampledPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
}

/// A single plottable metric of a `UsageSample`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Cpu,
    Memory,
    IoRead,
    IoWrite,
    NetRecv,
    NetSend,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Cpu,
        Metric::Memory,
        Metric::IoRead,
        Metric::IoWrite,
        Metric::NetRecv,
        Metric::NetSend,
    ];

    /// Resolve from URL-style segments: `cpu`, `memory`, `io/read`, `io/write`,
    /// `net/recv`, `net/send`.
    pub fn from_path(resource: &str, direction: Option<&str>) -> Option<Self> {
        match (resource, direction) {
            ("cpu", None) => Some(Metric::Cpu),
            ("memory", None) => Some(Metric::Memory),
            ("io", Some("read")) => Some(Metric::IoRead),
            ("io", Some("write")) => Some(Metric::IoWrite),
            ("net", Some("recv")) => Some(Metric::NetRecv),
            ("net", Some("send")) => Some(Metric::NetSend),
            _ => None,
        }
    }

    pub fn value(self, sample: &UsageSample) -> Option<f64> {
        match self {
            Metric::Cpu => sample.cpu_percentage,
            Metric::Memory => sample.memory_percentage,
            Metric::IoRead => sample.io_read_bytes_per_sec,
            Metric::IoWrite => sample.io_write_bytes_per_sec,
            Metric::NetRecv => sample.net_recv_rate,
            Metric::NetSend => sample.net_send_rate,
        }
    }

    /// Label suffix for dual-signed metrics ("read", "send", ...).
    pub fn direction(self) -> Option<&'static str> {
        match self {
            Metric::Cpu | Metric::Memory => None,
            Metric::IoRead => Some("read"),
            Metric::IoWrite => Some("write"),
            Metric::NetRecv => Some("recv"),
            Metric::NetSend => Some("send"),
        }
    }

    /// Outbound directions are drawn dashed.
    pub fn is_dashed(self) -> bool {
        matches!(self, Metric::IoWrite | Metric::NetSend)
    }
}

/// One chart: the set of metrics drawn together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Cpu,
    Memory,
    Io,
    Net,
}

impl ChartKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cpu" => Some(ChartKind::Cpu),
            "memory" => Some(ChartKind::Memory),
            "io" => Some(ChartKind::Io),
            "net" => Some(ChartKind::Net),
            _ => None,
        }
    }

    /// Metrics in emission order; read/recv come before write/send.
    pub fn metrics(self) -> &'static [Metric] {
        match self {
            ChartKind::Cpu => &[Metric::Cpu],
            ChartKind::Memory => &[Metric::Memory],
            ChartKind::Io => &[Metric::IoRead, Metric::IoWrite],
            ChartKind::Net => &[Metric::NetRecv, Metric::NetSend],
        }
    }

    pub fn is_dual(self) -> bool {
        self.metrics().len() > 1
    }
}

/// A whole chart, or the explicit "no data yet" state when nothing plottable exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Chart {
    Ready { datasets: Vec<Dataset> },
    NoData,
}
