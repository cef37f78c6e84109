// Domain models: log snapshots, derived usage, chart datasets

mod dataset;
mod snapshot;
mod usage;

pub use dataset::{Chart, ChartKind, Dataset, DownsampledPoint, Metric};
pub use snapshot::{
    ContainerStats, CpuCounters, IoCounters, MemoryGauge, NetCounters, ValidatedSnapshot,
};
pub use usage::UsageSample;
