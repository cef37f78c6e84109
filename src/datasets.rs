// Chart dataset assembly: one dataset per (container, metric), name-ordered, downsampled.

use crate::downsample::downsample_lttb;
use crate::models::{Chart, ChartKind, Dataset, DownsampledPoint, Metric, UsageSample};
use crate::usage::UsageHistory;

/// Default number of points per series handed to the chart.
pub const DOWNSAMPLE_COUNT: usize = 512;

/// Chart.js default palette.
pub const BORDER_COLORS: [&str; 7] = [
    "rgb(54, 162, 235)",  // blue
    "rgb(255, 99, 132)",  // red
    "rgb(255, 159, 64)",  // orange
    "rgb(255, 205, 86)",  // yellow
    "rgb(75, 192, 192)",  // green
    "rgb(153, 102, 255)", // purple
    "rgb(201, 203, 207)", // grey
];

/// `BORDER_COLORS` at half opacity.
pub const BACKGROUND_COLORS: [&str; 7] = [
    "rgba(54, 162, 235, 0.5)",
    "rgba(255, 99, 132, 0.5)",
    "rgba(255, 159, 64, 0.5)",
    "rgba(255, 205, 86, 0.5)",
    "rgba(75, 192, 192, 0.5)",
    "rgba(153, 102, 255, 0.5)",
    "rgba(201, 203, 207, 0.5)",
];

pub const SOLID_DASH: [u8; 2] = [1, 0];
pub const DASHED: [u8; 2] = [5, 5];

/// Points of one metric over a usage series, downsampled to `target` points.
pub fn metric_points(
    samples: &[UsageSample],
    metric: Metric,
    target: usize,
) -> Vec<DownsampledPoint> {
    let points: Vec<DownsampledPoint> = samples
        .iter()
        .map(|s| DownsampledPoint {
            x: Some(s.time.timestamp_millis()),
            y: metric.value(s),
        })
        .collect();
    downsample_lttb(&points, target, |p| p.x.map(|x| x as f64), |p| p.y)
}

/// Datasets for one chart, containers in lexicographic order.
///
/// Dual-signed charts emit two siblings per container that share the
/// container's colour and differ by dash pattern.
pub fn prepare_datasets(history: &UsageHistory, kind: ChartKind, target: usize) -> Vec<Dataset> {
    history
        .iter()
        .enumerate()
        .flat_map(|(index, (name, samples))| {
            kind.metrics().iter().map(move |&metric| {
                let data = metric_points(samples, metric, target);
                if kind.is_dual() {
                    let label = match metric.direction() {
                        Some(dir) => format!("{name} {dir}"),
                        None => name.to_string(),
                    };
                    Dataset {
                        label,
                        data,
                        border_color: Some(BORDER_COLORS[index % BORDER_COLORS.len()].to_string()),
                        background_color: Some(
                            BACKGROUND_COLORS[index % BACKGROUND_COLORS.len()].to_string(),
                        ),
                        border_dash: Some(if metric.is_dashed() { DASHED } else { SOLID_DASH }),
                    }
                } else {
                    Dataset {
                        label: name.to_string(),
                        data,
                        border_color: None,
                        background_color: None,
                        border_dash: None,
                    }
                }
            })
        })
        .collect()
}

/// `prepare_datasets`, or `Chart::NoData` when no dataset has a single point.
pub fn build_chart(history: &UsageHistory, kind: ChartKind, target: usize) -> Chart {
    let datasets = prepare_datasets(history, kind, target);
    if datasets.iter().all(|d| d.data.is_empty()) {
        Chart::NoData
    } else {
        Chart::Ready { datasets }
    }
}
