// Per-interval usage from adjacent snapshots.
// CPU, IO and net are cumulative counters (differenced); memory is a gauge (read directly).
// A missing operand makes only its dependent outputs None. Counter decreases pass through as
// negative values.

use std::collections::BTreeMap;

use crate::models::{ContainerStats, UsageSample, ValidatedSnapshot};

/// Lift a binary operation over two optionals.
pub fn map2<A, B, T>(a: Option<A>, b: Option<B>, f: impl FnOnce(A, B) -> T) -> Option<T> {
    a.zip(b).map(|(a, b)| f(a, b))
}

/// `later - earlier` on a counter.
fn delta(earlier: Option<f64>, later: Option<f64>) -> Option<f64> {
    map2(later, earlier, |b, a| b - a)
}

/// Division that is undefined (None) for a zero denominator.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    map2(numerator, denominator, |n, d| (n, d))
        .filter(|&(_, d)| d != 0.0)
        .map(|(n, d)| n / d)
        .filter(|v| v.is_finite())
}

/// Per-second rate of a counter delta; None unless elapsed time is positive.
fn rate(counter_delta: Option<f64>, millis_elapsed: i64) -> Option<f64> {
    if millis_elapsed <= 0 {
        return None;
    }
    counter_delta.map(|d| d / (millis_elapsed as f64 / 1000.0))
}

/// Usage of `container` between two chronologically adjacent snapshots.
///
/// Returns None when the container is absent from either snapshot.
pub fn compute_usage(
    earlier: &ValidatedSnapshot,
    later: &ValidatedSnapshot,
    container: &str,
) -> Option<UsageSample> {
    let a = earlier.container(container)?;
    let b = later.container(container)?;
    let millis_elapsed = (later.time - earlier.time).num_milliseconds();
    Some(usage_between(a, b, later, millis_elapsed))
}

fn usage_between(
    a: &ContainerStats,
    b: &ContainerStats,
    later: &ValidatedSnapshot,
    millis_elapsed: i64,
) -> UsageSample {
    let cpu_total_delta = delta(a.cpu.total, b.cpu.total);
    let cpu_system_delta = delta(a.cpu.system, b.cpu.system);
    let cpu_percentage = map2(ratio(cpu_total_delta, cpu_system_delta), b.cpu.ncpu, |r, n| {
        r * n * 100.0
    });

    let memory_percentage = ratio(b.memory.used, b.memory.available).map(|r| r * 100.0);

    UsageSample {
        time: later.time,
        millis_elapsed,
        cpu_percentage,
        memory_percentage,
        io_read_bytes_per_sec: rate(delta(a.io.read, b.io.read), millis_elapsed),
        io_write_bytes_per_sec: rate(delta(a.io.write, b.io.write), millis_elapsed),
        net_send_rate: rate(delta(a.net.send, b.net.send), millis_elapsed),
        net_recv_rate: rate(delta(a.net.recv, b.net.recv), millis_elapsed),
    }
}

/// Usage samples for every container present in both snapshots, by name.
pub fn step_usage(
    earlier: &ValidatedSnapshot,
    later: &ValidatedSnapshot,
) -> Vec<(String, UsageSample)> {
    later
        .container_names()
        .filter_map(|name| compute_usage(earlier, later, name).map(|u| (name.to_string(), u)))
        .collect()
}

/// Per-container usage series over a window of snapshots.
///
/// Every container seen anywhere in the window is known, even one that never
/// appears in two adjacent snapshots (its series is empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageHistory {
    series: BTreeMap<String, Vec<UsageSample>>,
}

impl UsageHistory {
    pub fn from_snapshots(snapshots: &[ValidatedSnapshot]) -> Self {
        let mut series: BTreeMap<String, Vec<UsageSample>> = BTreeMap::new();
        for snapshot in snapshots {
            for name in snapshot.container_names() {
                series.entry(name.to_string()).or_default();
            }
        }
        for pair in snapshots.windows(2) {
            for (name, sample) in step_usage(&pair[0], &pair[1]) {
                series.entry(name).or_default().push(sample);
            }
        }
        Self { series }
    }

    /// Container names in lexicographic order.
    pub fn container_names(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    pub fn series(&self, container: &str) -> Option<&[UsageSample]> {
        self.series.get(container).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[UsageSample])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }
}

impl FromIterator<(String, Vec<UsageSample>)> for UsageHistory {
    fn from_iter<I: IntoIterator<Item = (String, Vec<UsageSample>)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

/// Incremental form for streamed input: holds only the previous snapshot.
#[derive(Debug, Default)]
pub struct UsageCalculator {
    previous: Option<ValidatedSnapshot>,
    history: UsageHistory,
}

impl UsageCalculator {
    pub fn push(&mut self, snapshot: ValidatedSnapshot) {
        for name in snapshot.container_names() {
            self.history.series.entry(name.to_string()).or_default();
        }
        if let Some(prev) = &self.previous {
            for (name, sample) in step_usage(prev, &snapshot) {
                self.history.series.entry(name).or_default().push(sample);
            }
        }
        self.previous = Some(snapshot);
    }

    pub fn finish(self) -> UsageHistory {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map2_requires_both_operands() {
        assert_eq!(map2(Some(2.0), Some(3.0), |a, b| a * b), Some(6.0));
        assert_eq!(map2(None::<f64>, Some(3.0), |a, b| a * b), None);
        assert_eq!(map2(Some(2.0), None::<f64>, |a, b| a * b), None);
    }

    #[test]
    fn ratio_is_none_for_zero_denominator() {
        assert_eq!(ratio(Some(1.0), Some(0.0)), None);
        assert_eq!(ratio(Some(0.0), Some(4.0)), Some(0.0));
    }

    #[test]
    fn rate_is_none_for_non_positive_elapsed() {
        assert_eq!(rate(Some(100.0), 0), None);
        assert_eq!(rate(Some(100.0), -10_000), None);
        assert_eq!(rate(Some(100.0), 10_000), Some(10.0));
        assert_eq!(rate(Some(-100.0), 10_000), Some(-10.0));
    }
}
