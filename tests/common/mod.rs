// Shared test helpers
#![allow(dead_code)]

use cephylas::models::*;
use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;

/// 2024-05-01T12:00:00Z plus `secs`.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_714_564_800 + secs, 0).unwrap()
}

/// Container readings with the given CPU counters and quiet memory/IO/net.
pub fn cpu_stats(total: f64, system: f64, ncpu: f64) -> ContainerStats {
    ContainerStats {
        cpu: CpuCounters {
            total: Some(total),
            system: Some(system),
            ncpu: Some(ncpu),
        },
        memory: MemoryGauge {
            used: Some(256.0),
            available: Some(1024.0),
        },
        io: IoCounters {
            read: Some(0.0),
            write: Some(0.0),
        },
        net: NetCounters {
            send: Some(0.0),
            recv: Some(0.0),
        },
    }
}

pub fn snapshot(secs: i64, containers: &[(&str, ContainerStats)]) -> ValidatedSnapshot {
    ValidatedSnapshot {
        time: at(secs),
        stats: containers
            .iter()
            .map(|(name, stats)| (name.to_string(), *stats))
            .collect(),
    }
}

/// One log line as the metrics producer writes it.
pub fn line(snapshot: &ValidatedSnapshot) -> String {
    serde_json::to_string(snapshot).unwrap()
}

pub fn write_log(lines: &[String]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for l in lines {
        writeln!(file, "{l}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Three snapshots 10 s apart for `web` (cpu 10% then 20%) and `db` (flat).
pub fn three_step_log() -> Vec<String> {
    vec![
        line(&snapshot(
            0,
            &[("web", cpu_stats(0.0, 0.0, 1.0)), ("db", cpu_stats(0.0, 0.0, 2.0))],
        )),
        line(&snapshot(
            10,
            &[("web", cpu_stats(10.0, 100.0, 1.0)), ("db", cpu_stats(5.0, 100.0, 2.0))],
        )),
        line(&snapshot(
            20,
            &[("web", cpu_stats(30.0, 200.0, 1.0)), ("db", cpu_stats(10.0, 200.0, 2.0))],
        )),
    ]
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let v = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!((v - expected).abs() < 1e-9, "expected {expected}, got {v}");
}
