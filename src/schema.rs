// Schema validation of untrusted log lines.
// A line either becomes a whole ValidatedSnapshot or a tagged failure; never a partial record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{
    ContainerStats, CpuCounters, IoCounters, MemoryGauge, NetCounters, ValidatedSnapshot,
};

/// Failure category, used for read counters and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MalformedJson,
    SchemaMismatch,
    UnparsableTimestamp,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("schema mismatch at `{path}`: {reason}")]
    SchemaMismatch { path: String, reason: String },

    #[error("unparsable timestamp {0:?}")]
    UnparsableTimestamp(String),
}

impl ValidationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationError::MalformedJson(_) => FailureKind::MalformedJson,
            ValidationError::SchemaMismatch { .. } => FailureKind::SchemaMismatch,
            ValidationError::UnparsableTimestamp(_) => FailureKind::UnparsableTimestamp,
        }
    }

    fn mismatch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::SchemaMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Decode and validate one log line.
pub fn parse_line(line: &str) -> Result<ValidatedSnapshot, ValidationError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
    validate(&value)
}

/// Validate one decoded JSON document against the snapshot shape.
pub fn validate(value: &Value) -> Result<ValidatedSnapshot, ValidationError> {
    let root = value
        .as_object()
        .ok_or_else(|| ValidationError::mismatch("$", "expected an object"))?;

    let time = match root.get("time") {
        Some(Value::String(s)) => parse_timestamp(s)?,
        Some(other) => {
            return Err(ValidationError::mismatch(
                "time",
                format!("expected a string, got {}", type_name(other)),
            ));
        }
        None => return Err(ValidationError::mismatch("time", "missing")),
    };

    let stats_obj = match root.get("stats") {
        Some(Value::Object(m)) => m,
        Some(other) => {
            return Err(ValidationError::mismatch(
                "stats",
                format!("expected an object, got {}", type_name(other)),
            ));
        }
        None => return Err(ValidationError::mismatch("stats", "missing")),
    };

    let mut stats = BTreeMap::new();
    for (name, container) in stats_obj {
        let path = format!("stats.{name}");
        stats.insert(name.clone(), container_stats(&path, container)?);
    }

    Ok(ValidatedSnapshot { time, stats })
}

impl TryFrom<Value> for ValidatedSnapshot {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        validate(&value)
    }
}

/// ISO-8601 date-times with an offset, in extended or basic form.
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
];

/// Offset-less forms, taken as UTC.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
];

/// ISO-8601 timestamp, normalised to UTC.
///
/// RFC 3339 first, then the other ISO-8601 shapes: minute precision, basic
/// (no separators) form, `+hhmm` / `+hh` offsets, a comma before the fraction,
/// and a bare date (midnight). Anything without an offset is taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    let normalized = s.trim().replace(',', ".");
    let t = normalized.as_str();

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(t, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
        .ok_or_else(|| ValidationError::UnparsableTimestamp(s.to_string()))
}

fn container_stats(path: &str, value: &Value) -> Result<ContainerStats, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::mismatch(path, "expected an object"))?;

    let cpu_path = format!("{path}.cpu");
    let cpu = group(&cpu_path, obj, "cpu")?;
    let memory_path = format!("{path}.memory");
    let memory = group(&memory_path, obj, "memory")?;
    let io_path = format!("{path}.io");
    let io = group(&io_path, obj, "io")?;
    let net_path = format!("{path}.net");
    let net = group(&net_path, obj, "net")?;

    Ok(ContainerStats {
        cpu: CpuCounters {
            total: leaf(&cpu_path, cpu, "total")?,
            system: leaf(&cpu_path, cpu, "system")?,
            ncpu: optional_leaf(&cpu_path, cpu, "ncpu")?,
        },
        memory: MemoryGauge {
            used: leaf(&memory_path, memory, "used")?,
            available: leaf(&memory_path, memory, "available")?,
        },
        io: IoCounters {
            read: leaf(&io_path, io, "read")?,
            write: leaf(&io_path, io, "write")?,
        },
        net: NetCounters {
            send: leaf(&net_path, net, "send")?,
            recv: leaf(&net_path, net, "recv")?,
        },
    })
}

fn group<'a>(
    path: &str,
    parent: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    match parent.get(key) {
        Some(Value::Object(m)) => Ok(m),
        Some(other) => Err(ValidationError::mismatch(
            path,
            format!("expected an object, got {}", type_name(other)),
        )),
        None => Err(ValidationError::mismatch(path, "missing")),
    }
}

/// Required key; the value may be null.
fn leaf(
    path: &str,
    group: &Map<String, Value>,
    key: &str,
) -> Result<Option<f64>, ValidationError> {
    match group.get(key) {
        Some(v) => number(&format!("{path}.{key}"), v),
        None => Err(ValidationError::mismatch(format!("{path}.{key}"), "missing")),
    }
}

/// Optional key; absent and null both mean "unavailable".
fn optional_leaf(
    path: &str,
    group: &Map<String, Value>,
    key: &str,
) -> Result<Option<f64>, ValidationError> {
    match group.get(key) {
        Some(v) => number(&format!("{path}.{key}"), v),
        None => Ok(None),
    }
}

fn number(path: &str, value: &Value) -> Result<Option<f64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 => Ok(Some(f)),
            _ => Err(ValidationError::mismatch(
                path,
                format!("expected a non-negative number, got {n}"),
            )),
        },
        other => Err(ValidationError::mismatch(
            path,
            format!("expected a number or null, got {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn container() -> Value {
        json!({
            "cpu": {"total": 100, "system": 1000, "ncpu": 2},
            "memory": {"used": 256, "available": 1024},
            "io": {"read": 10, "write": 20},
            "net": {"send": 30, "recv": 40}
        })
    }

    #[test]
    fn validate_accepts_well_formed_snapshot() {
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": container()}});
        let s = validate(&v).unwrap();
        assert_eq!(s.time.timestamp(), 1_714_564_800);
        let web = s.container("web").unwrap();
        assert_eq!(web.cpu.total, Some(100.0));
        assert_eq!(web.cpu.ncpu, Some(2.0));
        assert_eq!(web.net.recv, Some(40.0));
    }

    #[test]
    fn validate_accepts_arbitrary_container_keys() {
        let v = json!({
            "time": "2024-05-01T12:00:00Z",
            "stats": {"zeta-1": container(), "alpha_db": container(), "x": container()}
        });
        let s = validate(&v).unwrap();
        let names: Vec<&str> = s.container_names().collect();
        assert_eq!(names, vec!["alpha_db", "x", "zeta-1"]);
    }

    #[test]
    fn validate_accepts_empty_stats() {
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {}});
        assert!(validate(&v).unwrap().stats.is_empty());
    }

    #[test]
    fn null_leaf_is_valid() {
        let mut c = container();
        c["memory"]["used"] = Value::Null;
        c["cpu"]["ncpu"] = Value::Null;
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": c}});
        let s = validate(&v).unwrap();
        assert_eq!(s.container("web").unwrap().memory.used, None);
        assert_eq!(s.container("web").unwrap().cpu.ncpu, None);
    }

    #[test]
    fn absent_ncpu_is_valid() {
        let mut c = container();
        c["cpu"].as_object_mut().unwrap().remove("ncpu");
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": c}});
        assert_eq!(validate(&v).unwrap().container("web").unwrap().cpu.ncpu, None);
    }

    #[test]
    fn absent_group_is_schema_mismatch() {
        for group in ["cpu", "memory", "io", "net"] {
            let mut c = container();
            c.as_object_mut().unwrap().remove(group);
            let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": c}});
            let err = validate(&v).unwrap_err();
            assert_eq!(err.kind(), FailureKind::SchemaMismatch, "group {group}");
            assert!(err.to_string().contains(&format!("stats.web.{group}")));
        }
    }

    #[test]
    fn absent_required_leaf_is_schema_mismatch() {
        let mut c = container();
        c["io"].as_object_mut().unwrap().remove("write");
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": c}});
        let err = validate(&v).unwrap_err();
        assert_eq!(err.kind(), FailureKind::SchemaMismatch);
        assert!(err.to_string().contains("stats.web.io.write"));
    }

    #[test]
    fn wrong_leaf_type_is_schema_mismatch() {
        let mut c = container();
        c["net"]["send"] = json!("30");
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": c}});
        assert_eq!(validate(&v).unwrap_err().kind(), FailureKind::SchemaMismatch);
    }

    #[test]
    fn negative_leaf_is_schema_mismatch() {
        let mut c = container();
        c["cpu"]["total"] = json!(-1);
        let v = json!({"time": "2024-05-01T12:00:00Z", "stats": {"web": c}});
        assert_eq!(validate(&v).unwrap_err().kind(), FailureKind::SchemaMismatch);
    }

    #[test]
    fn unparsable_timestamp_is_reported() {
        let v = json!({"time": "yesterday at noon", "stats": {}});
        assert_eq!(
            validate(&v).unwrap_err(),
            ValidationError::UnparsableTimestamp("yesterday at noon".into())
        );
    }

    #[test]
    fn non_string_time_is_schema_mismatch() {
        let v = json!({"time": 1714564800, "stats": {}});
        assert_eq!(validate(&v).unwrap_err().kind(), FailureKind::SchemaMismatch);
        let v = json!({"stats": {}});
        assert_eq!(validate(&v).unwrap_err().kind(), FailureKind::SchemaMismatch);
    }

    #[test]
    fn parse_line_reports_malformed_json() {
        let err = parse_line("{\"time\": ").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedJson);
    }

    #[test]
    fn parse_timestamp_accepts_offsets_and_fractions() {
        let a = parse_timestamp("2024-05-01T21:00:00+09:00").unwrap();
        let b = parse_timestamp("2024-05-01T12:00:00.000000000Z").unwrap();
        let c = parse_timestamp("2024-05-01T12:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        let d = parse_timestamp("2024-05-01T12:00:00.123456789Z").unwrap();
        assert_eq!(d.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn parse_timestamp_accepts_iso8601_variants() {
        let noon = parse_timestamp("2024-05-01T12:00:00Z").unwrap();
        for s in [
            "2024-05-01T12:00Z",
            "2024-05-01T12:00",
            "2024-05-01T21:00:00+0900",
            "2024-05-01T21:00+09",
            "2024-05-01T12:00:00,0Z",
            "20240501T120000Z",
            "20240501T210000+0900",
            "2024-05-01t12:00:00z",
            "2024-05-01 12:00:00Z",
        ] {
            assert_eq!(parse_timestamp(s), Ok(noon), "{s}");
        }

        let half = parse_timestamp("2024-05-01T12:00:00,5Z").unwrap();
        assert_eq!(half.timestamp_subsec_millis(), 500);

        let midnight = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(midnight, noon - chrono::Duration::hours(12));
    }

    #[test]
    fn parse_timestamp_rejects_non_iso8601() {
        for s in [
            "",
            "2024-05-01T12",
            "01/05/2024 12:00",
            "2024-13-01",
            "2024-05-01T12:00:00Zjunk",
        ] {
            assert_eq!(
                parse_timestamp(s),
                Err(ValidationError::UnparsableTimestamp(s.to_string())),
                "{s}"
            );
        }
    }
}
