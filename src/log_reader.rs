// Line-oriented, forward-only reader over the usage log.
// Malformed lines are counted and skipped; only I/O failures end a read.

use futures_util::Stream;
use std::collections::VecDeque;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::models::ValidatedSnapshot;
use crate::schema::{self, FailureKind, ValidationError};

/// One day of snapshots at the producer's 10 s cadence.
pub const DEFAULT_TAIL_LIMIT: usize = 8640;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Counters for one read pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub lines: u64,
    pub blank_lines: u64,
    pub snapshots: u64,
    pub malformed_json: u64,
    pub schema_mismatch: u64,
    pub unparsable_timestamp: u64,
}

impl ReadStats {
    pub fn failures(&self) -> u64 {
        self.malformed_json + self.schema_mismatch + self.unparsable_timestamp
    }

    fn record_failure(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::MalformedJson => self.malformed_json += 1,
            FailureKind::SchemaMismatch => self.schema_mismatch += 1,
            FailureKind::UnparsableTimestamp => self.unparsable_timestamp += 1,
        }
    }
}

/// Pull-based cursor yielding one validated snapshot per well-formed line.
///
/// After an I/O error is yielded once, the cursor is exhausted. Dropping the
/// cursor closes the underlying reader.
pub struct SnapshotCursor<R> {
    reader: R,
    source: String,
    buf: Vec<u8>,
    stats: ReadStats,
    finished: bool,
}

impl SnapshotCursor<BufReader<tokio::fs::File>> {
    /// Open a log file. Reopen to restart from the beginning.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await.map_err(|e| ReadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: AsyncBufRead + Unpin> SnapshotCursor<R> {
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self {
            reader,
            source: source.into(),
            buf: Vec::new(),
            stats: ReadStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    pub async fn next(&mut self) -> Option<Result<ValidatedSnapshot, ReadError>> {
        if self.finished {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ReadError::Io {
                        path: self.source.clone(),
                        source: e,
                    }));
                }
            }
            self.stats.lines += 1;

            let parsed = match std::str::from_utf8(&self.buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        self.stats.blank_lines += 1;
                        continue;
                    }
                    schema::parse_line(line)
                }
                Err(e) => Err(ValidationError::MalformedJson(e.to_string())),
            };

            match parsed {
                Ok(snapshot) => {
                    self.stats.snapshots += 1;
                    return Some(Ok(snapshot));
                }
                Err(e) => {
                    self.stats.record_failure(e.kind());
                    debug!(
                        source = %self.source,
                        line = self.stats.lines,
                        kind = ?e.kind(),
                        error = %e,
                        "skipping invalid log line"
                    );
                }
            }
        }
    }

    /// Drive the cursor as a `Stream`.
    pub fn into_stream(self) -> impl Stream<Item = Result<ValidatedSnapshot, ReadError>> {
        futures_util::stream::unfold(self, |mut cursor| async move {
            cursor.next().await.map(|item| (item, cursor))
        })
    }
}

/// The retained window of a full read.
#[derive(Debug, Clone, Default)]
pub struct RecentSnapshots {
    pub snapshots: Vec<ValidatedSnapshot>,
    pub stats: ReadStats,
}

fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: Option<usize>) {
    match cap {
        Some(0) => {}
        Some(cap) => {
            if dq.len() == cap {
                dq.pop_front();
            }
            dq.push_back(v);
        }
        None => dq.push_back(v),
    }
}

/// Read the whole cursor, keeping only the most recent `tail_limit` snapshots.
pub async fn collect_recent<R: AsyncBufRead + Unpin>(
    mut cursor: SnapshotCursor<R>,
    tail_limit: Option<usize>,
) -> Result<RecentSnapshots, ReadError> {
    let mut window = VecDeque::with_capacity(tail_limit.unwrap_or(0).min(DEFAULT_TAIL_LIMIT));
    while let Some(item) = cursor.next().await {
        push_capped(&mut window, item?, tail_limit);
    }
    let stats = cursor.stats();
    if stats.failures() > 0 {
        warn!(
            source = %cursor.source,
            malformed_json = stats.malformed_json,
            schema_mismatch = stats.schema_mismatch,
            unparsable_timestamp = stats.unparsable_timestamp,
            "skipped invalid log lines"
        );
    }
    Ok(RecentSnapshots {
        snapshots: window.into(),
        stats,
    })
}

/// Open `path` and return its most recent `tail_limit` snapshots.
pub async fn read_recent(
    path: &Path,
    tail_limit: Option<usize>,
) -> Result<RecentSnapshots, ReadError> {
    let started = std::time::Instant::now();
    let cursor = SnapshotCursor::open(path).await?;
    let recent = collect_recent(cursor, tail_limit).await?;
    debug!(
        path = %path.display(),
        snapshots = recent.snapshots.len(),
        lines = recent.stats.lines,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "log read complete"
    );
    Ok(recent)
}
