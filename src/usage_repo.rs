// Query surface over the usage log. Every call runs its own read -> diff -> downsample
// pipeline over a fresh read of the file; nothing is cached between calls.

use std::path::PathBuf;
use thiserror::Error;
use tracing::instrument;

use crate::config::AppConfig;
use crate::datasets::{build_chart, metric_points};
use crate::log_reader::{self, ReadError, ReadStats};
use crate::models::{Chart, ChartKind, DownsampledPoint, Metric};
use crate::usage::UsageHistory;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("unknown container: {0}")]
    UnknownContainer(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("unknown chart: {0}")]
    UnknownChart(String),
}

pub struct UsageRepo {
    log_path: PathBuf,
    tail_limit: Option<usize>,
    downsample_count: usize,
}

impl UsageRepo {
    pub fn new(
        log_path: impl Into<PathBuf>,
        tail_limit: Option<usize>,
        downsample_count: usize,
    ) -> Self {
        Self {
            log_path: log_path.into(),
            tail_limit,
            downsample_count,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.log.path,
            config.log.tail_limit(),
            config.charts.downsample_count,
        )
    }

    pub fn log_path(&self) -> &std::path::Path {
        &self.log_path
    }

    /// Read the retained window and derive per-container usage.
    #[instrument(skip(self), fields(repo = "usage", operation = "load_history"))]
    pub async fn load_history(&self) -> Result<(UsageHistory, ReadStats), ReadError> {
        let recent = log_reader::read_recent(&self.log_path, self.tail_limit).await?;
        let history = UsageHistory::from_snapshots(&recent.snapshots);
        Ok((history, recent.stats))
    }

    /// Known container names, lexicographic.
    pub async fn container_names(&self) -> Result<Vec<String>, QueryError> {
        let (history, _) = self.load_history().await?;
        Ok(history.container_names())
    }

    /// One container's downsampled series for one metric.
    #[instrument(skip(self), fields(repo = "usage", operation = "metric_series"))]
    pub async fn metric_series(
        &self,
        container: &str,
        metric: Metric,
    ) -> Result<Vec<DownsampledPoint>, QueryError> {
        let (history, _) = self.load_history().await?;
        let samples = history
            .series(container)
            .ok_or_else(|| QueryError::UnknownContainer(container.to_string()))?;
        Ok(metric_points(samples, metric, self.downsample_count))
    }

    /// All datasets of one chart, or `Chart::NoData`.
    #[instrument(skip(self), fields(repo = "usage", operation = "chart"))]
    pub async fn chart(&self, kind: ChartKind) -> Result<Chart, QueryError> {
        let (history, _) = self.load_history().await?;
        Ok(build_chart(&history, kind, self.downsample_count))
    }
}
