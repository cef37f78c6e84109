use serde::Deserialize;

use crate::datasets::DOWNSAMPLE_COUNT;
use crate::log_reader::DEFAULT_TAIL_LIMIT;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Usage log written by the metrics producer (newline-delimited JSON).
    #[serde(default = "default_log_path")]
    pub path: String,
    /// Keep only the most recent N snapshots per read; 0 reads the whole file.
    #[serde(default = "default_tail_limit")]
    pub tail_limit: usize,
}

impl LogConfig {
    pub fn tail_limit(&self) -> Option<usize> {
        (self.tail_limit > 0).then_some(self.tail_limit)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            tail_limit: default_tail_limit(),
        }
    }
}

fn default_log_path() -> String {
    "/app/log/log_daily".into()
}

fn default_tail_limit() -> usize {
    DEFAULT_TAIL_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartsConfig {
    /// Points per series after LTTB downsampling.
    #[serde(default = "default_downsample_count")]
    pub downsample_count: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            downsample_count: default_downsample_count(),
        }
    }
}

fn default_downsample_count() -> usize {
    DOWNSAMPLE_COUNT
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.log.path.is_empty(), "log.path must be non-empty");
        anyhow::ensure!(
            self.charts.downsample_count >= 3,
            "charts.downsample_count must be >= 3, got {}",
            self.charts.downsample_count
        );
        Ok(())
    }
}
