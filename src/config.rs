//! Configuration types for sports-lines

use crate::ingest::FeedWorkerSpec;
use crate::sport::Sport;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub line_provider: LineProviderConfig,
    pub intervals: IntervalConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Listener addresses
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// WebSocket address for subscription streams
    #[serde(default = "default_stream_addr")]
    pub stream_addr: String,
    /// HTTP address for health and metrics
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
}

fn default_stream_addr() -> String {
    "0.0.0.0:9000".to_string()
}
fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            stream_addr: default_stream_addr(),
            http_addr: default_http_addr(),
        }
    }
}

/// Line provider (feed source) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LineProviderConfig {
    /// Base URL; the sport name is appended as the last path segment
    pub url: String,
    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

/// Per-sport poll intervals (seconds)
#[derive(Debug, Clone, Deserialize)]
pub struct IntervalConfig {
    pub soccer: u64,
    pub football: u64,
    pub baseball: u64,
}

impl IntervalConfig {
    /// Poll interval in seconds for a sport
    pub fn for_sport(&self, sport: Sport) -> u64 {
        match sport {
            Sport::Soccer => self.soccer,
            Sport::Football => self.football,
            Sport::Baseball => self.baseball,
        }
    }
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Capacity of the merged rate channel; pollers wait when it is full
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to the bundled example only when the file is missing
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or_example(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!("Warning: Config file {} not found", path.display());
            eprintln!("Using default configuration");
            return Self::default_example();
        }
        Self::load(path).map_err(|e| anyhow::anyhow!("Invalid config {}: {:#}", path.display(), e))
    }

    /// Bundled example configuration
    pub fn default_example() -> anyhow::Result<Self> {
        let config: Config = toml::from_str(include_str!("../config.toml.example"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        for sport in Sport::ALL {
            if self.intervals.for_sport(sport) == 0 {
                anyhow::bail!("Poll interval for {} must be positive", sport);
            }
        }
        if self.ingest.channel_capacity == 0 {
            anyhow::bail!("ingest.channel_capacity must be positive");
        }
        Ok(())
    }

    /// Build one feed worker per tracked sport
    pub fn feed_workers(&self) -> Vec<FeedWorkerSpec> {
        let base = self.line_provider.url.trim_end_matches('/');
        Sport::ALL
            .into_iter()
            .map(|sport| FeedWorkerSpec {
                sport,
                url: format!("{}/{}", base, sport),
                interval: Duration::from_secs(self.intervals.for_sport(sport)),
            })
            .collect()
    }
}
