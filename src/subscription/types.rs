//! Subscription types

use crate::sport::{Sport, SportError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;

/// Longest accepted update interval, one day
pub const MAX_UPDATE_INTERVAL_SECS: i64 = 86_400;

/// Inbound stream message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Requested sport names, in order
    #[serde(default)]
    pub sports: Vec<String>,
    /// Refresh interval in seconds, as text
    #[serde(default)]
    pub update_interval_seconds: String,
}

impl SubscribeRequest {
    /// Build a request message
    pub fn new(sports: &[&str], update_interval_seconds: impl Into<String>) -> Self {
        Self {
            sports: sports.iter().map(|s| s.to_string()).collect(),
            update_interval_seconds: update_interval_seconds.into(),
        }
    }
}

/// Outbound stream message: sport name to delta
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineResponse {
    pub line: BTreeMap<String, f64>,
}

/// Reasons a subscription request is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Interval text is not an integer
    #[error("Invalid update interval {0:?}")]
    InvalidInterval(String),
    /// Interval parsed but is zero or negative
    #[error("Update interval must be positive, got {0}")]
    NonPositiveInterval(i64),
    /// Interval parsed but exceeds [`MAX_UPDATE_INTERVAL_SECS`]
    #[error("Update interval {0}s exceeds the {max}s limit", max = MAX_UPDATE_INTERVAL_SECS)]
    IntervalTooLong(i64),
    /// No sports requested
    #[error("No sports requested")]
    EmptySports,
    /// A requested sport is outside the catalog
    #[error(transparent)]
    UnknownSport(#[from] SportError),
}

/// A validated subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    /// Sports to report, in request order
    pub sports: Vec<Sport>,
    /// Tick period
    pub interval: Duration,
}

impl SubscriptionRequest {
    /// Validate an inbound message
    pub fn parse(message: &SubscribeRequest) -> Result<Self, SubscriptionError> {
        let text = message.update_interval_seconds.trim();
        let secs: i64 = text
            .parse()
            .map_err(|_| SubscriptionError::InvalidInterval(text.to_string()))?;
        if secs <= 0 {
            return Err(SubscriptionError::NonPositiveInterval(secs));
        }
        if secs > MAX_UPDATE_INTERVAL_SECS {
            return Err(SubscriptionError::IntervalTooLong(secs));
        }

        if message.sports.is_empty() {
            return Err(SubscriptionError::EmptySports);
        }
        let sports = message
            .sports
            .iter()
            .map(|s| s.parse::<Sport>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sports,
            interval: Duration::from_secs(secs as u64),
        })
    }
}

/// Last computed raw/delta pair for one sport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleEntry {
    pub raw: f64,
    pub delta: f64,
}

/// Previous sample of one subscription task
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Baseline {
    /// Sport list of the tick that produced this baseline
    pub sports: Vec<Sport>,
    pub entries: HashMap<Sport, SampleEntry>,
}

impl Baseline {
    /// Deltas to publish for this tick
    pub fn response(&self) -> DeltaResponse {
        DeltaResponse {
            deltas: self
                .entries
                .iter()
                .map(|(sport, entry)| (*sport, entry.delta))
                .collect(),
        }
    }
}

/// Per-sport deltas for one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeltaResponse {
    pub deltas: BTreeMap<Sport, f64>,
}

impl From<DeltaResponse> for LineResponse {
    fn from(response: DeltaResponse) -> Self {
        LineResponse {
            line: response
                .deltas
                .into_iter()
                .map(|(sport, delta)| (sport.to_string(), delta))
                .collect(),
        }
    }
}
