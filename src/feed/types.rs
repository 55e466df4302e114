//! Feed types

use crate::sport::Sport;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// A single decoded sample from a line feed
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    /// Sport the sample belongs to
    pub sport: Sport,
    /// Raw line value
    pub value: f64,
    /// Local timestamp when the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl Rate {
    /// Create a rate stamped with the current time
    pub fn new(sport: Sport, value: f64) -> Self {
        Self {
            sport,
            value,
            fetched_at: Utc::now(),
        }
    }

    /// Time elapsed since the fetch completed; zero if the clock stepped back
    pub fn age(&self) -> Duration {
        (Utc::now() - self.fetched_at).to_std().unwrap_or_default()
    }
}

/// Feed fetch errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(String),
    /// Provider answered with a non-success status
    #[error("Line provider returned {0}")]
    Status(u16),
    /// Body could not be decoded
    #[error("Invalid line payload: {0}")]
    Decode(String),
    /// Body decoded but carried no usable line
    #[error("No line for {0} in payload")]
    MissingLine(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Request(e.to_string())
    }
}
