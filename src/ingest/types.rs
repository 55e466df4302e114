//! Ingestion types

use crate::cache::CacheError;
use crate::sport::Sport;
use std::time::Duration;
use thiserror::Error;

/// One polling worker: which feed to fetch and how often
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedWorkerSpec {
    /// Sport whose line the feed publishes
    pub sport: Sport,
    /// Full feed URL
    pub url: String,
    /// Pause between consecutive fetches
    pub interval: Duration,
}

/// Fatal ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// Cache rejected a write; the pipeline stops
    #[error("Cache write failed for {sport}: {source}")]
    CacheWrite {
        sport: Sport,
        #[source]
        source: CacheError,
    },
}
