//! Ingestion pipeline module
//!
//! Polls every configured line feed on its own cadence, merges the samples
//! into one channel and writes them to the cache

mod pipeline;
mod types;

pub use pipeline::IngestionPipeline;
pub use types::{FeedWorkerSpec, IngestError};
