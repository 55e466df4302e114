//! Line feed module
//!
//! Fetches the current raw line value for one sport from the line provider

mod http;
mod types;

pub use http::HttpFeedClient;
pub use types::{FeedError, Rate};

use async_trait::async_trait;

/// Trait for line feed implementations
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the current raw value published at `url`
    async fn fetch(&self, url: &str) -> Result<f64, FeedError>;
}
