//! HTTP line-provider client
//!
//! The provider answers `GET {base}/{sport}` with a body shaped like
//! `{"lines": {"SOCCER": "0.774"}}`. Values may arrive as strings or numbers.

use super::{FeedClient, FeedError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct LinesPayload {
    lines: HashMap<String, Value>,
}

/// Line feed backed by the HTTP line provider
pub struct HttpFeedClient {
    client: Client,
}

impl HttpFeedClient {
    /// Create a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Decode a provider body, picking the line named by the URL's last segment
    fn parse_line(body: &str, url: &str) -> Result<f64, FeedError> {
        let payload: LinesPayload =
            serde_json::from_str(body).map_err(|e| FeedError::Decode(e.to_string()))?;

        let key = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();

        let value = match payload.lines.len() {
            0 => return Err(FeedError::MissingLine(key.to_string())),
            1 => payload.lines.values().next(),
            _ => payload
                .lines
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, v)| v),
        }
        .ok_or_else(|| FeedError::MissingLine(key.to_string()))?;

        Self::value_to_f64(value)
    }

    fn value_to_f64(value: &Value) -> Result<f64, FeedError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| FeedError::Decode(format!("not a float: {}", n))),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| FeedError::Decode(format!("{}: {:?}", e, s))),
            other => Err(FeedError::Decode(format!("unexpected line value: {}", other))),
        }
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch(&self, url: &str) -> Result<f64, FeedError> {
        tracing::trace!(url = %url, "Fetching line");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        Self::parse_line(&body, url)
    }
}
