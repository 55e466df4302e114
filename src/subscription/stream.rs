//! Duplex stream abstraction
//!
//! The engine reads typed requests from a [`RequestSource`] and writes typed
//! responses to a [`ResponseSink`]. Framing belongs to the transport.

use super::{LineResponse, SubscribeRequest};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Stream transport errors
#[derive(Debug, Error)]
pub enum StreamError {
    /// A single message could not be decoded; the stream stays usable
    #[error("Malformed message: {0}")]
    Decode(String),
    /// An outbound response could not be serialized
    #[error("Failed to encode response: {0}")]
    Encode(String),
    /// The transport failed; the stream is unusable
    #[error("Transport error: {0}")]
    Transport(String),
    /// The peer is gone
    #[error("Stream closed")]
    Closed,
}

/// Inbound half of a subscription stream
#[async_trait]
pub trait RequestSource: Send {
    /// Next request; `None` once the peer has finished sending
    async fn recv(&mut self) -> Option<Result<SubscribeRequest, StreamError>>;
}

/// Outbound half of a subscription stream, shared by all its subscriptions
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Deliver one response
    async fn send(&self, response: LineResponse) -> Result<(), StreamError>;
}

#[async_trait]
impl RequestSource for mpsc::Receiver<SubscribeRequest> {
    async fn recv(&mut self) -> Option<Result<SubscribeRequest, StreamError>> {
        mpsc::Receiver::recv(self).await.map(Ok)
    }
}

#[async_trait]
impl ResponseSink for mpsc::Sender<LineResponse> {
    async fn send(&self, response: LineResponse) -> Result<(), StreamError> {
        mpsc::Sender::send(self, response)
            .await
            .map_err(|_| StreamError::Closed)
    }
}
