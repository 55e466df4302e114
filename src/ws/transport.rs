//! WebSocket framing for subscription streams
//!
//! One JSON message per text frame in both directions. Ping, pong and binary
//! frames are ignored on the inbound side.

use crate::subscription::{LineResponse, RequestSource, ResponseSink, StreamError, SubscribeRequest};
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};

/// Inbound half of a WebSocket subscription stream
pub struct WsRequestSource<S> {
    read: SplitStream<WebSocketStream<S>>,
}

/// Outbound half of a WebSocket subscription stream
pub struct WsResponseSink<S> {
    write: Mutex<SplitSink<WebSocketStream<S>, Message>>,
}

/// Split an accepted WebSocket into engine-facing halves
pub fn split<S>(ws: WebSocketStream<S>) -> (WsRequestSource<S>, WsResponseSink<S>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (write, read) = ws.split();
    (
        WsRequestSource { read },
        WsResponseSink {
            write: Mutex::new(write),
        },
    )
}

/// Decode one text frame into a request
fn decode_request(text: &str) -> Result<SubscribeRequest, StreamError> {
    serde_json::from_str(text).map_err(|e| StreamError::Decode(e.to_string()))
}

#[async_trait]
impl<S> RequestSource for WsRequestSource<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Option<Result<SubscribeRequest, StreamError>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => return Some(decode_request(&text)),
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(StreamError::Transport(e.to_string()))),
            }
        }
    }
}

/// Encode one response as a text frame payload
pub fn encode_response(response: &LineResponse) -> Result<String, StreamError> {
    serde_json::to_string(response).map_err(|e| StreamError::Encode(e.to_string()))
}

#[async_trait]
impl<S> ResponseSink for WsResponseSink<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&self, response: LineResponse) -> Result<(), StreamError> {
        let text = encode_response(&response)?;
        let mut write = self.write.lock().await;
        write
            .send(Message::Text(text))
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))
    }
}
