//! WebSocket stream server
//!
//! Accepts subscription streams over WebSocket and hands each one to the
//! subscription engine.

mod server;
mod transport;
mod types;

pub use server::LineServer;
pub use transport::{split, WsRequestSource, WsResponseSink};
pub use types::WsError;
