//! Subscription module
//!
//! Per-stream subscription handling: request parsing, per-subscription
//! periodic delta tasks, and the duplex stream abstraction they run over

mod delta;
mod engine;
mod stream;
mod types;

pub use delta::compute_tick;
pub use engine::{StreamStats, SubscriptionEngine};
pub use stream::{RequestSource, ResponseSink, StreamError};
pub use types::{
    Baseline, DeltaResponse, LineResponse, SampleEntry, SubscribeRequest, SubscriptionError,
    SubscriptionRequest, MAX_UPDATE_INTERVAL_SECS,
};
