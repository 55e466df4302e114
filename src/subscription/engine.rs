//! Subscription engine
//!
//! For one connected stream: read requests until the peer stops sending and
//! run one periodic delta task per accepted request. Each task owns its
//! baseline; the cache is the only state shared between tasks.

use super::stream::{RequestSource, ResponseSink, StreamError};
use super::{compute_tick, Baseline, SubscriptionRequest};
use crate::cache::Cache;
use crate::sport::Sport;
use crate::telemetry::{
    adjust_gauge, increment_counter, increment_sport_counter, CounterMetric, GaugeMetric,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Outcome of one served stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Requests that started a subscription task
    pub accepted: usize,
    /// Requests rejected at parse time
    pub rejected: usize,
}

/// Serves subscription streams against a shared cache
#[derive(Clone)]
pub struct SubscriptionEngine {
    cache: Arc<dyn Cache>,
    cancel: CancellationToken,
}

impl SubscriptionEngine {
    /// Create an engine reading from `cache`
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            cancel: CancellationToken::new(),
        }
    }

    /// Tie every served stream to a parent token
    pub fn with_cancel(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    /// Serve one stream until the peer stops sending or the engine is cancelled
    ///
    /// Subscription tasks spawned for this stream are cancelled and joined
    /// before returning.
    pub async fn serve_stream<S, K>(&self, mut source: S, sink: K) -> StreamStats
    where
        S: RequestSource,
        K: ResponseSink + 'static,
    {
        let stream_id = Uuid::new_v4();
        let sink: Arc<dyn ResponseSink> = Arc::new(sink);
        let stream_cancel = self.cancel.child_token();
        let mut tasks = JoinSet::new();
        let mut stats = StreamStats::default();

        adjust_gauge(GaugeMetric::ActiveStreams, 1.0);
        tracing::info!(%stream_id, "Subscription stream opened");

        loop {
            let next = tokio::select! {
                biased;
                _ = stream_cancel.cancelled() => break,
                next = source.recv() => next,
            };

            let message = match next {
                None => {
                    tracing::info!(%stream_id, "Subscription stream ended by peer");
                    break;
                }
                Some(Err(StreamError::Decode(e))) => {
                    stats.rejected += 1;
                    increment_counter(CounterMetric::RequestsRejected);
                    tracing::warn!(%stream_id, error = %e, "Skipping malformed message");
                    continue;
                }
                Some(Err(e)) => {
                    tracing::warn!(%stream_id, error = %e, "Subscription stream receive failed");
                    break;
                }
                Some(Ok(message)) => message,
            };

            match SubscriptionRequest::parse(&message) {
                Ok(request) => {
                    stats.accepted += 1;
                    tracing::info!(
                        %stream_id,
                        sports = ?request.sports,
                        interval_secs = request.interval.as_secs(),
                        "Subscription started"
                    );
                    tasks.spawn(run_subscription(
                        stream_id,
                        request,
                        Arc::clone(&self.cache),
                        Arc::clone(&sink),
                        stream_cancel.child_token(),
                    ));
                }
                Err(e) => {
                    stats.rejected += 1;
                    increment_counter(CounterMetric::RequestsRejected);
                    tracing::error!(%stream_id, request = ?message, error = %e, "Subscription request rejected");
                }
            }
        }

        stream_cancel.cancel();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(%stream_id, error = %e, "Subscription task panicked");
            }
        }

        adjust_gauge(GaugeMetric::ActiveStreams, -1.0);
        tracing::info!(
            %stream_id,
            accepted = stats.accepted,
            rejected = stats.rejected,
            "Subscription stream closed"
        );
        stats
    }
}

/// Periodic delta task for one subscription
async fn run_subscription(
    stream_id: Uuid,
    request: SubscriptionRequest,
    cache: Arc<dyn Cache>,
    sink: Arc<dyn ResponseSink>,
    cancel: CancellationToken,
) {
    adjust_gauge(GaugeMetric::ActiveSubscriptions, 1.0);

    let mut ticker = tokio::time::interval_at(Instant::now() + request.interval, request.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut baseline: Option<Baseline> = None;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let readings = read_lines(cache.as_ref(), &request.sports).await;
        let next = compute_tick(baseline.as_ref(), &readings);
        let response = next.response();

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = sink.send(response.into()) => sent,
        };

        match sent {
            Ok(()) => {
                increment_counter(CounterMetric::ResponsesSent);
                tracing::debug!(%stream_id, sports = ?request.sports, "Delta response sent");
            }
            Err(e) => {
                increment_counter(CounterMetric::SendErrors);
                tracing::warn!(%stream_id, error = %e, "Delta response send failed");
            }
        }

        baseline = Some(next);
    }

    adjust_gauge(GaugeMetric::ActiveSubscriptions, -1.0);
    tracing::debug!(%stream_id, sports = ?request.sports, "Subscription stopped");
}

/// Read the current raw line for every sport; failed reads become `None`
async fn read_lines(cache: &dyn Cache, sports: &[Sport]) -> Vec<(Sport, Option<f64>)> {
    let mut readings = Vec::with_capacity(sports.len());
    for sport in sports {
        let raw = match cache.get_last_value(sport.as_str()).await {
            Ok(value) => Some(value),
            Err(e) => {
                increment_sport_counter(CounterMetric::CacheReadErrors, *sport);
                tracing::warn!(sport = %sport, error = %e, "Cache read failed");
                None
            }
        };
        readings.push((*sport, raw));
    }
    readings
}
