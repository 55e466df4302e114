//! Fan-out/fan-in ingestion pipeline
//!
//! Each feed worker runs its own polling task and pushes samples into one
//! bounded channel. A single drain loop writes them to the cache in arrival
//! order. Pollers wait when the channel is full; nothing is dropped.

use super::{FeedWorkerSpec, IngestError};
use crate::cache::Cache;
use crate::feed::{FeedClient, Rate};
use crate::telemetry::{increment_sport_counter, record_ingest_lag, CounterMetric};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Keeps the cache populated with the latest line per sport
pub struct IngestionPipeline {
    workers: Vec<FeedWorkerSpec>,
    feed: Arc<dyn FeedClient>,
    cache: Arc<dyn Cache>,
    channel_capacity: usize,
    cancel: CancellationToken,
    ingested: Arc<AtomicU64>,
}

impl IngestionPipeline {
    /// Create a pipeline over the given workers
    pub fn new(
        workers: Vec<FeedWorkerSpec>,
        feed: Arc<dyn FeedClient>,
        cache: Arc<dyn Cache>,
        channel_capacity: usize,
    ) -> Self {
        Self {
            workers,
            feed,
            cache,
            channel_capacity: channel_capacity.max(1),
            cancel: CancellationToken::new(),
            ingested: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Tie the pipeline's lifetime to a parent token
    pub fn with_cancel(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    /// Number of rates written to the cache so far
    pub fn ingested(&self) -> u64 {
        self.ingested.load(Ordering::Relaxed)
    }

    /// Stop draining and cancel all pollers
    pub fn stop(&self) {
        tracing::info!("Ingestion pipeline stopping");
        self.cancel.cancel();
    }

    /// Run until stopped or until a cache write fails
    pub async fn run(&self) -> Result<(), IngestError> {
        if self.workers.is_empty() {
            tracing::warn!("No feed workers configured");
            return Ok(());
        }

        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let pollers_cancel = self.cancel.child_token();
        let mut pollers = JoinSet::new();

        for worker in &self.workers {
            tracing::info!(
                sport = %worker.sport,
                url = %worker.url,
                interval_secs = worker.interval.as_secs(),
                "Starting feed poller"
            );
            pollers.spawn(poll_feed(
                worker.clone(),
                Arc::clone(&self.feed),
                tx.clone(),
                pollers_cancel.clone(),
            ));
        }
        drop(tx);

        let result = self.drain(rx).await;

        pollers_cancel.cancel();
        while let Some(joined) = pollers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Feed poller panicked");
            }
        }

        if let Err(ref e) = result {
            tracing::error!(error = %e, "Ingestion pipeline failed");
        }
        result
    }

    /// Write merged rates to the cache one at a time
    async fn drain(&self, mut rx: mpsc::Receiver<Rate>) -> Result<(), IngestError> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!(ingested = self.ingested(), "Ingestion drain stopped");
                    return Ok(());
                }
                next = rx.recv() => {
                    let Some(rate) = next else {
                        tracing::info!("All feed pollers finished");
                        return Ok(());
                    };

                    self.cache
                        .set(rate.sport.as_str(), rate.value)
                        .await
                        .map_err(|source| IngestError::CacheWrite { sport: rate.sport, source })?;

                    self.ingested.fetch_add(1, Ordering::Relaxed);
                    increment_sport_counter(CounterMetric::LinesIngested, rate.sport);
                    let lag = rate.age();
                    record_ingest_lag(rate.sport, lag);
                    tracing::debug!(
                        sport = %rate.sport,
                        value = rate.value,
                        lag_ms = lag.as_millis() as u64,
                        "Line cached"
                    );
                }
            }
        }
    }
}

/// Poll one feed forever; fetch failures are logged and retried next tick
async fn poll_feed(
    worker: FeedWorkerSpec,
    feed: Arc<dyn FeedClient>,
    tx: mpsc::Sender<Rate>,
    cancel: CancellationToken,
) {
    loop {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            fetched = feed.fetch(&worker.url) => fetched,
        };

        match fetched {
            Ok(value) => {
                let rate = Rate::new(worker.sport, value);
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    sent = tx.send(rate) => {
                        if sent.is_err() {
                            tracing::debug!(sport = %worker.sport, "Merge channel closed");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                increment_sport_counter(CounterMetric::FeedFetchErrors, worker.sport);
                tracing::warn!(sport = %worker.sport, url = %worker.url, error = %e, "Feed fetch failed");
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(worker.interval) => {}
        }
    }

    tracing::debug!(sport = %worker.sport, "Feed poller stopped");
}
