//! Run command implementation

use crate::cache::{Cache, MemoryCache};
use crate::config::Config;
use crate::feed::HttpFeedClient;
use crate::health::{HealthServer, HealthState};
use crate::ingest::IngestionPipeline;
use crate::subscription::SubscriptionEngine;
use crate::ws::LineServer;
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the WebSocket listen address
    #[arg(long)]
    pub stream_addr: Option<String>,

    /// Override the health server listen address
    #[arg(long)]
    pub http_addr: Option<String>,
}

impl RunArgs {
    /// Run until Ctrl-C or a fatal ingestion error
    pub async fn execute(
        &self,
        config: Config,
        metrics: Option<PrometheusHandle>,
    ) -> anyhow::Result<()> {
        let root = CancellationToken::new();
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());

        let feed = Arc::new(HttpFeedClient::new(Duration::from_secs(
            config.line_provider.timeout_secs,
        ))?);
        let pipeline = Arc::new(
            IngestionPipeline::new(
                config.feed_workers(),
                feed,
                Arc::clone(&cache),
                config.ingest.channel_capacity,
            )
            .with_cancel(&root),
        );

        let stream_addr = self
            .stream_addr
            .as_deref()
            .unwrap_or(&config.server.stream_addr);
        let http_addr = self.http_addr.as_deref().unwrap_or(&config.server.http_addr);

        let engine = SubscriptionEngine::new(Arc::clone(&cache));
        let line_server = LineServer::bind(stream_addr, engine, &root).await?;
        let health_state = Arc::new(HealthState::new(Arc::clone(&cache), metrics));
        let health_server = HealthServer::bind(http_addr, health_state, &root).await?;

        let mut ingest = {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.run().await })
        };
        let streams = tokio::spawn(line_server.run());
        let health = tokio::spawn(health_server.run());

        let finished = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
                tracing::info!("Shutting down");
                None
            }
            joined = &mut ingest => Some(joined),
        };

        root.cancel();

        let ingest_result = match finished {
            Some(joined) => joined,
            None => ingest.await,
        }?;
        streams.await??;
        health.await??;

        tracing::info!(ingested = pipeline.ingested(), "Stopped");
        ingest_result?;
        Ok(())
    }
}
