//! Ingestion and subscription sides meeting only through the cache

use crate::common::{FlakyCache, ManualFeed};
use sports_lines::cache::{Cache, MemoryCache};
use sports_lines::ingest::{FeedWorkerSpec, IngestionPipeline};
use sports_lines::sport::Sport;
use sports_lines::subscription::{LineResponse, SubscribeRequest, SubscriptionEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn worker(sport: Sport, secs: u64) -> FeedWorkerSpec {
    FeedWorkerSpec {
        sport,
        url: format!("http://feed/{}", sport),
        interval: Duration::from_secs(secs),
    }
}

#[tokio::test(start_paused = true)]
async fn test_ingested_values_reach_subscriber() {
    let feed = Arc::new(ManualFeed::default());
    feed.set("http://feed/soccer", 10.0);
    feed.set("http://feed/football", 3.0);

    let cache = MemoryCache::new();
    let pipeline = Arc::new(IngestionPipeline::new(
        vec![worker(Sport::Soccer, 1), worker(Sport::Football, 1)],
        feed.clone(),
        Arc::new(cache.clone()),
        8,
    ));
    let runner = Arc::clone(&pipeline);
    let ingest = tokio::spawn(async move { runner.run().await });

    let engine = SubscriptionEngine::new(Arc::new(cache.clone()));
    let (req_tx, req_rx) = mpsc::channel(4);
    let (resp_tx, mut resp_rx) = mpsc::channel::<LineResponse>(4);
    let stream = tokio::spawn(async move { engine.serve_stream(req_rx, resp_tx).await });

    req_tx
        .send(SubscribeRequest::new(&["soccer", "football"], "5"))
        .await
        .unwrap();

    let first = resp_rx.recv().await.unwrap();
    assert_eq!(first.line["soccer"], 10.0);
    assert_eq!(first.line["football"], 3.0);

    feed.set("http://feed/soccer", 12.0);
    let second = resp_rx.recv().await.unwrap();
    assert_eq!(second.line["soccer"], 2.0);
    assert_eq!(second.line["football"], 0.0);

    drop(req_tx);
    assert_eq!(stream.await.unwrap().accepted, 1);

    pipeline.stop();
    assert!(ingest.await.unwrap().is_ok());
    assert!(pipeline.ingested() >= 20);
}

#[tokio::test(start_paused = true)]
async fn test_failing_feed_does_not_block_others() {
    let feed = Arc::new(ManualFeed::default());
    feed.set("http://feed/soccer", 1.0);

    let cache = MemoryCache::new();
    let pipeline = Arc::new(IngestionPipeline::new(
        vec![worker(Sport::Soccer, 1), worker(Sport::Baseball, 1)],
        feed.clone(),
        Arc::new(cache.clone()),
        8,
    ));
    let runner = Arc::clone(&pipeline);
    let ingest = tokio::spawn(async move { runner.run().await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    for value in [2.0, 3.0, 4.0] {
        feed.set("http://feed/soccer", value);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cache.get_last_value("soccer").await.unwrap(), value);
    }
    assert!(cache.get_last_value("baseball").await.is_err());

    pipeline.stop();
    assert!(ingest.await.unwrap().is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_cache_read_failure_isolated_to_one_sport() {
    let cache = FlakyCache::default();
    cache.set("soccer", 10.0).await.unwrap();
    cache.set("football", 3.0).await.unwrap();
    cache.fail_reads_for("football");

    let engine = SubscriptionEngine::new(Arc::new(cache.clone()));
    let (req_tx, req_rx) = mpsc::channel(4);
    let (resp_tx, mut resp_rx) = mpsc::channel::<LineResponse>(4);
    tokio::spawn(async move { engine.serve_stream(req_rx, resp_tx).await });

    req_tx
        .send(SubscribeRequest::new(&["soccer", "football"], "1"))
        .await
        .unwrap();

    let first = resp_rx.recv().await.unwrap();
    assert_eq!(first.line["soccer"], 10.0);
    assert_eq!(first.line["football"], 0.0);

    cache.set("soccer", 11.0).await.unwrap();
    let second = resp_rx.recv().await.unwrap();
    assert_eq!(second.line["soccer"], 1.0);
    assert_eq!(second.line["football"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_closing_stream_stops_subscriptions() {
    let cache = MemoryCache::new();
    cache.set("soccer", 1.0).await.unwrap();

    let engine = SubscriptionEngine::new(Arc::new(cache));
    let (req_tx, req_rx) = mpsc::channel(4);
    let (resp_tx, mut resp_rx) = mpsc::channel::<LineResponse>(16);
    let stream = tokio::spawn(async move { engine.serve_stream(req_rx, resp_tx).await });

    req_tx.send(SubscribeRequest::new(&["soccer"], "1")).await.unwrap();
    req_tx.send(SubscribeRequest::new(&["soccer"], "2")).await.unwrap();
    resp_rx.recv().await.unwrap();

    drop(req_tx);
    let stats = stream.await.unwrap();
    assert_eq!(stats.accepted, 2);

    // Every task has been joined, so the response channel is closed.
    while resp_rx.recv().await.is_some() {}
}
