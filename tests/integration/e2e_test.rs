//! End-to-end integration tests

use crate::common::spawn_line_provider;
use futures_util::{SinkExt, StreamExt};
use sports_lines::cache::{Cache, MemoryCache};
use sports_lines::config::Config;
use sports_lines::feed::HttpFeedClient;
use sports_lines::ingest::IngestionPipeline;
use sports_lines::sport::Sport;
use sports_lines::subscription::{LineResponse, SubscriptionEngine};
use sports_lines::ws::LineServer;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.feed_workers().len(), Sport::ALL.len());
}

#[tokio::test]
async fn test_feed_to_subscriber() {
    let provider = spawn_line_provider(HashMap::from([
        ("soccer", "1.25"),
        ("football", "0.5"),
        ("baseball", "2.0"),
    ]))
    .await;

    let toml = format!(
        r#"
        [line_provider]
        url = "http://{}/api/v1/lines"
        timeout_secs = 2

        [intervals]
        soccer = 1
        football = 1
        baseball = 1
        "#,
        provider
    );
    let config: Config = toml::from_str(&toml).unwrap();

    let root = CancellationToken::new();
    let cache = MemoryCache::new();
    let feed = Arc::new(HttpFeedClient::new(Duration::from_secs(2)).unwrap());
    let pipeline = Arc::new(
        IngestionPipeline::new(
            config.feed_workers(),
            feed,
            Arc::new(cache.clone()),
            config.ingest.channel_capacity,
        )
        .with_cancel(&root),
    );
    let runner = Arc::clone(&pipeline);
    let ingest = tokio::spawn(async move { runner.run().await });

    // Wait for the first round of fetches to land.
    tokio::time::timeout(Duration::from_secs(5), async {
        while cache.len().await < Sport::ALL.len() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(cache.get_last_value("soccer").await.unwrap(), 1.25);

    let engine = SubscriptionEngine::new(Arc::new(cache.clone()));
    let server = LineServer::bind("127.0.0.1:0", engine, &root).await.unwrap();
    let addr = server.local_addr().unwrap();
    let streams = tokio::spawn(server.run());

    let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
    client
        .send(Message::Text(
            r#"{"sports":["baseball","soccer"],"updateIntervalSeconds":"1"}"#.to_string(),
        ))
        .await
        .unwrap();

    let response = loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg {
            break serde_json::from_str::<LineResponse>(&text).unwrap();
        }
    };
    assert_eq!(response.line["baseball"], 2.0);
    assert_eq!(response.line["soccer"], 1.25);
    assert!(!response.line.contains_key("football"));

    root.cancel();
    assert!(ingest.await.unwrap().is_ok());
    assert!(streams.await.unwrap().is_ok());
    assert!(pipeline.ingested() >= 3);
}
