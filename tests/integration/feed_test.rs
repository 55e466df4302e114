//! Integration tests for the HTTP line feed

use crate::common::spawn_line_provider;
use sports_lines::feed::{FeedClient, FeedError, HttpFeedClient};
use std::collections::HashMap;
use std::time::Duration;

#[tokio::test]
async fn test_http_feed_fetches_line() {
    let addr = spawn_line_provider(HashMap::from([("soccer", "0.774"), ("football", "1.5")])).await;
    let client = HttpFeedClient::new(Duration::from_secs(2)).unwrap();

    let soccer = client
        .fetch(&format!("http://{}/api/v1/lines/soccer", addr))
        .await
        .unwrap();
    assert!((soccer - 0.774).abs() < 1e-9);

    let football = client
        .fetch(&format!("http://{}/api/v1/lines/football", addr))
        .await
        .unwrap();
    assert_eq!(football, 1.5);
}

#[tokio::test]
async fn test_http_feed_non_success_status() {
    let addr = spawn_line_provider(HashMap::from([("soccer", "0.774")])).await;
    let client = HttpFeedClient::new(Duration::from_secs(2)).unwrap();

    let result = client
        .fetch(&format!("http://{}/api/v1/lines/baseball", addr))
        .await;
    assert!(matches!(result, Err(FeedError::Status(404))));
}
