//! WebSocket stream server tests

use futures_util::{SinkExt, StreamExt};
use sports_lines::cache::{Cache, MemoryCache};
use sports_lines::subscription::{LineResponse, SubscriptionEngine};
use sports_lines::ws::LineServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server(cache: MemoryCache) -> (SocketAddr, CancellationToken) {
    let cancel = CancellationToken::new();
    let engine = SubscriptionEngine::new(Arc::new(cache));
    let server = LineServer::bind("127.0.0.1:0", engine, &cancel).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    (addr, cancel)
}

async fn next_response(client: &mut Client) -> LineResponse {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for response")
            .expect("stream ended")
            .expect("transport error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_ws_subscription_receives_deltas() {
    let cache = MemoryCache::new();
    cache.set("soccer", 10.0).await.unwrap();
    cache.set("football", 3.0).await.unwrap();
    let (addr, cancel) = start_server(cache.clone()).await;

    let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
    client
        .send(Message::Text(
            r#"{"sports":["soccer","football"],"updateIntervalSeconds":"1"}"#.to_string(),
        ))
        .await
        .unwrap();

    let first = next_response(&mut client).await;
    assert_eq!(first.line["soccer"], 10.0);
    assert_eq!(first.line["football"], 3.0);

    cache.set("soccer", 12.0).await.unwrap();
    let second = next_response(&mut client).await;
    assert_eq!(second.line["soccer"], 2.0);
    assert_eq!(second.line["football"], 0.0);

    client.close(None).await.unwrap();
    cancel.cancel();
}

#[tokio::test]
async fn test_ws_malformed_message_keeps_stream_open() {
    let cache = MemoryCache::new();
    cache.set("baseball", 7.5).await.unwrap();
    let (addr, cancel) = start_server(cache).await;

    let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
    client
        .send(Message::Text("not valid json".to_string()))
        .await
        .unwrap();
    client
        .send(Message::Text(
            r#"{"sports":["baseball"],"updateIntervalSeconds":"abc"}"#.to_string(),
        ))
        .await
        .unwrap();
    client
        .send(Message::Text(
            r#"{"sports":["baseball"],"updateIntervalSeconds":"1"}"#.to_string(),
        ))
        .await
        .unwrap();

    let response = next_response(&mut client).await;
    assert_eq!(response.line.len(), 1);
    assert_eq!(response.line["baseball"], 7.5);

    cancel.cancel();
}

#[tokio::test]
async fn test_ws_server_cancel_closes_clients() {
    let (addr, cancel) = start_server(MemoryCache::new()).await;
    let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();

    cancel.cancel();

    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok());
}
