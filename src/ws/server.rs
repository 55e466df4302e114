//! WebSocket accept loop

use super::{transport, WsError};
use crate::subscription::SubscriptionEngine;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_tungstenite::accept_async;
use tokio_util::sync::CancellationToken;

/// Serves subscription streams over WebSocket
pub struct LineServer {
    listener: TcpListener,
    engine: SubscriptionEngine,
    cancel: CancellationToken,
}

impl LineServer {
    /// Bind the listener
    ///
    /// Streams served by this server are cancelled together with `cancel`.
    pub async fn bind(
        addr: &str,
        engine: SubscriptionEngine,
        cancel: &CancellationToken,
    ) -> Result<Self, WsError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| WsError::BindFailed(format!("{}: {}", addr, e)))?;
        let cancel = cancel.child_token();

        Ok(Self {
            listener,
            engine: engine.with_cancel(&cancel),
            cancel,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr, WsError> {
        self.listener
            .local_addr()
            .map_err(|e| WsError::LocalAddr(e.to_string()))
    }

    /// Accept connections until cancelled, then wait for open streams to finish
    pub async fn run(self) -> Result<(), WsError> {
        tracing::info!(addr = ?self.local_addr()?, "Line stream server listening");

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((tcp, peer)) => {
                        connections.spawn(handle_connection(tcp, peer, self.engine.clone()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                    }
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Connection task panicked");
                    }
                }
            }
        }

        tracing::info!(open = connections.len(), "Line stream server stopping");
        while connections.join_next().await.is_some() {}
        Ok(())
    }
}

/// Upgrade one TCP connection and serve it until the peer leaves
async fn handle_connection(tcp: TcpStream, peer: SocketAddr, engine: SubscriptionEngine) {
    let ws = match accept_async(tcp).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!(%peer, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    tracing::info!(%peer, "Subscriber connected");
    let (source, sink) = transport::split(ws);
    let stats = engine.serve_stream(source, sink).await;
    tracing::info!(
        %peer,
        accepted = stats.accepted,
        rejected = stats.rejected,
        "Subscriber disconnected"
    );
}
