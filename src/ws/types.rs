//! WebSocket server types

/// WebSocket server errors
#[derive(Debug, Clone)]
pub enum WsError {
    /// Listener could not bind
    BindFailed(String),
    /// Listener address could not be read
    LocalAddr(String),
}

impl std::fmt::Display for WsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WsError::BindFailed(e) => write!(f, "Bind failed: {}", e),
            WsError::LocalAddr(e) => write!(f, "Local address unavailable: {}", e),
        }
    }
}

impl std::error::Error for WsError {}
