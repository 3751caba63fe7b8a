//! Live history subscription over the server websocket.
//!
//! LIFECYCLE
//! =========
//! 1. Fetch a one-time ticket (`Backend::ws_ticket`).
//! 2. `connect` upgrades `/api/ws?ticket=...`; the server's first message is
//!    `session:connected`.
//! 3. `next_event` yields decoded [`LiveEvent`]s until the server closes the
//!    socket (always right after `account:deleted`).
//!
//! Dropping the subscription closes the socket.

use futures_util::StreamExt;
use records::LiveEvent;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Websocket URL for `base_url` (`http` → `ws`, `https` → `wss`).
///
/// # Errors
///
/// Returns [`ClientError::Live`] for any other scheme.
pub fn ws_url(base_url: &str, ticket: &str) -> Result<String, ClientError> {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/api/ws?ticket={ticket}"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/api/ws?ticket={ticket}"));
    }
    Err(ClientError::Live(format!("unsupported base url: {base_url}")))
}

/// Decode one text frame.
///
/// # Errors
///
/// Returns [`ClientError::Json`] for payloads that are not a known event.
pub fn decode_event(text: &str) -> Result<LiveEvent, ClientError> {
    Ok(serde_json::from_str(text)?)
}

pub struct LiveSubscription {
    stream: WsStream,
}

impl LiveSubscription {
    /// # Errors
    ///
    /// Returns [`ClientError::Live`] if the URL is invalid or the upgrade is
    /// refused (for example an expired ticket).
    pub async fn connect(base_url: &str, ticket: &str) -> Result<Self, ClientError> {
        let url = ws_url(base_url, ticket)?;
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::Live(e.to_string()))?;
        tracing::debug!(base_url, "live subscription open");
        Ok(Self { stream })
    }

    /// Next event, or `None` once the server has closed the socket.
    ///
    /// # Errors
    ///
    /// Returns transport errors and undecodable payloads.
    pub async fn next_event(&mut self) -> Result<Option<LiveEvent>, ClientError> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Ok(None);
            };
            match message.map_err(|e| ClientError::Live(e.to_string()))? {
                Message::Text(text) => return decode_event(text.as_str()).map(Some),
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "live_test.rs"]
mod live_test;
