//! WebSocket handler: live history push.
//!
//! DESIGN
//! ======
//! The socket is push-only. After the upgrade the connection registers a
//! subscriber with the `LiveHub` and enters a `select!` loop that forwards
//! hub events to the client and watches the socket for close. Inbound text
//! is ignored.
//!
//! LIFECYCLE
//! =========
//! 1. `GET /api/ws?ticket=` consumes a one-time ticket → user id
//! 2. Upgrade → send `session:connected`
//! 3. Forward `workout:created` events from any session of the same user
//! 4. `account:deleted` is forwarded and then the socket is closed
//! 5. Close → unsubscribe

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use records::LiveEvent;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services;
use crate::services::session::TicketKind;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WsQuery {
    ticket: Option<String>,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, Query(params): Query<WsQuery>, ws: WebSocketUpgrade) -> Response {
    let Some(ticket) = params.ticket.as_deref().filter(|t| !t.is_empty()) else {
        return (StatusCode::UNAUTHORIZED, "ticket required").into_response();
    };

    let user_id = match services::session::consume_ticket(&state.pool, TicketKind::Live, ticket, None).await {
        Ok(Some(uid)) => uid,
        Ok(None) => return (StatusCode::UNAUTHORIZED, "invalid or expired ticket").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "ws ticket validation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "ticket validation error").into_response();
        }
    };

    ws.on_upgrade(move |socket| run_ws(socket, state, user_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, user_id: Uuid) {
    let (subscriber_id, mut events) = state.live.subscribe(user_id).await;
    info!(%subscriber_id, %user_id, "ws: subscriber connected");

    if send_event(&mut socket, &LiveEvent::Connected { user_id }).await {
        loop {
            tokio::select! {
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if !send_event(&mut socket, &event).await || closes_stream(&event) {
                        break;
                    }
                }
            }
        }
    }

    state.live.unsubscribe(user_id, subscriber_id).await;
    info!(%subscriber_id, %user_id, "ws: subscriber disconnected");
}

/// Events after which the server ends the stream.
pub(crate) fn closes_stream(event: &LiveEvent) -> bool {
    matches!(event, LiveEvent::AccountDeleted)
}

pub(crate) fn encode_event(event: &LiveEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Send one event. Returns `false` once the socket can no longer be written.
async fn send_event(socket: &mut WebSocket, event: &LiveEvent) -> bool {
    let json = match encode_event(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return true;
        }
    };
    match socket.send(Message::Text(json.into())).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "ws: send failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
