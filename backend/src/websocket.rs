//! WebSocket handlers for real-time updates
//!
//! A chat widget connects to `/ws/sessions/:id`, receives the transcript and
//! every later change, and drives the session with JSON commands. Supports
//! ping/pong for connection keepalive.

use crate::api::streaming::create_stream;
use crate::api::utils::{validate_input, RouterState};
use crate::assistant::SupportMode;
use crate::chat::{SessionHandle, SessionId};
use crate::error::AppError;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Commands a client may send
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit user input
    Send {
        /// Message content
        content: String,
    },
    /// Reset the transcript, optionally switching mode
    Open {
        /// Mode to switch to
        #[serde(default)]
        mode: Option<SupportMode>,
    },
    /// Discard the transcript
    Close,
    /// Ping message for connection keepalive
    Ping,
}

/// Replies to client commands; transcript changes are sent as
/// `TranscriptEvent`s
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Pong message responding to ping
    Pong,
    /// Outcome of a `send` command
    SendResult {
        /// False when the input was empty or the session closed
        accepted: bool,
    },
    /// Command could not be handled
    Error {
        /// Human-readable reason
        message: String,
    },
}

/// WebSocket upgrade handler
///
/// # Returns
/// * `Result<Response, AppError>` - Upgrade response, or 404 for an unknown session
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(&id).await?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, handle)))
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, handle: SessionHandle) {
    let (mut sender, mut receiver) = socket.split();
    let session_id = handle.id().to_string();

    info!(session_id = %session_id, "WebSocket client connected");

    // Use a channel so events, replies and pings share one writer
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Message>();

    // Task to forward messages from channel to sender
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(msg).await {
                error!("Failed to send message: {}", e);
                break;
            }
        }
    });

    // Task to forward transcript events
    let event_tx = tx.clone();
    let events = create_stream(handle.clone());
    let mut event_task = tokio::spawn(async move {
        futures_util::pin_mut!(events);
        while let Some(event) = events.next().await {
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if event_tx.send(Message::Text(text)).is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize transcript event: {}", e),
            }
        }
    });

    // Task to send periodic pings
    let ping_tx = tx.clone();
    let mut ping_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
            if ping_tx.send(Message::Ping(vec![])).is_err() {
                break;
            }
        }
    });

    // Receive messages
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let reply = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(command) => handle_command(&handle, command).await,
                        Err(e) => {
                            warn!("Received unrecognized WebSocket message: {}", e);
                            Some(ServerMessage::Error {
                                message: format!("Unrecognized message: {}", e),
                            })
                        }
                    };
                    if let Some(reply) = reply {
                        if let Ok(text) = serde_json::to_string(&reply) {
                            if tx.send(Message::Text(text)).is_err() {
                                break;
                            }
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("WebSocket client disconnected");
                    break;
                }
                Ok(Message::Pong(_)) => {
                    // Client responded to ping
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to complete
    tokio::select! {
        _ = &mut send_task => {}
        _ = &mut event_task => {}
        _ = &mut ping_task => {}
        _ = &mut recv_task => {}
    }
    send_task.abort();
    event_task.abort();
    ping_task.abort();
    recv_task.abort();

    info!(session_id = %session_id, "WebSocket connection closed");
}

/// Apply a client command to the session
///
/// Returns the direct reply, if the command has one. Transcript changes
/// reach the client through the event stream, not here.
pub async fn handle_command(
    handle: &SessionHandle,
    command: ClientMessage,
) -> Option<ServerMessage> {
    debug!(session_id = %handle.id(), command = ?command, "WebSocket command");

    let result = match command {
        ClientMessage::Ping => return Some(ServerMessage::Pong),
        ClientMessage::Send { content } => {
            if let Err(e) = validate_input(&content) {
                return Some(ServerMessage::Error {
                    message: e.to_string(),
                });
            }
            handle
                .send(content)
                .await
                .map(|outcome| Some(ServerMessage::SendResult {
                    accepted: outcome.accepted,
                }))
        }
        ClientMessage::Open { mode } => handle.open(mode).await.map(|_| None),
        ClientMessage::Close => handle.close().await.map(|_| None),
    };

    result.unwrap_or_else(|e| {
        Some(ServerMessage::Error {
            message: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{EngineKind, SurfaceProfile};

    fn spawn(kind: EngineKind) -> SessionHandle {
        let surface: SurfaceProfile = kind.default_surface();
        SessionHandle::spawn("ws-test".to_string(), kind, surface)
    }

    #[test]
    fn test_client_message_parsing() {
        let send: ClientMessage =
            serde_json::from_str(r#"{"type":"send","content":"hi"}"#).unwrap();
        assert_eq!(
            send,
            ClientMessage::Send {
                content: "hi".to_string()
            }
        );

        let open: ClientMessage = serde_json::from_str(r#"{"type":"open"}"#).unwrap();
        assert_eq!(open, ClientMessage::Open { mode: None });

        let open: ClientMessage =
            serde_json::from_str(r#"{"type":"open","mode":"issue"}"#).unwrap();
        assert_eq!(
            open,
            ClientMessage::Open {
                mode: Some(SupportMode::Issue)
            }
        );
    }

    #[test]
    fn test_server_message_serialization() {
        let json = serde_json::to_string(&ServerMessage::SendResult { accepted: false }).unwrap();
        assert_eq!(json, r#"{"type":"send_result","accepted":false}"#);
    }

    #[tokio::test]
    async fn test_handle_ping() {
        let handle = spawn(EngineKind::Faq);
        let reply = handle_command(&handle, ClientMessage::Ping).await;
        assert_eq!(reply, Some(ServerMessage::Pong));
    }

    #[tokio::test]
    async fn test_handle_send_and_open() {
        let handle = spawn(EngineKind::Support);
        let reply = handle_command(&handle, ClientMessage::Open { mode: None }).await;
        assert_eq!(reply, None);

        let reply = handle_command(
            &handle,
            ClientMessage::Send {
                content: "bug".to_string(),
            },
        )
        .await;
        assert_eq!(reply, Some(ServerMessage::SendResult { accepted: true }));

        let reply = handle_command(
            &handle,
            ClientMessage::Send {
                content: " ".to_string(),
            },
        )
        .await;
        assert_eq!(reply, Some(ServerMessage::SendResult { accepted: false }));
    }

    #[tokio::test]
    async fn test_handle_command_on_stopped_session() {
        let handle = spawn(EngineKind::Faq);
        handle.shutdown().await;
        let reply = handle_command(&handle, ClientMessage::Close).await;
        assert!(matches!(reply, Some(ServerMessage::Error { .. })));
    }
}
