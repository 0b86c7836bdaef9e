//! Streaming utilities for Server-Sent Events (SSE)
//!
//! Streams a session's transcript events to the client. The first event is
//! always a `reset` carrying the full transcript so a renderer can start
//! from it.

use crate::api::utils::RouterState;
use crate::chat::{SessionHandle, SessionId, TranscriptEvent};
use crate::error::AppError;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures_util::{stream::Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// GET /api/sessions/:id/events - SSE stream of transcript events
pub async fn session_events(
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(&id).await?;
    create_sse_stream(handle)
}

/// Create an SSE response from a session's event feed
pub fn create_sse_stream(handle: SessionHandle) -> Result<Response, AppError> {
    let sse_stream = create_stream(handle).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"{}"}}"#, e)
        });
        Ok::<_, std::io::Error>(format!("data: {}\n\n", data))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(sse_stream))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build SSE response: {}", e)))
}

/// Transcript events for one session, starting with its current state
///
/// Subscribes before taking the snapshot, so no event is lost in between.
/// Ends after the session actor reports `Ended`.
pub fn create_stream(handle: SessionHandle) -> impl Stream<Item = TranscriptEvent> {
    use async_stream::stream;

    stream! {
        let mut events = handle.subscribe();

        match handle.snapshot().await {
            Ok(snapshot) => {
                yield TranscriptEvent::Reset {
                    epoch: snapshot.epoch,
                    title: snapshot.title,
                    messages: snapshot.messages,
                };
            }
            Err(e) => {
                debug!(session_id = %handle.id(), error = %e, "Session gone before streaming");
                return;
            }
        }

        loop {
            match events.recv().await {
                Ok(event) => {
                    let ended = matches!(event, TranscriptEvent::Ended { .. });
                    yield event;
                    if ended {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(session_id = %handle.id(), skipped, "Event stream lagged, resyncing");
                    match handle.snapshot().await {
                        Ok(snapshot) => {
                            yield TranscriptEvent::Reset {
                                epoch: snapshot.epoch,
                                title: snapshot.title,
                                messages: snapshot.messages,
                            };
                        }
                        Err(_) => break,
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
