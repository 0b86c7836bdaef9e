//! Session API handlers
//!
//! Create, inspect, reopen, close and delete chat sessions, and submit
//! messages to them.

use crate::api::utils::{validate_input, RouterState};
use crate::assistant::{EngineKind, SupportMode};
use crate::chat::{SendOutcome, SessionId, SessionSnapshot};
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

/// Request to create a session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Engine answering the session
    pub engine: EngineKind,
    /// Initial mode (support engine only)
    pub mode: Option<SupportMode>,
}

/// Request to reopen a session
#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    /// Mode to switch to; keeps the current mode when absent
    pub mode: Option<SupportMode>,
}

/// Request to send a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message content
    pub content: String,
}

/// Sessions list response
#[derive(Debug, Serialize)]
pub struct SessionsListResponse {
    /// IDs of registered sessions
    pub sessions: Vec<SessionId>,
    /// Total number of sessions
    pub count: usize,
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// ID the message refers to
    pub id: SessionId,
}

/// POST /api/sessions - Create and open a session
pub async fn create_session(
    State(state): State<RouterState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let snapshot = state
        .sessions
        .create_session(request.engine, request.mode)
        .await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/sessions - List session IDs
pub async fn list_sessions(State(state): State<RouterState>) -> Json<SessionsListResponse> {
    let sessions = state.sessions.session_ids().await;
    Json(SessionsListResponse {
        count: sessions.len(),
        sessions,
    })
}

/// GET /api/sessions/:id - Session snapshot
pub async fn get_session(
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(&id).await?;
    Ok(Json(handle.snapshot().await?))
}

/// POST /api/sessions/:id/open - Reset the transcript, optionally switching mode
pub async fn open_session(
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
    request: Option<Json<OpenSessionRequest>>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let Json(request) = request.unwrap_or_default();
    let handle = state.sessions.get(&id).await?;
    Ok(Json(handle.open(request.mode).await?))
}

/// POST /api/sessions/:id/close - Discard the transcript and pending replies
pub async fn close_session(
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(&id).await?;
    Ok(Json(handle.close().await?))
}

/// POST /api/sessions/:id/messages - Submit user input
///
/// Empty or whitespace-only input is not an error; it comes back with
/// `accepted: false`.
pub async fn send_message(
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendOutcome>, AppError> {
    validate_input(&request.content)?;
    let handle = state.sessions.get(&id).await?;
    Ok(Json(handle.send(request.content).await?))
}

/// DELETE /api/sessions/:id - Stop and forget a session
pub async fn delete_session(
    State(state): State<RouterState>,
    Path(id): Path<SessionId>,
) -> Result<Json<MessageResponse>, AppError> {
    state.sessions.remove_session(&id).await?;
    Ok(Json(MessageResponse {
        message: "Session deleted successfully".to_string(),
        id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;
    use crate::state::AppState;
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_router_state() -> RouterState {
        Arc::new(AppState::default())
    }

    async fn create(
        state: &RouterState,
        engine: EngineKind,
        mode: Option<SupportMode>,
    ) -> SessionId {
        let request = CreateSessionRequest { engine, mode };
        let (status, Json(snapshot)) = create_session(State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        snapshot.id
    }

    #[tokio::test]
    async fn test_list_sessions_empty() {
        let state = create_test_router_state();
        let response = list_sessions(State(state)).await.0;
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Faq, None).await;

        let snapshot = get_session(State(state.clone()), Path(id.clone()))
            .await
            .unwrap()
            .0;
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.title, "Waste Management Assistant");
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].sender, Sender::Bot);

        let listed = list_sessions(State(state)).await.0;
        assert_eq!(listed.sessions, vec![id]);
    }

    #[tokio::test]
    async fn test_get_session_not_found() {
        let state = create_test_router_state();
        let result = get_session(State(state), Path("nonexistent".to_string())).await;
        match result.unwrap_err() {
            AppError::SessionNotFound(_) => {}
            other => panic!("Expected SessionNotFound error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_message_and_reply() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Support, Some(SupportMode::Support)).await;

        let request = SendMessageRequest {
            content: "I can't login".to_string(),
        };
        let outcome = send_message(State(state.clone()), Path(id.clone()), Json(request))
            .await
            .unwrap()
            .0;
        assert!(outcome.accepted);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let snapshot = get_session(State(state), Path(id)).await.unwrap().0;
        assert_eq!(snapshot.messages.len(), 3);
        assert!(snapshot.messages[2]
            .content
            .starts_with("If you're having trouble logging in"));
    }

    #[tokio::test]
    async fn test_send_empty_message_is_not_an_error() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Faq, None).await;
        let request = SendMessageRequest {
            content: "   ".to_string(),
        };
        let outcome = send_message(State(state), Path(id), Json(request))
            .await
            .unwrap()
            .0;
        assert!(!outcome.accepted);
    }

    #[tokio::test]
    async fn test_open_switches_mode() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Support, Some(SupportMode::Support)).await;

        let request = OpenSessionRequest {
            mode: Some(SupportMode::Issue),
        };
        let snapshot = open_session(State(state), Path(id), Some(Json(request)))
            .await
            .unwrap()
            .0;
        assert_eq!(snapshot.mode, Some(SupportMode::Issue));
        assert_eq!(snapshot.title, "Report an Issue");
        assert_eq!(snapshot.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_open_without_body_keeps_mode() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Support, Some(SupportMode::Issue)).await;
        let snapshot = open_session(State(state), Path(id), None).await.unwrap().0;
        assert_eq!(snapshot.mode, Some(SupportMode::Issue));
    }

    #[tokio::test]
    async fn test_close_session() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Faq, None).await;
        let snapshot = close_session(State(state), Path(id)).await.unwrap().0;
        assert!(!snapshot.is_open);
        assert!(snapshot.messages.is_empty());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let state = create_test_router_state();
        let id = create(&state, EngineKind::Faq, None).await;

        let response = delete_session(State(state.clone()), Path(id.clone()))
            .await
            .unwrap()
            .0;
        assert_eq!(response.id, id);

        let result = get_session(State(state), Path(id)).await;
        assert!(result.is_err());
    }
}
