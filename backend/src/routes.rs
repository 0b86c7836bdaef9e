//! Router construction
//!
//! Builds the axum router with every endpoint and the tracing middleware.

use crate::api;
use crate::state::AppState;
use crate::websocket;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    sessions: usize,
    max_sessions: usize,
    faq_reply_delay_ms: u64,
    support_reply_delay_ms: u64,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check and hello world
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Stateless assistant API
        .route("/api/assistant/engines", get(api::assistant::list_engines))
        .route("/api/assistant/match", post(api::assistant::match_input))
        // Session API
        .route(
            "/api/sessions",
            get(api::sessions::list_sessions).post(api::sessions::create_session),
        )
        .route(
            "/api/sessions/:id",
            get(api::sessions::get_session).delete(api::sessions::delete_session),
        )
        .route("/api/sessions/:id/open", post(api::sessions::open_session))
        .route("/api/sessions/:id/close", post(api::sessions::close_session))
        .route(
            "/api/sessions/:id/messages",
            post(api::sessions::send_message),
        )
        .route(
            "/api/sessions/:id/events",
            get(api::streaming::session_events),
        )
        // WebSocket for real-time updates
        .route("/ws/sessions/:id", get(websocket::websocket_handler))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(state)
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from the Waste Management Assistant!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.session_count().await,
        max_sessions: state.config.assistant.max_sessions,
        faq_reply_delay_ms: state.config.assistant.faq_reply_delay_ms,
        support_reply_delay_ms: state.config.assistant.support_reply_delay_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;

    #[tokio::test]
    async fn test_health_check_counts_sessions() {
        let state = Arc::new(AppState::default());
        state
            .sessions
            .create_session(crate::assistant::EngineKind::Faq, None)
            .await
            .unwrap();
        let response = health_check(State(state)).await.0;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.sessions, 1);
    }

    #[tokio::test]
    async fn test_health_check_reports_configuration() {
        let mut config = crate::config::Config::default();
        config.assistant.support_reply_delay_ms = 50;
        config.assistant.max_sessions = 3;
        let state = Arc::new(AppState::new(config));

        let response = health_check(State(state)).await.0;
        assert_eq!(response.faq_reply_delay_ms, 1000);
        assert_eq!(response.support_reply_delay_ms, 50);
        assert_eq!(response.max_sessions, 3);
    }

    #[tokio::test]
    async fn test_build_router() {
        // Route table must not panic on overlapping or malformed paths
        let _router = build_router(Arc::new(AppState::default()));
    }
}
