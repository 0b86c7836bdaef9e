//! Assistant API handlers
//!
//! Stateless endpoints: engine catalogue and one-shot keyword matching.

use crate::api::utils::{validate_input, RouterState};
use crate::assistant::{mode_profile, EngineKind, ResponseEngine, SubmitPolicy, SupportMode};
use crate::error::AppError;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

/// One support mode in the catalogue
#[derive(Debug, Serialize)]
pub struct ModeInfo {
    /// Mode name
    pub mode: SupportMode,
    /// Panel title
    pub title: &'static str,
    /// Greeting seeded on open
    pub greeting: &'static str,
    /// Recognized keywords in match order
    pub keywords: Vec<&'static str>,
}

/// One engine in the catalogue
#[derive(Debug, Serialize)]
pub struct EngineInfo {
    /// Engine name
    pub engine: EngineKind,
    /// Title shown for the default configuration
    pub title: &'static str,
    /// Reply delay in milliseconds
    pub reply_delay_ms: u64,
    /// Enter-key behaviour
    pub submit_policy: SubmitPolicy,
    /// Modes (support engine only)
    pub modes: Vec<ModeInfo>,
}

/// Engines list response
#[derive(Debug, Serialize)]
pub struct EnginesResponse {
    /// Available engines
    pub engines: Vec<EngineInfo>,
}

/// Match request
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Engine to consult
    pub engine: EngineKind,
    /// Support mode; defaults to help
    pub mode: Option<SupportMode>,
    /// Free-text input
    pub input: String,
}

/// Match response
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// Engine configuration that answered
    #[serde(flatten)]
    pub engine: ResponseEngine,
    /// Canned reply
    pub response: &'static str,
}

/// GET /api/assistant/engines - List engines and their modes
pub async fn list_engines(State(state): State<RouterState>) -> Json<EnginesResponse> {
    let surfaces = state.sessions.surfaces();

    let engines = EngineKind::ALL
        .into_iter()
        .map(|kind| {
            let surface = surfaces.for_kind(kind);
            let modes = match kind {
                EngineKind::Faq => Vec::new(),
                EngineKind::Support => SupportMode::ALL
                    .into_iter()
                    .map(|mode| {
                        let profile = mode_profile(mode);
                        ModeInfo {
                            mode,
                            title: profile.title,
                            greeting: profile.greeting,
                            keywords: profile.table.keywords().collect(),
                        }
                    })
                    .collect(),
            };
            EngineInfo {
                engine: kind,
                title: ResponseEngine::new(kind, None).title(),
                reply_delay_ms: surface.reply_delay.as_millis() as u64,
                submit_policy: surface.submit_policy,
                modes,
            }
        })
        .collect();

    Json(EnginesResponse { engines })
}

/// POST /api/assistant/match - Match input against an engine without a session
pub async fn match_input(
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    validate_input(&request.input)?;

    let engine = ResponseEngine::new(request.engine, request.mode);
    let response = engine.respond(&request.input);

    tracing::debug!(
        engine = request.engine.as_str(),
        mode = ?engine.mode(),
        input_len = request.input.len(),
        "Matched input"
    );

    Ok(Json(MatchResponse { engine, response }))
}
