//! HTTP request handlers for the command API.

use super::AppState;
use crate::engine::EngineError;
use crate::registry::RegistryError;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

/// Default number of history entries when the client does not ask for a
/// specific amount.
const DEFAULT_HISTORY_LIMIT: usize = 10;

fn engine_error_response(e: EngineError) -> Response {
    match e {
        EngineError::InvalidUrl(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        EngineError::Registry(RegistryError::AlreadyExists) => {
            (StatusCode::CONFLICT, "URL is already monitored").into_response()
        }
        EngineError::Registry(RegistryError::NotFound) => {
            (StatusCode::NOT_FOUND, "URL is not monitored").into_response()
        }
    }
}

/// Gate commands that trigger probes or mutate the registry. Returns the
/// 429 response to send when the (command, tenant) pair is still cooling
/// down.
fn check_cooldown(state: &AppState, command: &str, tenant: &str) -> Option<Response> {
    match state.cooldowns.try_acquire(command, tenant) {
        Ok(()) => None,
        Err(remaining) => Some(
            (
                StatusCode::TOO_MANY_REQUESTS,
                format!("cooldown active: retry in {:.1}s", remaining.as_secs_f64()),
            )
                .into_response(),
        ),
    }
}

// ============================================================================
// Targets
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterTargetRequest {
    pub url: String,
}

pub async fn handle_register_target(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    Json(req): Json<RegisterTargetRequest>,
) -> impl IntoResponse {
    if let Some(rejection) = check_cooldown(&state, "add", &tenant) {
        return rejection;
    }

    match state.engine.register_target(&tenant, &req.url).await {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(e) => engine_error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub url: String,
}

pub async fn handle_unregister_target(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    Query(query): Query<TargetQuery>,
) -> impl IntoResponse {
    if let Some(rejection) = check_cooldown(&state, "remove", &tenant) {
        return rejection;
    }

    match state.engine.unregister_target(&tenant, &query.url) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => engine_error_response(e),
    }
}

pub async fn handle_list_targets(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> impl IntoResponse {
    Json(state.engine.list_targets(&tenant))
}

// ============================================================================
// Checks & history
// ============================================================================

pub async fn handle_check_now(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    Query(query): Query<TargetQuery>,
) -> impl IntoResponse {
    if let Some(rejection) = check_cooldown(&state, "check", &tenant) {
        return rejection;
    }

    match state.engine.check_now(&tenant, &query.url).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => engine_error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub url: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn handle_history(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    match state.engine.history(&tenant, &query.url, limit) {
        Ok(outcomes) => Json(outcomes).into_response(),
        Err(e) => engine_error_response(e),
    }
}

// ============================================================================
// Stats
// ============================================================================

pub async fn handle_tenant_stats(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> impl IntoResponse {
    Json(state.engine.tenant_stats(&tenant))
}

pub async fn handle_global_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.global_stats())
}
