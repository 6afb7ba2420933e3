//! Session management API endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use crate::api::{bad_request, error_response};
use crate::runtime;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    pub user_id: String,
}

/// Create a session: provision a runner, configure its capabilities, and
/// return the active row. One provisioning attempt per call.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionBody>,
) -> impl IntoResponse {
    if body.user_id.trim().is_empty() {
        return bad_request("user_id is required");
    }

    match runtime::session::create_session(&state, &body.user_id).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "session": record })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(user_id = %body.user_id, error = %e, "session creation failed");
            error_response(e)
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions?user_id=…
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub user_id: String,
}

/// List a user's sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> impl IntoResponse {
    if query.user_id.trim().is_empty() {
        return bad_request("user_id is required");
    }

    let sessions = state.sessions.list_for_user(&query.user_id);
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
    .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.sessions.get(&id) {
        Some(record) => Json(serde_json::json!({ "session": record })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "session not found" })),
        )
            .into_response(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions/:id/tools
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Passthrough to the runner's tool listing, for introspection.
pub async fn list_runner_tools(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(record) = state.sessions.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "session not found" })),
        )
            .into_response();
    };

    let Some(runner_url) = record.runner_url.as_deref() else {
        return bad_request("session has no runner yet");
    };

    match state.tools.list_tools(runner_url).await {
        Ok(tools) => Json(tools).into_response(),
        Err(e) => error_response(e),
    }
}
