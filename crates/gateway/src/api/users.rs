//! User record endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use crate::api::{bad_request, error_response};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub email: String,
    pub name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> impl IntoResponse {
    if body.email.trim().is_empty() || body.name.trim().is_empty() {
        return bad_request("email and name are required");
    }

    match state.records.create_user(body.email.trim(), body.name.trim()) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "user": user })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "users": state.records.list_users() }))
}
