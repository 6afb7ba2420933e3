//! Chat endpoint — the conversational entry point.
//!
//! `POST /v1/chat` takes a session id and a message, routes the message
//! to the session's runner, and returns the assistant's reply. Tool
//! failures come back as an apology message, not as an HTTP error; only
//! unknown sessions and readiness timeouts fail the request.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use ap_domain::chat::ChatMessage;

use crate::api::{bad_request, error_response};
use crate::runtime::run_turn;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    if body.message.trim().is_empty() {
        return bad_request("message is required");
    }

    let user_message = ChatMessage::user(body.message.trim());

    match run_turn(&state, &body.session_id, &user_message.content).await {
        Ok(reply) => Json(serde_json::json!({
            "session_id": body.session_id,
            "message": reply,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}
