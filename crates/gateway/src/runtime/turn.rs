//! One chat turn: resolve the session, wait for readiness, classify the
//! message, and dispatch the matching tool call.

use ap_domain::chat::ChatMessage;
use ap_domain::error::{Error, Result};

use crate::runtime::intent::Intent;
use crate::runtime::session::await_active;
use crate::state::AppState;

/// Text shown to the user when a tool call fails outright.
pub const APOLOGY: &str = "Sorry, I encountered an error while processing your request.";

/// Run one turn and return the assistant's reply.
///
/// Tool-call failures do not propagate: the conversation continues with a
/// generic apology. Everything else (unknown session, readiness timeout)
/// is surfaced to the caller as an error.
pub async fn run_turn(state: &AppState, session_id: &str, message: &str) -> Result<ChatMessage> {
    let record = state
        .sessions
        .get(session_id)
        .ok_or_else(|| Error::NotFound(format!("session {session_id}")))?;

    let record = await_active(state, record).await?;

    // Guaranteed by the store's active-transition rule.
    let runner_url = record
        .runner_url
        .as_deref()
        .ok_or_else(|| Error::Other(format!("session {} active without runner URL", record.id)))?;

    let intent = Intent::classify(message);
    let params = intent.params(message, &record.user_id);

    tracing::debug!(
        session_id = %record.id,
        tool = intent.tool_name(),
        "message routed"
    );

    match state
        .tools
        .call_tool(runner_url, intent.tool_name(), params)
        .await
    {
        Ok(text) => Ok(ChatMessage::assistant(text)),
        Err(e @ Error::ToolCall { .. }) => {
            tracing::warn!(
                session_id = %record.id,
                error = %e,
                "tool call failed, replying with apology"
            );
            Ok(ChatMessage::assistant(APOLOGY))
        }
        Err(e) => Err(e),
    }
}
