//! Session lifecycle orchestration.
//!
//! `create_session` runs the full provisioning sequence for one user:
//! provision a runner, persist the row, push the capability catalog, and
//! mark the session active. Exactly one provisioning attempt happens per
//! call; callers that want one logical conversation must not call twice.

use std::time::Duration;

use uuid::Uuid;

use ap_domain::error::{Error, Result};
use ap_sessions::{SessionRecord, SessionStatus};

use crate::state::AppState;

/// Create a session for `user_id` and drive it to `active`.
///
/// Provisioning failure is terminal: the error is returned and no session
/// row exists afterwards. Capability failures only degrade the session —
/// whatever was configured stays usable and the row still goes active.
pub async fn create_session(state: &AppState, user_id: &str) -> Result<SessionRecord> {
    let session_uuid = Uuid::new_v4().to_string();

    let runner_url = state.provisioner.provision(&session_uuid).await?;

    let record = SessionRecord::new(user_id, &session_uuid).with_runner_url(&runner_url);
    let record = state.sessions.insert(record)?;

    let report = state.configurator.configure_all(&runner_url).await;
    for (name, err) in &report.failed {
        tracing::warn!(
            session_id = %record.id,
            capability = %name,
            error = %err,
            "capability unavailable for this session"
        );
    }
    state
        .sessions
        .record_capabilities(&record.id, report.configured)?;

    let record = state.sessions.set_status(&record.id, SessionStatus::Active)?;

    tracing::info!(
        session_id = %record.id,
        user_id = %user_id,
        capabilities = ?record.capabilities,
        "session active"
    );
    Ok(record)
}

/// Block until the session reaches `active`, polling the store.
///
/// A chat request that arrives while the session is still `provisioning`
/// waits here instead of being dropped; if the bound elapses first, the
/// caller gets a timeout error.
pub async fn await_active(state: &AppState, mut record: SessionRecord) -> Result<SessionRecord> {
    let bound = Duration::from_millis(state.config.runner.ready_wait_ms);
    let poll = Duration::from_millis(state.config.runner.ready_poll_ms.max(1));
    let deadline = tokio::time::Instant::now() + bound;

    loop {
        match record.status {
            SessionStatus::Active => return Ok(record),
            SessionStatus::Closed | SessionStatus::Error => {
                return Err(Error::Other(format!(
                    "session {} is {}",
                    record.id, record.status
                )));
            }
            SessionStatus::Provisioning => {
                if tokio::time::Instant::now() >= deadline {
                    return Err(Error::Timeout(format!(
                        "session {} did not become active within {}ms",
                        record.id, state.config.runner.ready_wait_ms
                    )));
                }
                tokio::time::sleep(poll).await;
                record = state
                    .sessions
                    .get(&record.id)
                    .ok_or_else(|| Error::NotFound(format!("session {}", record.id)))?;
            }
        }
    }
}
