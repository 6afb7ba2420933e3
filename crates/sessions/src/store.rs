//! Gateway-owned session record store.
//!
//! Persists session rows in `sessions.json` under the configured state
//! path. Each row binds a user to a provisioned runner and tracks its
//! readiness status plus the capability providers that were installed.
//! Rows are inserted and updated, never deleted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use ap_domain::error::{Error, Result};

use crate::lifecycle::SessionStatus;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One session row.
///
/// `runner_url` is write-once: it is set before insertion and the store
/// offers no way to change it afterwards. A row may never be `active`
/// while `runner_url` is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    /// UUID sent to the orchestrator when requesting the runner. Distinct
    /// from `id`, which is the store key.
    pub session_uuid: String,
    #[serde(default)]
    pub runner_url: Option<String>,
    pub status: SessionStatus,
    /// Names of the capability providers successfully configured on the
    /// runner for this session.
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// A fresh `provisioning` row with no runner attached yet.
    pub fn new(user_id: &str, session_uuid: &str) -> Self {
        let now = Utc::now();
        Self {
            id: format!("sess_{}", uuid::Uuid::new_v4().simple()),
            user_id: user_id.to_owned(),
            session_uuid: session_uuid.to_owned(),
            runner_url: None,
            status: SessionStatus::Provisioning,
            capabilities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the runner base URL obtained from the orchestrator.
    pub fn with_runner_url(mut self, url: &str) -> Self {
        self.runner_url = Some(url.to_owned());
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session store backed by a JSON file.
pub struct SessionStore {
    sessions_path: PathBuf,
    rows: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    /// Load or create the store at `state_path/sessions/sessions.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        let dir = state_path.join("sessions");
        std::fs::create_dir_all(&dir).map_err(Error::Io)?;

        let sessions_path = dir.join("sessions.json");
        let rows = if sessions_path.exists() {
            let raw = std::fs::read_to_string(&sessions_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(
            sessions = rows.len(),
            path = %sessions_path.display(),
            "session store loaded"
        );

        Ok(Self {
            sessions_path,
            rows: RwLock::new(rows),
        })
    }

    /// Insert a new row. The row is on disk when this returns.
    pub fn insert(&self, record: SessionRecord) -> Result<SessionRecord> {
        let mut rows = self.rows.write();
        if rows.contains_key(&record.id) {
            return Err(Error::Conflict(format!("session {} already exists", record.id)));
        }
        rows.insert(record.id.clone(), record.clone());
        self.persist(&rows)?;

        tracing::info!(
            session_id = %record.id,
            user_id = %record.user_id,
            status = %record.status,
            "session row inserted"
        );
        Ok(record)
    }

    /// Look up a row by session id.
    pub fn get(&self, id: &str) -> Option<SessionRecord> {
        self.rows.read().get(id).cloned()
    }

    /// All rows for a user, newest first.
    pub fn list_for_user(&self, user_id: &str) -> Vec<SessionRecord> {
        let mut out: Vec<SessionRecord> = self
            .rows
            .read()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Transition a row to `next`.
    ///
    /// Rejects transitions the lifecycle rule forbids, and rejects
    /// `active` while the runner URL is unset or empty.
    pub fn set_status(&self, id: &str, next: SessionStatus) -> Result<SessionRecord> {
        let mut rows = self.rows.write();
        let record = rows
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("session {id}")))?;

        if !record.status.can_transition(next) {
            return Err(Error::Other(format!(
                "session {id}: illegal transition {} -> {next}",
                record.status
            )));
        }
        if next == SessionStatus::Active
            && record.runner_url.as_deref().unwrap_or("").is_empty()
        {
            return Err(Error::Other(format!(
                "session {id}: cannot become active without a runner URL"
            )));
        }

        record.status = next;
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.persist(&rows)?;
        Ok(updated)
    }

    /// Record the capability providers installed for this session.
    pub fn record_capabilities(&self, id: &str, capabilities: Vec<String>) -> Result<SessionRecord> {
        let mut rows = self.rows.write();
        let record = rows
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("session {id}")))?;

        record.capabilities = capabilities;
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.persist(&rows)?;
        Ok(updated)
    }

    /// Persist the current rows to disk (also called by every mutator).
    pub fn flush(&self) -> Result<()> {
        let rows = self.rows.read();
        self.persist(&rows)
    }

    fn persist(&self, rows: &HashMap<String, SessionRecord>) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)
            .map_err(|e| Error::Other(format!("serializing sessions: {e}")))?;
        std::fs::write(&self.sessions_path, json).map_err(Error::Io)?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn insert_then_read_back() {
        let (_dir, store) = store();
        let rec = SessionRecord::new("user_1", "uuid-1").with_runner_url("http://r");
        let inserted = store.insert(rec).unwrap();

        let fetched = store.get(&inserted.id).unwrap();
        assert_eq!(fetched.user_id, "user_1");
        assert_eq!(fetched.session_uuid, "uuid-1");
        assert_eq!(fetched.runner_url.as_deref(), Some("http://r"));
        assert_eq!(fetched.status, SessionStatus::Provisioning);
    }

    #[test]
    fn row_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = SessionStore::new(dir.path()).unwrap();
            let rec = SessionRecord::new("user_1", "uuid-1").with_runner_url("http://r");
            store.insert(rec).unwrap().id
        };
        let reloaded = SessionStore::new(dir.path()).unwrap();
        assert!(reloaded.get(&id).is_some());
    }

    #[test]
    fn duplicate_insert_is_a_conflict() {
        let (_dir, store) = store();
        let rec = SessionRecord::new("user_1", "uuid-1");
        store.insert(rec.clone()).unwrap();
        assert!(matches!(store.insert(rec), Err(Error::Conflict(_))));
    }

    #[test]
    fn list_for_user_is_newest_first_and_scoped() {
        let (_dir, store) = store();
        let mut a = SessionRecord::new("user_1", "a");
        let mut b = SessionRecord::new("user_1", "b");
        let c = SessionRecord::new("user_2", "c");
        a.created_at = Utc::now() - chrono::Duration::minutes(10);
        b.created_at = Utc::now();
        store.insert(a).unwrap();
        store.insert(b).unwrap();
        store.insert(c).unwrap();

        let rows = store.list_for_user("user_1");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].session_uuid, "b");
        assert_eq!(rows[1].session_uuid, "a");
    }

    #[test]
    fn active_requires_runner_url() {
        let (_dir, store) = store();
        let rec = store.insert(SessionRecord::new("user_1", "u")).unwrap();

        let err = store.set_status(&rec.id, SessionStatus::Active);
        assert!(err.is_err(), "active without runner URL must be rejected");

        // Still provisioning after the rejected transition.
        assert_eq!(store.get(&rec.id).unwrap().status, SessionStatus::Provisioning);
    }

    #[test]
    fn provisioned_session_becomes_active() {
        let (_dir, store) = store();
        let rec = store
            .insert(SessionRecord::new("user_1", "u").with_runner_url("http://r"))
            .unwrap();
        let updated = store.set_status(&rec.id, SessionStatus::Active).unwrap();
        assert_eq!(updated.status, SessionStatus::Active);
        assert!(updated.updated_at >= rec.updated_at);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let (_dir, store) = store();
        let rec = store
            .insert(SessionRecord::new("user_1", "u").with_runner_url("http://r"))
            .unwrap();
        // provisioning -> closed skips active.
        assert!(store.set_status(&rec.id, SessionStatus::Closed).is_err());
    }

    #[test]
    fn capabilities_are_recorded() {
        let (_dir, store) = store();
        let rec = store
            .insert(SessionRecord::new("user_1", "u").with_runner_url("http://r"))
            .unwrap();
        let updated = store
            .record_capabilities(&rec.id, vec!["meta-ads".into(), "gdrive".into()])
            .unwrap();
        assert_eq!(updated.capabilities, vec!["meta-ads", "gdrive"]);
    }
}
