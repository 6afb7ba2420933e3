use std::sync::Arc;

use ap_domain::config::Config;
use ap_records::RecordStore;
use ap_runner::{Configurator, Provisioner, ToolClient};
use ap_sessions::SessionStore;

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services** — config, record stores
/// - **Runner plane** — provisioner, configurator, tool client
/// - **Security & outbound** — token hash, general-purpose HTTP client
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub records: Arc<RecordStore>,

    // ── Runner plane ──────────────────────────────────────────────────
    pub provisioner: Arc<Provisioner>,
    pub configurator: Arc<Configurator>,
    pub tools: Arc<ToolClient>,

    // ── Security & outbound ───────────────────────────────────────────
    /// SHA-256 hash of the API bearer token (read once at startup).
    /// `None` = dev mode (no auth enforced).
    pub api_token_hash: Option<Vec<u8>>,
    /// Outbound client for third-party exchanges (Slack OAuth).
    pub http: reqwest::Client,
}
