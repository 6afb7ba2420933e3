//! Startup wiring: stores, runner clients, and startup-computed secrets.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sha2::{Digest, Sha256};

use ap_domain::config::Config;
use ap_records::RecordStore;
use ap_runner::{capability_catalog, CapabilityCredentials, Configurator, Provisioner, ToolClient};
use ap_sessions::SessionStore;

use crate::state::AppState;

/// Build the shared application state from config.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let sessions = Arc::new(
        SessionStore::new(&config.state.state_path).context("opening session store")?,
    );
    let records = Arc::new(
        RecordStore::new(&config.state.state_path).context("opening record store")?,
    );

    let provisioner = Arc::new(
        Provisioner::new(config.orchestrator.clone()).context("building provisioner")?,
    );
    let creds = CapabilityCredentials::from_env(&config.capabilities);
    let configurator = Arc::new(
        Configurator::new(&config.runner, capability_catalog(&creds))
            .context("building configurator")?,
    );
    let tools = Arc::new(ToolClient::new(&config.runner).context("building tool client")?);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("building outbound HTTP client")?;

    let api_token_hash = read_token_hash(&config.server.api_token_env);

    Ok(AppState {
        config,
        sessions,
        records,
        provisioner,
        configurator,
        tools,
        api_token_hash,
        http,
    })
}

/// Read the API bearer token env var once and keep only its SHA-256 hash.
fn read_token_hash(env_name: &str) -> Option<Vec<u8>> {
    match std::env::var(env_name) {
        Ok(token) if !token.is_empty() => Some(Sha256::digest(token.as_bytes()).to_vec()),
        _ => {
            tracing::warn!(
                env = %env_name,
                "no API token configured — running in dev mode without auth"
            );
            None
        }
    }
}
