//! Capability provider definitions and the runner configurator.
//!
//! A capability is a named sub-process the runner launches on our behalf:
//! a command, its arguments, and an env map carrying the credential the
//! provider needs. The catalog is fixed and ordered; the configurator
//! installs each entry with one `/config/append` call per descriptor.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use ap_domain::config::{CapabilitiesConfig, RunnerConfig};
use ap_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Capability spec
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A named capability provider installable onto a runner.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitySpec {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

impl CapabilitySpec {
    fn new(name: &str, command: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            command: command.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
            env: HashMap::new(),
        }
    }

    fn with_env(mut self, key: &str, value: String) -> Self {
        self.env.insert(key.to_owned(), value);
        self
    }

    /// Body for `POST /config/append`: a single-key mapping from the
    /// provider name to its launch spec. `env` is omitted when empty.
    pub fn wire_body(&self) -> serde_json::Value {
        let mut launch = serde_json::json!({
            "command": self.command,
            "args": self.args,
        });
        if !self.env.is_empty() {
            launch["env"] = serde_json::json!(self.env);
        }
        let mut map = serde_json::Map::new();
        map.insert(self.name.clone(), launch);
        serde_json::Value::Object(map)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Credentials & catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Credential values forwarded to the runner as launch-spec env entries.
#[derive(Debug, Clone, Default)]
pub struct CapabilityCredentials {
    pub meta_access_token: String,
    pub slack_bot_token: String,
    pub gdrive_credentials: String,
}

impl CapabilityCredentials {
    /// Read credential values from the env var names in config. A missing
    /// var yields an empty placeholder, not a startup failure.
    pub fn from_env(config: &CapabilitiesConfig) -> Self {
        Self {
            meta_access_token: std::env::var(&config.meta_token_env).unwrap_or_default(),
            slack_bot_token: std::env::var(&config.slack_token_env).unwrap_or_default(),
            gdrive_credentials: std::env::var(&config.gdrive_credentials_env).unwrap_or_default(),
        }
    }
}

/// The fixed, ordered capability catalog for a session runner.
///
/// Order is load-bearing: ad-platform first, then messaging, then file
/// storage, so a mid-sequence failure leaves the primary capability
/// available.
pub fn capability_catalog(creds: &CapabilityCredentials) -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::new("meta-ads", "npx", &["-y", "mcp-server-meta-ads"])
            .with_env("META_ACCESS_TOKEN", creds.meta_access_token.clone()),
        CapabilitySpec::new("slack", "npx", &["-y", "mcp-server-slack"])
            .with_env("SLACK_BOT_TOKEN", creds.slack_bot_token.clone()),
        CapabilitySpec::new("gdrive", "npx", &["-y", "mcp-server-gdrive"])
            .with_env("GDRIVE_CREDENTIALS", creds.gdrive_credentials.clone()),
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Configurator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of one configuration pass over a runner.
#[derive(Debug, Default)]
pub struct ConfigReport {
    /// Provider names installed, in catalog order.
    pub configured: Vec<String>,
    /// Providers that failed, with the reported error.
    pub failed: Vec<(String, Error)>,
}

impl ConfigReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pushes the capability catalog into a provisioned runner.
pub struct Configurator {
    http: reqwest::Client,
    catalog: Vec<CapabilitySpec>,
}

impl Configurator {
    pub fn new(config: &RunnerConfig, catalog: Vec<CapabilitySpec>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.config_timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, catalog })
    }

    pub fn catalog(&self) -> &[CapabilitySpec] {
        &self.catalog
    }

    /// Install every catalog descriptor onto the runner, strictly in order.
    ///
    /// Exactly one call per descriptor. A failed descriptor is recorded and
    /// the remaining descriptors are still attempted; providers configured
    /// before the failure stay usable — nothing is unwound.
    pub async fn configure_all(&self, runner_url: &str) -> ConfigReport {
        let mut report = ConfigReport::default();

        for spec in &self.catalog {
            match self.configure_one(runner_url, spec).await {
                Ok(()) => {
                    tracing::info!(capability = %spec.name, "capability configured");
                    report.configured.push(spec.name.clone());
                }
                Err(e) => {
                    tracing::warn!(
                        capability = %spec.name,
                        error = %e,
                        "capability configuration failed, continuing"
                    );
                    report.failed.push((spec.name.clone(), e));
                }
            }
        }

        report
    }

    async fn configure_one(&self, runner_url: &str, spec: &CapabilitySpec) -> Result<()> {
        let url = format!("{}/config/append", runner_url.trim_end_matches('/'));

        let resp = self
            .http
            .post(&url)
            .json(&spec.wire_body())
            .send()
            .await
            .map_err(|e| Error::Configuration {
                capability: spec.name.clone(),
                message: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::Configuration {
                capability: spec.name.clone(),
                message: format!("HTTP {status}: {body_text}"),
            });
        }

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
