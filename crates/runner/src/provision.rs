//! Runner provisioning against the orchestration endpoint.

use std::time::Duration;

use serde::Deserialize;

use ap_domain::config::OrchestratorConfig;
use ap_domain::error::{Error, Result};

/// Response body returned by the orchestrator's deploy endpoint.
#[derive(Debug, Deserialize)]
struct DeployResponse {
    #[serde(default)]
    url: Option<String>,
}

/// Client that requests new runner instances from the orchestrator.
///
/// One deploy call per session UUID; the caller guarantees uniqueness via
/// random generation. Failures are terminal for that session-creation
/// attempt: nothing is retried, and a remote resource that may have been
/// created anyway is not rolled back.
pub struct Provisioner {
    http: reqwest::Client,
    config: OrchestratorConfig,
}

impl Provisioner {
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, config })
    }

    /// Request a new runner for `session_uuid` and return its base URL.
    pub async fn provision(&self, session_uuid: &str) -> Result<String> {
        let body = serde_json::json!({ "id": session_uuid });

        let resp = self
            .http
            .post(&self.config.deploy_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provision(format!("deploy request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::Provision(format!("deploy HTTP {status}: {body_text}")));
        }

        let deploy: DeployResponse = resp
            .json()
            .await
            .map_err(|e| Error::Provision(format!("failed to parse deploy response: {e}")))?;

        let url = deploy
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Provision("deploy response missing 'url' field".into()))?;

        tracing::info!(session_uuid = %session_uuid, runner_url = %url, "runner provisioned");
        Ok(url)
    }
}
