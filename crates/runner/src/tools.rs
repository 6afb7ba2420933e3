//! Tool invocation against a provisioned runner.

use std::time::Duration;

use serde::Deserialize;

use ap_domain::config::RunnerConfig;
use ap_domain::error::{Error, Result};

/// Text returned when a tool result carries no `response` field.
pub const MISSING_RESPONSE_FALLBACK: &str =
    "I'm having trouble processing your request right now.";

/// Tool result body. Runners may attach extra fields; only the optional
/// `response` text matters here.
#[derive(Debug, Deserialize)]
struct ToolCallResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for a runner's tool-invocation endpoints. Stateless: every call
/// is independent given `(runner_url, name, params)`.
pub struct ToolClient {
    http: reqwest::Client,
}

impl ToolClient {
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.tool_timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }

    /// Invoke `name` on the runner and return the `response` text verbatim.
    ///
    /// A well-formed result without a `response` field yields the fixed
    /// fallback string rather than an error; transport failures and
    /// non-success statuses are tool-call failures.
    pub async fn call_tool(
        &self,
        runner_url: &str,
        name: &str,
        params: serde_json::Value,
    ) -> Result<String> {
        let url = format!("{}/tools/call", runner_url.trim_end_matches('/'));
        let body = serde_json::json!({ "name": name, "params": params });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ToolCall {
                tool: name.to_owned(),
                message: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::ToolCall {
                tool: name.to_owned(),
                message: format!("HTTP {status}: {body_text}"),
            });
        }

        let parsed: ToolCallResponse = resp.json().await.map_err(|e| Error::ToolCall {
            tool: name.to_owned(),
            message: format!("failed to parse tool result: {e}"),
        })?;

        Ok(parsed
            .response
            .unwrap_or_else(|| MISSING_RESPONSE_FALLBACK.to_owned()))
    }

    /// List the tools currently exposed by the runner.
    pub async fn list_tools(&self, runner_url: &str) -> Result<serde_json::Value> {
        let url = format!("{}/tools/list", runner_url.trim_end_matches('/'));

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("tools/list request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Http(format!("tools/list HTTP {}", resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| Error::Http(format!("failed to parse tools/list result: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_field_is_extracted() {
        let parsed: ToolCallResponse =
            serde_json::from_str(r#"{ "response": "done", "extra": 1 }"#).unwrap();
        assert_eq!(parsed.response.as_deref(), Some("done"));
    }

    #[test]
    fn missing_response_field_parses_to_none() {
        let parsed: ToolCallResponse = serde_json::from_str(r#"{ "ok": true }"#).unwrap();
        assert!(parsed.response.is_none());
    }
}
