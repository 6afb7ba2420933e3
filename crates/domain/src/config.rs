use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    /// Env var holding the API bearer token. Unset or empty = dev mode.
    #[serde(default = "d_token_env")]
    pub api_token_env: String,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: d_host(),
            port: d_port(),
            api_token_env: d_token_env(),
            cors: CorsConfig::default(),
            rate_limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. A trailing `:*` matches any port on that host;
    /// a lone `"*"` allows all origins.
    #[serde(default = "d_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u64,
    pub burst_size: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Runner orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Deploy endpoint that creates a fresh runner per session UUID.
    #[serde(default = "d_deploy_url")]
    pub deploy_url: String,
    #[serde(default = "d_30000")]
    pub timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            deploy_url: d_deploy_url(),
            timeout_ms: 30_000,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Runner calls
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Timeout for one `/config/append` call.
    #[serde(default = "d_15000")]
    pub config_timeout_ms: u64,
    /// Timeout for one `/tools/call` round trip.
    #[serde(default = "d_60000")]
    pub tool_timeout_ms: u64,
    /// How long a chat request waits for a `provisioning` session to
    /// become `active` before surfacing a timeout.
    #[serde(default = "d_15000")]
    pub ready_wait_ms: u64,
    /// Poll interval while waiting for readiness.
    #[serde(default = "d_250")]
    pub ready_poll_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            config_timeout_ms: 15_000,
            tool_timeout_ms: 60_000,
            ready_wait_ms: 15_000,
            ready_poll_ms: 250,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Capability credentials
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Env var names from which capability provider credentials are read at
/// startup. The values are forwarded to the runner as launch-spec env
/// placeholders, never logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    #[serde(default = "d_meta_env")]
    pub meta_token_env: String,
    #[serde(default = "d_slack_env")]
    pub slack_token_env: String,
    #[serde(default = "d_gdrive_env")]
    pub gdrive_credentials_env: String,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            meta_token_env: d_meta_env(),
            slack_token_env: d_slack_env(),
            gdrive_credentials_env: d_gdrive_env(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slack OAuth
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub client_id: String,
    /// Env var holding the OAuth client secret.
    #[serde(default = "d_slack_secret_env")]
    pub client_secret_env: String,
    #[serde(default = "d_slack_token_url")]
    pub token_url: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret_env: d_slack_secret_env(),
            token_url: d_slack_token_url(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// State directory
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "d_state_path")]
    pub state_path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("./data/state"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Observability
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// OTLP/gRPC endpoint for span export. `None` = stdout JSON logs only.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "d_service_name")]
    pub service_name: String,
    #[serde(default = "d_sample_rate")]
    pub sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: d_service_name(),
            sample_rate: 1.0,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Default helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn d_host() -> String {
    "0.0.0.0".into()
}
fn d_port() -> u16 {
    3420
}
fn d_token_env() -> String {
    "AP_API_TOKEN".into()
}
fn d_origins() -> Vec<String> {
    vec!["http://localhost:*".into()]
}
fn d_deploy_url() -> String {
    "https://runner-orchestrator.adpilot.dev/deploy".into()
}
fn d_meta_env() -> String {
    "AP_META_ACCESS_TOKEN".into()
}
fn d_slack_env() -> String {
    "AP_SLACK_BOT_TOKEN".into()
}
fn d_gdrive_env() -> String {
    "AP_GDRIVE_CREDENTIALS".into()
}
fn d_slack_secret_env() -> String {
    "AP_SLACK_CLIENT_SECRET".into()
}
fn d_slack_token_url() -> String {
    "https://slack.com/api/oauth.v2.access".into()
}
fn d_state_path() -> PathBuf {
    PathBuf::from("./data/state")
}
fn d_service_name() -> String {
    "adpilot".into()
}
fn d_sample_rate() -> f64 {
    1.0
}
fn d_250() -> u64 {
    250
}
fn d_15000() -> u64 {
    15_000
}
fn d_30000() -> u64 {
    30_000
}
fn d_60000() -> u64 {
    60_000
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 3420);
        assert_eq!(cfg.server.api_token_env, "AP_API_TOKEN");
        assert_eq!(cfg.orchestrator.timeout_ms, 30_000);
        assert_eq!(cfg.runner.ready_poll_ms, 250);
        assert!(cfg.server.rate_limit.is_none());
        assert!(cfg.observability.otlp_endpoint.is_none());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let raw = r#"
            [server]
            port = 8080

            [orchestrator]
            deploy_url = "http://localhost:9000/deploy"
            timeout_ms = 5000

            [server.rate_limit]
            requests_per_second = 10
            burst_size = 20
        "#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.orchestrator.deploy_url, "http://localhost:9000/deploy");
        assert_eq!(cfg.orchestrator.timeout_ms, 5000);
        let rl = cfg.server.rate_limit.unwrap();
        assert_eq!(rl.requests_per_second, 10);
        assert_eq!(rl.burst_size, 20);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.runner.tool_timeout_ms, 60_000);
        assert_eq!(cfg.slack.token_url, "https://slack.com/api/oauth.v2.access");
    }
}
