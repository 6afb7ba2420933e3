//! `adpilot init` — write a commented default config file.

use anyhow::bail;

const DEFAULT_CONFIG: &str = r#"# AdPilot gateway configuration.
# Every key is optional; the values below are the defaults.

[server]
host = "0.0.0.0"
port = 3420
# Env var holding the API bearer token. Unset = dev mode, no auth.
api_token_env = "AP_API_TOKEN"

[server.cors]
allowed_origins = ["http://localhost:*"]

# Uncomment to enable per-IP rate limiting.
# [server.rate_limit]
# requests_per_second = 20
# burst_size = 40

[orchestrator]
deploy_url = "https://runner-orchestrator.adpilot.dev/deploy"
timeout_ms = 30000

[runner]
config_timeout_ms = 15000
tool_timeout_ms = 60000
ready_wait_ms = 15000
ready_poll_ms = 250

[capabilities]
meta_token_env = "AP_META_ACCESS_TOKEN"
slack_token_env = "AP_SLACK_BOT_TOKEN"
gdrive_credentials_env = "AP_GDRIVE_CREDENTIALS"

[slack]
client_id = ""
client_secret_env = "AP_SLACK_CLIENT_SECRET"

[state]
state_path = "./data/state"

[observability]
service_name = "adpilot"
sample_rate = 1.0
# otlp_endpoint = "http://localhost:4317"
"#;

pub fn init(path: &str, force: bool) -> anyhow::Result<()> {
    if std::path::Path::new(path).exists() && !force {
        bail!("{path} already exists (use --force to overwrite)");
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    println!("wrote {path}");
    Ok(())
}
