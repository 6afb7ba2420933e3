//! `adpilot config validate` / `adpilot config show`.

use ap_domain::config::Config;

/// Check the configuration for values that would break at runtime.
/// Returns `false` if any check failed.
pub fn validate(config: &Config, path: &str) -> bool {
    let mut ok = true;

    if !config.orchestrator.deploy_url.starts_with("http") {
        println!(
            "ERROR: orchestrator.deploy_url must be an http(s) URL, got {:?}",
            config.orchestrator.deploy_url
        );
        ok = false;
    }
    if config.server.port == 0 {
        println!("ERROR: server.port must be non-zero");
        ok = false;
    }
    if config.runner.ready_poll_ms == 0 {
        println!("ERROR: runner.ready_poll_ms must be non-zero");
        ok = false;
    }
    if let Some(rl) = &config.server.rate_limit {
        if rl.requests_per_second == 0 || rl.burst_size == 0 {
            println!("ERROR: server.rate_limit values must be greater than zero");
            ok = false;
        }
    }
    if config.slack.client_id.is_empty() {
        println!("WARN: slack.client_id is empty — the OAuth callback will reject exchanges");
    }

    if ok {
        println!("{path}: OK");
    }
    ok
}

/// Print the effective configuration (defaults merged in) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => println!("failed to render config: {e}"),
    }
}
