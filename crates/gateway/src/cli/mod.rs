//! Command-line interface for the `adpilot` binary.

pub mod config;
pub mod init;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ap_domain::config::Config;

#[derive(Debug, Parser)]
#[command(name = "adpilot", about = "AdPilot gateway", version)]
pub struct Cli {
    /// Path to the TOML config file (falls back to $ADPILOT_CONFIG, then
    /// ./adpilot.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the gateway server (default when no subcommand is given).
    Serve,
    /// Inspect or validate the configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Write a commented default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print version.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Validate,
    Show,
}

/// Resolve the config path and load the config.
///
/// A missing file is not an error: defaults apply, which is the normal
/// dev-mode experience.
pub fn load_config(cli_path: Option<&str>) -> anyhow::Result<(Config, String)> {
    let path = cli_path
        .map(str::to_owned)
        .or_else(|| std::env::var("ADPILOT_CONFIG").ok())
        .unwrap_or_else(|| "adpilot.toml".to_owned());

    if std::path::Path::new(&path).exists() {
        let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        let config: Config = toml::from_str(&raw).with_context(|| format!("parsing {path}"))?;
        Ok((config, path))
    } else {
        Ok((Config::default(), path))
    }
}
