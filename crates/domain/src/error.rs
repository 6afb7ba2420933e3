/// Shared error type used across all AdPilot crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The orchestrator could not supply a runner. Terminal for the
    /// session-creation attempt; no session row exists afterwards.
    #[error("provisioning runner: {0}")]
    Provision(String),

    /// One capability provider failed to install on a runner. Non-terminal:
    /// providers configured before the failure remain usable.
    #[error("configuring capability {capability}: {message}")]
    Configuration { capability: String, message: String },

    /// A tool invocation against a runner failed. Non-terminal: the
    /// conversation continues with a generic apology.
    #[error("tool call {tool}: {message}")]
    ToolCall { tool: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
