//! Intent classification — maps a free-text message to a capability tool.
//!
//! A flat, ordered, case-insensitive substring scan; first match wins.
//! Priority order is load-bearing because a message can match several
//! rules: ad platform beats messaging beats file storage.

/// Classification outcome for one chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MetaAds,
    Slack,
    Drive,
    Default,
}

const META_KEYWORDS: &[&str] = &["ad", "campaign", "meta"];
const DRIVE_KEYWORDS: &[&str] = &["drive", "file", "upload"];

impl Intent {
    /// Classify a message.
    pub fn classify(message: &str) -> Intent {
        let lower = message.to_lowercase();
        if META_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return Intent::MetaAds;
        }
        if lower.contains("slack") {
            return Intent::Slack;
        }
        if DRIVE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return Intent::Drive;
        }
        Intent::Default
    }

    /// Runner tool name for this intent.
    pub fn tool_name(self) -> &'static str {
        match self {
            Intent::MetaAds => "meta_ad_interaction",
            Intent::Slack => "slack_interaction",
            Intent::Drive => "gdrive_interaction",
            Intent::Default => "default_conversation",
        }
    }

    /// Parameter bag for the tool call. Every intent carries the raw query
    /// text; non-default intents also carry the user id.
    pub fn params(self, query: &str, user_id: &str) -> serde_json::Value {
        match self {
            Intent::Default => serde_json::json!({ "query": query }),
            _ => serde_json::json!({ "query": query, "userId": user_id }),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
