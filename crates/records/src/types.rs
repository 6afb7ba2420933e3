//! Row types for the flat record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a prefixed opaque id, e.g. `campaign_9f8a…`.
pub(crate) fn record_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ad campaign owned by a user. `meta_campaign_id` is filled in once
/// the campaign exists on the ad platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub meta_campaign_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdSetRecord {
    pub id: String,
    pub campaign_id: String,
    pub name: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Raw targeting payload, stored as-is.
    #[serde(default)]
    pub targeting: Option<serde_json::Value>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeRecord {
    pub id: String,
    pub adset_id: String,
    pub name: String,
    #[serde(default)]
    pub drive_file_id: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Binding of a Slack channel to the Meta ad entities it reports on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelLinkRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub meta_ad_account_id: String,
    pub meta_campaign_id: String,
    pub meta_ad_set_id: String,
    pub created_at: DateTime<Utc>,
}
