//! JSON-file-backed record store.
//!
//! Persists all flat collections in `records.json` under the configured
//! state path. Every operation is a single-row insert or an owner-scoped
//! read; no cross-row locking is needed beyond the store lock.

use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use ap_domain::error::{Error, Result};

use crate::types::{
    record_id, AdSetRecord, CampaignRecord, ChannelLinkRecord, CreativeRecord, UserRecord,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordsData {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    campaigns: Vec<CampaignRecord>,
    #[serde(default)]
    ad_sets: Vec<AdSetRecord>,
    #[serde(default)]
    creatives: Vec<CreativeRecord>,
    #[serde(default)]
    channel_links: Vec<ChannelLinkRecord>,
}

/// Flat record store backed by a JSON file.
pub struct RecordStore {
    records_path: PathBuf,
    data: RwLock<RecordsData>,
}

impl RecordStore {
    /// Load or create the store at `state_path/records.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;

        let records_path = state_path.join("records.json");
        let data = if records_path.exists() {
            let raw = std::fs::read_to_string(&records_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            RecordsData::default()
        };

        tracing::info!(path = %records_path.display(), "record store loaded");

        Ok(Self {
            records_path,
            data: RwLock::new(data),
        })
    }

    // ── Users ──────────────────────────────────────────────────────

    /// Create a user. Email addresses are unique.
    pub fn create_user(&self, email: &str, name: &str) -> Result<UserRecord> {
        let mut data = self.data.write();
        if data.users.iter().any(|u| u.email == email) {
            return Err(Error::Conflict("email already in use".into()));
        }

        let now = Utc::now();
        let user = UserRecord {
            id: record_id("user"),
            email: email.to_owned(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        data.users.push(user.clone());
        self.persist(&data)?;
        Ok(user)
    }

    pub fn list_users(&self) -> Vec<UserRecord> {
        let mut out = self.data.read().users.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub fn get_user(&self, id: &str) -> Option<UserRecord> {
        self.data.read().users.iter().find(|u| u.id == id).cloned()
    }

    // ── Campaigns ──────────────────────────────────────────────────

    pub fn create_campaign(
        &self,
        user_id: &str,
        name: &str,
        meta_campaign_id: Option<String>,
    ) -> Result<CampaignRecord> {
        let now = Utc::now();
        let campaign = CampaignRecord {
            id: record_id("campaign"),
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            meta_campaign_id,
            status: "draft".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let mut data = self.data.write();
        data.campaigns.push(campaign.clone());
        self.persist(&data)?;
        Ok(campaign)
    }

    pub fn campaigns_for_user(&self, user_id: &str) -> Vec<CampaignRecord> {
        let mut out: Vec<CampaignRecord> = self
            .data
            .read()
            .campaigns
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    // ── Ad sets ────────────────────────────────────────────────────

    pub fn create_ad_set(
        &self,
        campaign_id: &str,
        name: &str,
        budget: Option<f64>,
        start_date: Option<String>,
        end_date: Option<String>,
        targeting: Option<serde_json::Value>,
    ) -> Result<AdSetRecord> {
        let now = Utc::now();
        let ad_set = AdSetRecord {
            id: record_id("adset"),
            campaign_id: campaign_id.to_owned(),
            name: name.to_owned(),
            budget,
            start_date,
            end_date,
            targeting,
            status: "draft".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let mut data = self.data.write();
        data.ad_sets.push(ad_set.clone());
        self.persist(&data)?;
        Ok(ad_set)
    }

    // ── Creatives ──────────────────────────────────────────────────

    pub fn create_creative(
        &self,
        adset_id: &str,
        name: &str,
        drive_file_id: Option<String>,
        file_url: Option<String>,
        headline: Option<String>,
        description: Option<String>,
    ) -> Result<CreativeRecord> {
        let now = Utc::now();
        let creative = CreativeRecord {
            id: record_id("creative"),
            adset_id: adset_id.to_owned(),
            name: name.to_owned(),
            drive_file_id,
            file_url,
            headline,
            description,
            status: "draft".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let mut data = self.data.write();
        data.creatives.push(creative.clone());
        self.persist(&data)?;
        Ok(creative)
    }

    // ── Slack channel links ────────────────────────────────────────

    pub fn add_channel_link(
        &self,
        user_id: &str,
        name: &str,
        meta_ad_account_id: &str,
        meta_campaign_id: &str,
        meta_ad_set_id: &str,
    ) -> Result<ChannelLinkRecord> {
        let link = ChannelLinkRecord {
            // Slack-style channel id: "C" + 10 hex chars.
            id: format!("C{}", &uuid::Uuid::new_v4().simple().to_string()[..10]),
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            meta_ad_account_id: meta_ad_account_id.to_owned(),
            meta_campaign_id: meta_campaign_id.to_owned(),
            meta_ad_set_id: meta_ad_set_id.to_owned(),
            created_at: Utc::now(),
        };

        let mut data = self.data.write();
        data.channel_links.push(link.clone());
        self.persist(&data)?;
        Ok(link)
    }

    pub fn channel_links_for_user(&self, user_id: &str) -> Vec<ChannelLinkRecord> {
        self.data
            .read()
            .channel_links
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect()
    }

    // ── Persistence ────────────────────────────────────────────────

    pub fn flush(&self) -> Result<()> {
        let data = self.data.read();
        self.persist(&data)
    }

    fn persist(&self, data: &RecordsData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Error::Other(format!("serializing records: {e}")))?;
        std::fs::write(&self.records_path, json).map_err(Error::Io)?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
