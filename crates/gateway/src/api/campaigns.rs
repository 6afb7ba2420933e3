//! Campaign, ad-set, and creative record endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use crate::api::{bad_request, error_response};
use crate::state::AppState;

// ── Campaigns ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateCampaignBody {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub meta_campaign_id: Option<String>,
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Json(body): Json<CreateCampaignBody>,
) -> impl IntoResponse {
    if body.user_id.trim().is_empty() || body.name.trim().is_empty() {
        return bad_request("user_id and name are required");
    }

    match state
        .records
        .create_campaign(&body.user_id, body.name.trim(), body.meta_campaign_id)
    {
        Ok(campaign) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "campaign": campaign })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    pub user_id: String,
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<ListCampaignsQuery>,
) -> impl IntoResponse {
    if query.user_id.trim().is_empty() {
        return bad_request("user_id is required");
    }
    Json(serde_json::json!({
        "campaigns": state.records.campaigns_for_user(&query.user_id),
    }))
    .into_response()
}

// ── Ad sets ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateAdSetBody {
    pub campaign_id: String,
    pub name: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub targeting: Option<serde_json::Value>,
}

pub async fn create_ad_set(
    State(state): State<AppState>,
    Json(body): Json<CreateAdSetBody>,
) -> impl IntoResponse {
    if body.campaign_id.trim().is_empty() || body.name.trim().is_empty() {
        return bad_request("campaign_id and name are required");
    }

    match state.records.create_ad_set(
        &body.campaign_id,
        body.name.trim(),
        body.budget,
        body.start_date,
        body.end_date,
        body.targeting,
    ) {
        Ok(ad_set) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "ad_set": ad_set })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// ── Creatives ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateCreativeBody {
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
}

pub async fn create_creative(
    State(state): State<AppState>,
    Json(body): Json<CreateCreativeBody>,
) -> impl IntoResponse {
    if body.adset_id.trim().is_empty() || body.name.trim().is_empty() {
        return bad_request("adset_id and name are required");
    }

    match state.records.create_creative(
        &body.adset_id,
        body.name.trim(),
        body.drive_file_id,
        body.file_url,
        body.headline,
        body.description,
    ) {
        Ok(creative) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "creative": creative })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
