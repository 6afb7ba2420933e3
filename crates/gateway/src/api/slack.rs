//! Slack integration endpoints: the OAuth code exchange and the channel
//! links that bind a Slack channel to Meta ad entities.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect};
use serde::Deserialize;

use ap_domain::error::{Error, Result};

use crate::api::{bad_request, error_response};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/slack/oauth/callback
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct OauthCallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of Slack's `oauth.v2.access`.
#[derive(Debug, Deserialize)]
struct OauthAccessResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    team: Option<OauthTeam>,
}

#[derive(Debug, Deserialize)]
struct OauthTeam {
    #[serde(default)]
    name: Option<String>,
}

/// The browser lands here after the user approves (or denies) the Slack
/// install. The code is exchanged server-side; the user is redirected
/// back to the app shell with a query flag either way.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<OauthCallbackQuery>,
) -> Redirect {
    if let Some(err) = query.error {
        tracing::warn!(error = %err, "Slack OAuth denied");
        return Redirect::to("/?error=slack_auth_denied");
    }

    let Some(code) = query.code else {
        tracing::warn!("Slack OAuth callback without authorization code");
        return Redirect::to("/?error=missing_code");
    };

    match exchange_code(&state, &code).await {
        Ok(()) => Redirect::to("/?slack_connected=true"),
        Err(e @ Error::Http(_)) => {
            tracing::warn!(error = %e, "Slack OAuth exchange failed");
            Redirect::to("/?error=server_error")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Slack OAuth exchange rejected");
            Redirect::to(&format!("/?error={e}"))
        }
    }
}

/// Exchange the authorization code for an access token.
///
/// The token is acknowledged but not stored: channel links (below) carry
/// everything the routing layer needs, and token custody stays with the
/// workspace admin flow.
async fn exchange_code(state: &AppState, code: &str) -> Result<()> {
    let secret = std::env::var(&state.config.slack.client_secret_env).unwrap_or_default();
    let form = [
        ("client_id", state.config.slack.client_id.as_str()),
        ("client_secret", secret.as_str()),
        ("code", code),
    ];

    let resp = state
        .http
        .post(&state.config.slack.token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Http(format!("token exchange request failed: {e}")))?;

    let access: OauthAccessResponse = resp
        .json()
        .await
        .map_err(|e| Error::Http(format!("failed to parse token exchange response: {e}")))?;

    if !access.ok {
        return Err(Error::Other(
            access.error.unwrap_or_else(|| "unknown_error".into()),
        ));
    }

    tracing::info!(
        team = access.team.and_then(|t| t.name).unwrap_or_default(),
        token_received = access.access_token.is_some(),
        "Slack workspace connected"
    );
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// /v1/slack/channels
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct AddChannelLinkBody {
    pub user_id: String,
    pub channel_name: String,
    pub meta_ad_account_id: String,
    pub meta_campaign_id: String,
    pub meta_ad_set_id: String,
}

pub async fn add_channel_link(
    State(state): State<AppState>,
    Json(body): Json<AddChannelLinkBody>,
) -> impl IntoResponse {
    if body.user_id.trim().is_empty()
        || body.channel_name.trim().is_empty()
        || body.meta_ad_account_id.trim().is_empty()
        || body.meta_campaign_id.trim().is_empty()
        || body.meta_ad_set_id.trim().is_empty()
    {
        return bad_request("missing required parameters");
    }

    match state.records.add_channel_link(
        &body.user_id,
        body.channel_name.trim(),
        &body.meta_ad_account_id,
        &body.meta_campaign_id,
        &body.meta_ad_set_id,
    ) {
        Ok(link) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "channel": link })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListChannelLinksQuery {
    pub user_id: String,
}

pub async fn list_channel_links(
    State(state): State<AppState>,
    Query(query): Query<ListChannelLinksQuery>,
) -> impl IntoResponse {
    if query.user_id.trim().is_empty() {
        return bad_request("user_id is required");
    }
    Json(serde_json::json!({
        "channels": state.records.channel_links_for_user(&query.user_id),
    }))
    .into_response()
}
