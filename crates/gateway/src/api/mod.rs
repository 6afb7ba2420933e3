pub mod auth;
pub mod campaigns;
pub mod chat;
pub mod sessions;
pub mod slack;
pub mod users;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use ap_domain::error::Error;

use crate::state::AppState;

/// Build the full API router.
///
/// Routes are split into **public** (health and the Slack OAuth redirect,
/// which arrives from a browser without credentials) and **protected**
/// (gated behind the bearer-token middleware).
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/v1/health", get(health))
        .route("/v1/slack/oauth/callback", get(slack::oauth_callback));

    let protected = Router::new()
        // Sessions
        .route(
            "/v1/sessions",
            post(sessions::create_session).get(sessions::list_sessions),
        )
        .route("/v1/sessions/:id", get(sessions::get_session))
        .route("/v1/sessions/:id/tools", get(sessions::list_runner_tools))
        // Chat
        .route("/v1/chat", post(chat::chat))
        // Flat records
        .route("/v1/users", post(users::create_user).get(users::list_users))
        .route(
            "/v1/campaigns",
            post(campaigns::create_campaign).get(campaigns::list_campaigns),
        )
        .route("/v1/ad-sets", post(campaigns::create_ad_set))
        .route("/v1/creatives", post(campaigns::create_creative))
        // Slack channel links
        .route(
            "/v1/slack/channels",
            post(slack::add_channel_link).get(slack::list_channel_links),
        )
        // Apply API auth middleware to all protected routes.
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_api_token,
        ));

    public.merge(protected)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Map a domain error to an HTTP error response.
pub(crate) fn error_response(e: Error) -> Response {
    let status = match &e {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::Provision(_) | Error::ToolCall { .. } | Error::Configuration { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

/// 400 with a plain error message, for request validation.
pub(crate) fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
