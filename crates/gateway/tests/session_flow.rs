//! End-to-end orchestration tests against an in-process mock runner plane.
//!
//! A tiny axum server plays both the orchestrator (`/deploy`) and the
//! runner (`/runner/config/append`, `/runner/tools/call`). The tests drive
//! session creation and chat turns through the runtime layer and assert:
//! - a session reaches `active` with all capabilities configured
//! - a deploy response without a `url` persists no session row
//! - a mid-sequence capability failure degrades but does not block
//! - configuration bodies are single-key mappings, sent in catalog order
//! - messages route to the tool the classification rules select
//! - tool failures and missing `response` fields map to the fixed strings

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use ap_domain::config::Config;
use ap_domain::chat::Role;
use ap_domain::error::Error;
use ap_records::RecordStore;
use ap_runner::tools::MISSING_RESPONSE_FALLBACK;
use ap_runner::{capability_catalog, CapabilityCredentials, Configurator, Provisioner, ToolClient};
use ap_sessions::{SessionRecord, SessionStatus, SessionStore};

use ap_gateway::runtime::session::{await_active, create_session};
use ap_gateway::runtime::turn::{run_turn, APOLOGY};
use ap_gateway::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Mock runner plane
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone, Copy, Default)]
enum ToolBehavior {
    /// Reply `{"response": "handled <tool name>"}`.
    #[default]
    Echo,
    /// Reply a well-formed body with no `response` field.
    EmptyResult,
    /// Reply HTTP 500.
    Fail,
}

#[derive(Clone, Default)]
struct MockOptions {
    deploy_without_url: bool,
    fail_capability: Option<&'static str>,
    tool_behavior: ToolBehavior,
}

#[derive(Clone)]
struct MockState {
    opts: MockOptions,
    runner_url: String,
    config_bodies: Arc<Mutex<Vec<Value>>>,
    tool_calls: Arc<Mutex<Vec<Value>>>,
}

async fn deploy(State(mock): State<MockState>, Json(_body): Json<Value>) -> Json<Value> {
    if mock.opts.deploy_without_url {
        Json(serde_json::json!({ "status": "accepted" }))
    } else {
        Json(serde_json::json!({ "url": mock.runner_url }))
    }
}

async fn config_append(
    State(mock): State<MockState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let name = body
        .as_object()
        .and_then(|o| o.keys().next().cloned())
        .unwrap_or_default();
    mock.config_bodies.lock().unwrap().push(body);

    if mock.opts.fail_capability == Some(name.as_str()) {
        (StatusCode::INTERNAL_SERVER_ERROR, "provider crashed").into_response()
    } else {
        Json(serde_json::json!({ "ok": true })).into_response()
    }
}

async fn tools_call(State(mock): State<MockState>, Json(body): Json<Value>) -> impl IntoResponse {
    let name = body["name"].as_str().unwrap_or_default().to_owned();
    mock.tool_calls.lock().unwrap().push(body);

    match mock.opts.tool_behavior {
        ToolBehavior::Echo => {
            Json(serde_json::json!({ "response": format!("handled {name}") })).into_response()
        }
        ToolBehavior::EmptyResult => Json(serde_json::json!({ "ok": true })).into_response(),
        ToolBehavior::Fail => (StatusCode::INTERNAL_SERVER_ERROR, "runner down").into_response(),
    }
}

/// Boot the mock plane on an ephemeral port.
async fn spawn_mock(opts: MockOptions) -> (String, MockState) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let mock = MockState {
        opts,
        runner_url: format!("http://{addr}/runner"),
        config_bodies: Arc::new(Mutex::new(Vec::new())),
        tool_calls: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/deploy", post(deploy))
        .route("/runner/config/append", post(config_append))
        .route("/runner/tools/call", post(tools_call))
        .with_state(mock.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/deploy"), mock)
}

/// Build a gateway state wired at the mock plane, with fast readiness
/// polling and a throwaway state directory.
fn gateway_state(deploy_url: &str, dir: &tempfile::TempDir) -> AppState {
    let mut config = Config::default();
    config.orchestrator.deploy_url = deploy_url.to_owned();
    config.state.state_path = dir.path().to_path_buf();
    config.runner.ready_wait_ms = 500;
    config.runner.ready_poll_ms = 10;
    let config = Arc::new(config);

    let creds = CapabilityCredentials {
        meta_access_token: "meta-tok".into(),
        slack_bot_token: "slack-tok".into(),
        gdrive_credentials: "gdrive-json".into(),
    };

    AppState {
        sessions: Arc::new(SessionStore::new(dir.path()).unwrap()),
        records: Arc::new(RecordStore::new(dir.path()).unwrap()),
        provisioner: Arc::new(Provisioner::new(config.orchestrator.clone()).unwrap()),
        configurator: Arc::new(
            Configurator::new(&config.runner, capability_catalog(&creds)).unwrap(),
        ),
        tools: Arc::new(ToolClient::new(&config.runner).unwrap()),
        api_token_hash: None,
        http: reqwest::Client::new(),
        config,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session creation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn session_reaches_active_with_all_capabilities() {
    let (deploy_url, mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = create_session(&state, "user_1").await.unwrap();

    assert_eq!(record.status, SessionStatus::Active);
    assert_eq!(record.runner_url.as_deref(), Some(mock.runner_url.as_str()));
    assert_eq!(record.capabilities, vec!["meta-ads", "slack", "gdrive"]);

    let listed = state.sessions.list_for_user("user_1");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
}

#[tokio::test]
async fn deploy_response_without_url_persists_no_row() {
    let (deploy_url, _mock) = spawn_mock(MockOptions {
        deploy_without_url: true,
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let err = create_session(&state, "user_1").await.unwrap_err();
    assert!(matches!(err, Error::Provision(_)), "got: {err}");
    assert!(state.sessions.list_for_user("user_1").is_empty());
}

#[tokio::test]
async fn failed_capability_degrades_but_session_goes_active() {
    let (deploy_url, mock) = spawn_mock(MockOptions {
        fail_capability: Some("slack"),
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = create_session(&state, "user_1").await.unwrap();

    assert_eq!(record.status, SessionStatus::Active);
    assert_eq!(record.capabilities, vec!["meta-ads", "gdrive"]);
    // All three descriptors were attempted: the failure did not abort
    // the rest of the sequence.
    assert_eq!(mock.config_bodies.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn config_bodies_are_single_key_mappings_in_catalog_order() {
    let (deploy_url, mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    create_session(&state, "user_1").await.unwrap();

    let bodies = mock.config_bodies.lock().unwrap();
    let names: Vec<String> = bodies
        .iter()
        .map(|b| b.as_object().unwrap().keys().next().unwrap().clone())
        .collect();
    assert_eq!(names, vec!["meta-ads", "slack", "gdrive"]);

    for body in bodies.iter() {
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        let launch = obj.values().next().unwrap();
        assert!(launch["command"].is_string());
        assert!(launch["args"].is_array());
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat turns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn ad_campaign_message_routes_to_meta_tool() {
    let (deploy_url, mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = create_session(&state, "user_1").await.unwrap();
    let reply = run_turn(&state, &record.id, "Can you launch a new Meta ad campaign?")
        .await
        .unwrap();

    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "handled meta_ad_interaction");

    let calls = mock.tool_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["name"], "meta_ad_interaction");
    assert_eq!(
        calls[0]["params"]["query"],
        "Can you launch a new Meta ad campaign?"
    );
    assert_eq!(calls[0]["params"]["userId"], "user_1");
}

#[tokio::test]
async fn greeting_routes_to_default_conversation_without_user_id() {
    let (deploy_url, mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = create_session(&state, "user_1").await.unwrap();
    run_turn(&state, &record.id, "hello, how are you?")
        .await
        .unwrap();

    let calls = mock.tool_calls.lock().unwrap();
    assert_eq!(calls[0]["name"], "default_conversation");
    assert_eq!(calls[0]["params"]["query"], "hello, how are you?");
    assert!(calls[0]["params"].get("userId").is_none());
}

#[tokio::test]
async fn tool_failure_returns_the_apology() {
    let (deploy_url, _mock) = spawn_mock(MockOptions {
        tool_behavior: ToolBehavior::Fail,
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = create_session(&state, "user_1").await.unwrap();
    let reply = run_turn(&state, &record.id, "share a file").await.unwrap();

    // The conversation continues: a failed tool call is not an error.
    assert_eq!(reply.content, APOLOGY);
}

#[tokio::test]
async fn missing_response_field_yields_the_fallback() {
    let (deploy_url, _mock) = spawn_mock(MockOptions {
        tool_behavior: ToolBehavior::EmptyResult,
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = create_session(&state, "user_1").await.unwrap();
    let reply = run_turn(&state, &record.id, "connect my slack").await.unwrap();

    assert_eq!(reply.content, MISSING_RESPONSE_FALLBACK);
}

#[tokio::test]
async fn chat_for_unknown_session_is_not_found() {
    let (deploy_url, _mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let err = run_turn(&state, "sess_missing", "hi").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn chat_times_out_for_a_session_stuck_in_provisioning() {
    let (deploy_url, _mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    // A row that never advances past provisioning.
    let stuck = state
        .sessions
        .insert(SessionRecord::new("user_1", "uuid-stuck").with_runner_url("http://nowhere"))
        .unwrap();

    let err = run_turn(&state, &stuck.id, "hello?").await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got: {err}");
}

#[tokio::test]
async fn await_active_returns_once_session_advances() {
    let (deploy_url, _mock) = spawn_mock(MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let state = gateway_state(&deploy_url, &dir);

    let record = state
        .sessions
        .insert(SessionRecord::new("user_1", "uuid-racing").with_runner_url("http://r"))
        .unwrap();

    // Flip the session to active while a waiter is polling.
    let sessions = state.sessions.clone();
    let id = record.id.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        sessions.set_status(&id, SessionStatus::Active).unwrap();
    });

    let ready = await_active(&state, record).await.unwrap();
    assert_eq!(ready.status, SessionStatus::Active);
}
