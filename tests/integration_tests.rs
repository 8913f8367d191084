use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceExt;

use carebook::config::AppConfig;
use carebook::handlers;
use carebook::models::CheckoutPayload;
use carebook::services::catalog::StaticCatalog;
use carebook::services::checkout::CheckoutProvider;
use carebook::state::AppState;

// ── Mock Providers ──

struct MockCheckout {
    submitted: Arc<Mutex<Vec<CheckoutPayload>>>,
}

#[async_trait]
impl CheckoutProvider for MockCheckout {
    async fn submit(&self, payload: &CheckoutPayload) -> anyhow::Result<()> {
        self.submitted.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        checkout_url: String::new(),
        catalog_path: None,
        typing_delay_ms: 0, // no cosmetic pacing in tests
        default_persona: "care-companion".to_string(),
    }
}

fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<CheckoutPayload>>>) {
    let submitted = Arc::new(Mutex::new(vec![]));
    let checkout = MockCheckout {
        submitted: Arc::clone(&submitted),
    };
    let state = Arc::new(AppState {
        config: test_config(),
        catalog: Box::new(StaticCatalog::with_default_data()),
        checkout: Box::new(checkout),
        sessions: Mutex::new(HashMap::new()),
    });
    (state, submitted)
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat/sessions", post(handlers::chat::create_session))
        .route("/api/chat/sessions/:id", get(handlers::chat::get_session))
        .route(
            "/api/chat/sessions/:id/select",
            post(handlers::chat::select),
        )
        .route(
            "/api/chat/sessions/:id/message",
            post(handlers::chat::send_message),
        )
        .route(
            "/api/catalog/caregivers",
            get(handlers::catalog::list_caregivers),
        )
        .route(
            "/api/catalog/caregivers/:id",
            get(handlers::catalog::get_caregiver),
        )
        .route(
            "/api/catalog/packages",
            get(handlers::catalog::list_packages),
        )
        .route(
            "/api/catalog/packages/:id",
            get(handlers::catalog::get_package),
        )
        .with_state(state)
}

async fn post_json(
    state: Arc<AppState>,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = test_app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let res = test_app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Taps an affordance on `message_id` and returns the select response.
async fn tap(
    state: Arc<AppState>,
    session_id: &str,
    message_id: &str,
    kind: &str,
    value: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let selection = match value {
        Some(v) => serde_json::json!({ "kind": kind, "value": v }),
        None => serde_json::json!({ "kind": kind }),
    };
    post_json(
        state,
        &format!("/api/chat/sessions/{session_id}/select"),
        serde_json::json!({ "message_id": message_id, "selection": selection }),
    )
    .await
}

// ── Health Check ──

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let (status, json) = get_json(state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Session Creation ──

#[tokio::test]
async fn test_create_session_greets_with_service_types() {
    let (state, _) = test_state();
    let (status, json) = post_json(state, "/api/chat/sessions", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "select_service_type");
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "assistant");
    let replies = messages[0]["quick_replies"].as_array().unwrap();
    assert_eq!(replies.len(), 3);
    let values: Vec<&str> = replies.iter().map(|r| r["value"].as_str().unwrap()).collect();
    assert_eq!(values, ["elderly-care", "escort", "medical-staff"]);
}

#[tokio::test]
async fn test_direct_entry_starts_at_select_package() {
    let (state, _) = test_state();
    let (status, json) = post_json(
        state,
        "/api/chat/sessions",
        serde_json::json!({
            "caregiver_id": "c1",
            "service_type": "elderly-care",
            "qualification": "PCW"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "select_package");
    let messages = json["messages"].as_array().unwrap();
    assert!(messages[0]["content"].as_str().unwrap().contains("Zhang Wei"));
    assert_eq!(messages[0]["selection"]["kind"], "packages");
}

#[tokio::test]
async fn test_direct_entry_requires_all_three_fields() {
    let (state, _) = test_state();
    let (status, _) = post_json(
        state,
        "/api/chat/sessions",
        serde_json::json!({ "caregiver_id": "c1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_direct_entry_unknown_caregiver() {
    let (state, _) = test_state();
    let (status, _) = post_json(
        state,
        "/api/chat/sessions",
        serde_json::json!({
            "caregiver_id": "ghost",
            "service_type": "elderly-care",
            "qualification": "PCW"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_session() {
    let (state, _) = test_state();
    let (status, _) = get_json(state, "/api/chat/sessions/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Booking Flow ──

#[tokio::test]
async fn test_full_booking_flow_hands_off_to_checkout() {
    let (state, submitted) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();
    let mut message_id = json["messages"][0]["id"].as_str().unwrap().to_string();

    let steps: &[(&str, Option<&str>, &str)] = &[
        ("service_type", Some("elderly-care"), "select_qualification"),
        ("qualification", Some("RN"), "select_caregiver"),
        ("caregiver", Some("c3"), "select_package"),
        ("package", Some("hourly"), "select_date"),
        ("date", Some("2025-10-05"), "select_time"),
        ("time", Some("08:00-12:00"), "confirm_order"),
    ];
    for (kind, value, expected_step) in steps {
        let (status, json) =
            tap(state.clone(), &session_id, &message_id, kind, *value).await;
        assert_eq!(status, StatusCode::OK, "step {kind} failed: {json}");
        assert_eq!(json["step"], *expected_step);
        message_id = json["reply"]["id"].as_str().unwrap().to_string();
    }

    // Confirmation summary carries the resolved RN price.
    let (_, json) = get_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}"),
    )
    .await;
    let summary = json["messages"]
        .as_array()
        .unwrap()
        .last()
        .unwrap()
        .clone();
    assert!(summary["content"].as_str().unwrap().contains("¥88/hour"));

    let (status, json) = tap(state.clone(), &session_id, &message_id, "confirm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "completed");
    assert_eq!(json["checkout"]["item_type"], "elderly_service");
    assert_eq!(
        json["checkout"]["item_name"],
        "Elderly Care-Hourly Care-Wang Fang(RN)"
    );

    let payloads = submitted.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].caregiver_id, "c3");
    assert_eq!(payloads[0].price, 88);
    assert_eq!(payloads[0].service_time, "08:00-12:00");
}

#[tokio::test]
async fn test_restart_clears_selections() {
    let (state, submitted) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();
    let mut message_id = json["messages"][0]["id"].as_str().unwrap().to_string();

    for (kind, value) in [
        ("service_type", Some("elderly-care")),
        ("qualification", Some("PCW")),
        ("caregiver", Some("c1")),
        ("package", Some("hourly")),
        ("date", Some("2025-10-05")),
        ("time", Some("08:00-12:00")),
    ] {
        let (_, json) = tap(state.clone(), &session_id, &message_id, kind, value).await;
        message_id = json["reply"]["id"].as_str().unwrap().to_string();
    }

    let (status, json) = tap(state.clone(), &session_id, &message_id, "restart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "select_service_type");
    assert!(json.get("checkout").is_none());
    assert!(submitted.lock().unwrap().is_empty());

    // The restart prompt offers the service types again.
    let replies = json["reply"]["quick_replies"].as_array().unwrap();
    assert_eq!(replies.len(), 3);
}

#[tokio::test]
async fn test_monthly_package_time_options() {
    let (state, _) = test_state();

    let (_, json) = post_json(
        state.clone(),
        "/api/chat/sessions",
        serde_json::json!({
            "caregiver_id": "c1",
            "service_type": "elderly-care",
            "qualification": "PCW"
        }),
    )
    .await;
    let session_id = json["session_id"].as_str().unwrap().to_string();
    let message_id = json["messages"][0]["id"].as_str().unwrap().to_string();

    let (_, json) = tap(state.clone(), &session_id, &message_id, "package", Some("monthly")).await;
    let message_id = json["reply"]["id"].as_str().unwrap().to_string();

    let (status, json) =
        tap(state.clone(), &session_id, &message_id, "date", Some("2025-10-05")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "select_time");

    let replies = json["reply"]["quick_replies"].as_array().unwrap();
    assert_eq!(replies.len(), 2);
    for reply in replies {
        assert!(reply["value"]
            .as_str()
            .unwrap()
            .contains("2025-10-05 至 2025-11-05"));
    }
}

// ── Stale-Input Guard ──

#[tokio::test]
async fn test_stale_quick_reply_is_rejected_without_mutation() {
    let (state, _) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();
    let greeting_id = json["messages"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = tap(
        state.clone(),
        &session_id,
        &greeting_id,
        "service_type",
        Some("elderly-care"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, before) = get_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}"),
    )
    .await;

    // Second tap on the same, now-stale greeting affordance.
    let (status, _) = tap(
        state.clone(),
        &session_id,
        &greeting_id,
        "service_type",
        Some("escort"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, after) = get_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}"),
    )
    .await;
    assert_eq!(before, after, "stale tap must not mutate the session");
}

#[tokio::test]
async fn test_wrong_kind_input_resets_flow() {
    let (state, _) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();
    let message_id = json["messages"][0]["id"].as_str().unwrap().to_string();

    // The greeting is live, but a time selection makes no sense here.
    let (status, json) = tap(
        state.clone(),
        &session_id,
        &message_id,
        "time",
        Some("08:00-12:00"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "select_service_type");
    assert!(json["reply"]["content"]
        .as_str()
        .unwrap()
        .contains("start from the beginning"));
}

// ── Freeform Messages ──

#[tokio::test]
async fn test_freeform_keyword_reply() {
    let (state, _) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();

    let (status, json) = post_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}/message"),
        serde_json::json!({ "text": "I've been feeling so tired lately" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"]["role"], "assistant");
    assert!(json["reply"]["content"].as_str().unwrap().contains("worn out"));
}

#[tokio::test]
async fn test_freeform_persona_switch() {
    let (state, _) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();

    let (_, json) = post_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}/message"),
        serde_json::json!({ "text": "what about my blood pressure?", "model_id": "clinical-advisor" }),
    )
    .await;
    assert!(json["reply"]["content"].as_str().unwrap().contains("140/90"));
}

#[tokio::test]
async fn test_freeform_does_not_advance_booking_flow() {
    let (state, _) = test_state();

    let (_, json) = post_json(state.clone(), "/api/chat/sessions", serde_json::json!({})).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();

    let _ = post_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}/message"),
        serde_json::json!({ "text": "hello there" }),
    )
    .await;

    let (_, json) = get_json(
        state.clone(),
        &format!("/api/chat/sessions/{session_id}"),
    )
    .await;
    assert_eq!(json["step"], "select_service_type");
}

// ── Catalog API ──

#[tokio::test]
async fn test_catalog_caregivers_filtered() {
    let (state, _) = test_state();

    let (status, json) = get_json(
        state.clone(),
        "/api/catalog/caregivers?service_type=elderly-care&qualification=RN",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let caregivers = json.as_array().unwrap();
    assert!(!caregivers.is_empty());
    // EN caregivers count as RN-equivalent for filtering.
    let ids: Vec<&str> = caregivers.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&"c3"));
    assert!(ids.contains(&"c4"));
}

#[tokio::test]
async fn test_catalog_packages() {
    let (state, _) = test_state();

    let (status, json) = get_json(state.clone(), "/api/catalog/packages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 4);

    let (status, json) = get_json(state.clone(), "/api/catalog/packages/24hour").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "24-Hour Live-in");

    let (status, _) = get_json(state, "/api/catalog/packages/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
