mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_socket_needs_session() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/ws", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/ws?token=not-a-session", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_socket_needs_realtime_plan() {
    let app = TestApp::new().await;
    let _admin = app.sign_up("harbourmaster", "user").await;
    let viewer = app.sign_up("viewer", "user").await;

    let (status, body) = app.get(&format!("/ws?token={}", viewer), None).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "SUBSCRIPTION_REQUIRED");

    let (status, _) = app.get("/ws", Some(&viewer)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);

    let (status, _) = app
        .post("/api/v1/subscriptions/me/plan", Some(&viewer), json!({ "plan": "basic" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Past the gate; only the missing upgrade headers are refused now
    let (status, _) = app.get(&format!("/ws?token={}", viewer), None).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
    assert_ne!(status, StatusCode::PAYMENT_REQUIRED);
    assert!(status.is_client_error());
}
