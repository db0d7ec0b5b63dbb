mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

const UNKNOWN_ID: &str = "6f1c1c1e-0000-4000-8000-000000000000";

fn bill_of_lading() -> serde_json::Value {
    json!({
        "title": "B/L 0042",
        "document_type": "bill_of_lading",
        "content": "600,000 bbl Brent crude",
    })
}

#[tokio::test]
async fn test_documents_need_document_access() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let viewer = app.sign_up("viewer", "user").await;
    let vessel = app.create_vessel(&admin, "Nordic Spirit", "9200001", 58.0, 10.0).await;
    let uri = format!("/api/v1/vessels/{}/documents", vessel);

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get(&uri, Some(&viewer)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "SUBSCRIPTION_REQUIRED");

    // Basic does not include documents
    app.post("/api/v1/subscriptions/me/plan", Some(&viewer), json!({ "plan": "basic" }))
        .await;
    let (status, _) = app.post(&uri, Some(&viewer), bill_of_lading()).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);

    app.post("/api/v1/subscriptions/me/plan", Some(&viewer), json!({ "plan": "professional" }))
        .await;
    let (status, body) = app.get(&uri, Some(&viewer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_document_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let broker = app.sign_up("trader", "broker").await;
    app.post("/api/v1/subscriptions/trial", Some(&broker), json!({})).await;

    let vessel = app.create_vessel(&admin, "Nordic Spirit", "9200001", 58.0, 10.0).await;
    let uri = format!("/api/v1/vessels/{}/documents", vessel);

    let (status, body) = app.post(&uri, Some(&broker), bill_of_lading()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["vessel_id"], vessel.as_str());
    assert_eq!(body["data"]["status"], "active");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&uri, Some(&broker)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.get(&format!("/api/v1/documents/{}", id), Some(&broker)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "B/L 0042");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/documents/{}", id), Some(&broker), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/documents/{}", id), Some(&broker)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_document_on_unknown_vessel() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;

    let uri = format!("/api/v1/vessels/{}/documents", UNKNOWN_ID);
    let (status, _) = app.post(&uri, Some(&admin), bill_of_lading()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/v1/vessels/not-a-uuid/documents", Some(&admin)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_document_validation() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let vessel = app.create_vessel(&admin, "Nordic Spirit", "9200001", 58.0, 10.0).await;

    let (status, _) = app
        .post(
            &format!("/api/v1/vessels/{}/documents", vessel),
            Some(&admin),
            json!({ "title": "Manifest", "document_type": "napkin_sketch" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
