mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_vessel_crud_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;

    let id = app.create_vessel(&admin, "Nordic Spirit", "9254325", 57.7, 11.9).await;

    let (status, body) = app.get(&format!("/api/v1/vessels/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["imo"], "9254325");
    assert_eq!(body["data"]["status"], "underway");

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/vessels/{}", id),
            Some(&admin),
            Some(json!({ "speed_knots": 0.0, "status": "anchored" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "anchored");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/vessels/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/vessels/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_imo_conflicts() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;

    app.create_vessel(&admin, "Nordic Spirit", "9254325", 57.7, 11.9).await;

    let (status, body) = app
        .post(
            "/api/v1/vessels",
            Some(&admin),
            json!({ "name": "Other Name", "imo": "9254325", "vessel_type": "VLCC" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = TestApp::new().await;

    let (status, _) = app
        .get("/api/v1/vessels/6f1c1c1e-0000-4000-8000-000000000000", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/v1/vessels/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app.get("/api/v1/ports/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_writes_require_admin() {
    let app = TestApp::new().await;
    let _admin = app.sign_up("harbourmaster", "user").await;
    let broker = app.sign_up("trader", "broker").await;

    let vessel = json!({ "name": "Gulf Pioneer", "imo": "9300001", "vessel_type": "Aframax" });

    let (status, _) = app.post("/api/v1/vessels", None, vessel.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.post("/api/v1/vessels", Some(&broker), vessel).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;

    app.create_vessel(&admin, "Aegean Star", "9321483", 37.9, 23.6).await;
    app.create_vessel(&admin, "Baltic Dawn", "9321484", 59.4, 24.7).await;
    app.create_vessel(&admin, "Caspian Wind", "9321485", 40.4, 49.9).await;

    let (status, body) = app.get("/api/v1/vessels?per_page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/v1/vessels?search=baltic", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], "Baltic Dawn");

    let (status, _) = app.get("/api/v1/vessels?per_page=500", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app.get("/api/v1/vessels/positions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_progress_narrative_needs_ai_insights() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let trader = app.sign_up("trader", "broker").await;

    let id = app.create_vessel(&admin, "Nordic Spirit", "9254325", 57.7, 11.9).await;

    let (status, body) = app.get(&format!("/api/v1/vessels/{}/progress", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "unknown");
    assert!(body["data"]["narrative"].is_null());

    let uri = format!("/api/v1/vessels/{}/progress?narrative=true", id);
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A trial grants professional features only
    let (status, _) = app.post("/api/v1/subscriptions/trial", Some(&trader), json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.get(&uri, Some(&trader)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "SUBSCRIPTION_REQUIRED");

    let (status, _) = app
        .post("/api/v1/subscriptions/me/plan", Some(&trader), json!({ "plan": "enterprise" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&uri, Some(&trader)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["narrative"].as_str().unwrap().contains("Nordic Spirit"));
}
