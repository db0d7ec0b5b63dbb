mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_nearby_vessels_stay_within_radius() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;

    let port = app.create_port(&admin, "Rotterdam", 51.95, 4.14).await;
    // Roughly 7 km, 40 km and 180 km from the port
    app.create_vessel(&admin, "Close Call", "9100001", 51.99, 4.05).await;
    app.create_vessel(&admin, "North Sea Trader", "9100002", 52.30, 4.20).await;
    app.create_vessel(&admin, "Channel Runner", "9100003", 51.10, 2.00).await;

    let (status, body) = app
        .get(&format!("/api/v1/ports/{}/nearby-vessels?radius_km=100", port), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let vessels = body["data"]["vessels"].as_array().unwrap();
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(vessels[0]["name"], "Close Call");
    assert_eq!(vessels[1]["name"], "North Sea Trader");

    let distances: Vec<f64> = vessels.iter().map(|v| v["distance_km"].as_f64().unwrap()).collect();
    assert!(distances.iter().all(|d| *d <= 100.0));
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));

    let (status, body) = app
        .get(&format!("/api/v1/ports/{}/nearby-vessels?radius_km=500&limit=1", port), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_radius_must_be_positive_and_capped() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let port = app.create_port(&admin, "Rotterdam", 51.95, 4.14).await;

    for radius in ["0", "-5", "5000"] {
        let (status, _) = app
            .get(&format!("/api/v1/ports/{}/nearby-vessels?radius_km={}", port, radius), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "radius {}", radius);
    }
}

#[tokio::test]
async fn test_port_proximity_needs_port_insights() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let viewer = app.sign_up("viewer", "user").await;

    app.create_port(&admin, "Rotterdam", 51.95, 4.14).await;
    app.create_vessel(&admin, "Close Call", "9100001", 51.99, 4.05).await;

    let (status, _) = app.get("/api/v1/proximity/ports", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/v1/proximity/ports", Some(&viewer)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "SUBSCRIPTION_REQUIRED");

    let (status, _) = app
        .post("/api/v1/subscriptions/me/plan", Some(&viewer), json!({ "plan": "basic" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/v1/proximity/ports?radius_km=25", Some(&viewer)).await;
    assert_eq!(status, StatusCode::OK);
    let ports = body["data"].as_array().unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0]["port_name"], "Rotterdam");
    assert_eq!(ports[0]["vessels"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_refinery_nearby_needs_refinery_access() {
    let app = TestApp::new().await;
    let admin = app.sign_up("harbourmaster", "user").await;
    let viewer = app.sign_up("viewer", "user").await;

    let (status, body) = app
        .post(
            "/api/v1/refineries",
            Some(&admin),
            json!({
                "name": "Pernis",
                "country": "Netherlands",
                "region": "Europe",
                "lat": 51.88,
                "lng": 4.38,
                "capacity_bpd": 404000,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let refinery = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/refineries/{}/nearby-vessels", refinery);

    // Basic does not include refineries
    app.post("/api/v1/subscriptions/me/plan", Some(&viewer), json!({ "plan": "basic" }))
        .await;
    let (status, _) = app.get(&uri, Some(&viewer)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);

    // Administrators are never gated
    let (status, body) = app.get(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["origin_name"], "Pernis");
}
