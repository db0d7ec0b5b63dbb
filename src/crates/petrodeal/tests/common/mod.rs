//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use petrodeal::api::{create_router, AppState};
use petrodeal::config::ServerConfig;
use petrodeal::db::DatabaseConnection;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = DatabaseConnection::in_memory().await.expect("in-memory database");
        let state = AppState::new(db, ServerConfig::default());
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        // Extractor rejections from axum itself are plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// Register and log in; returns the bearer token
    ///
    /// The first account registered on a fresh database is the administrator.
    pub async fn sign_up(&self, username: &str, role: &str) -> String {
        let (status, _) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "correct-horse-battery",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {}", username);

        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "login": username, "password": "correct-horse-battery" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {}", username);
        body["data"]["token"].as_str().expect("token").to_string()
    }

    /// Create a port as `admin_token`; returns its id
    pub async fn create_port(&self, admin_token: &str, name: &str, lat: f64, lng: f64) -> String {
        let (status, body) = self
            .post(
                "/api/v1/ports",
                Some(admin_token),
                json!({
                    "name": name,
                    "country": "Netherlands",
                    "region": "Europe",
                    "lat": lat,
                    "lng": lng,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create port {}", name);
        body["data"]["id"].as_str().expect("port id").to_string()
    }

    /// Create a positioned vessel as `admin_token`; returns its id
    pub async fn create_vessel(&self, admin_token: &str, name: &str, imo: &str, lat: f64, lng: f64) -> String {
        let (status, body) = self
            .post(
                "/api/v1/vessels",
                Some(admin_token),
                json!({
                    "name": name,
                    "imo": imo,
                    "vessel_type": "Suezmax",
                    "current_lat": lat,
                    "current_lng": lng,
                    "speed_knots": 12.5,
                    "status": "underway",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create vessel {}", name);
        body["data"]["id"].as_str().expect("vessel id").to_string()
    }
}
