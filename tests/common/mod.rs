#![allow(dead_code)]

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

use wellspring_api::config::{Config, StorageBackend};
use wellspring_api::store::MemoryStore;
use wellspring_api::{build_router, AppState};

pub const BOUNDARY: &str = "wellspring-test-boundary";

pub fn test_config() -> Config {
    Config {
        storage: StorageBackend::Memory,
        database_url: None,
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:3000".into(),
        cors_extra_origins: Vec::new(),
        jwt_secret: "integration-test-secret".into(),
        jwt_ttl_secs: 3600,
        auth_rate_limit_max: 1000,
        auth_rate_limit_window_secs: 60,
        max_upload_bytes: 1024 * 1024,
    }
}

pub fn app_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), test_config())
}

/// Router with a fixed peer address so the rate limiter has a key.
pub fn test_app() -> Router {
    build_router(app_state()).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "name": name, "email": email, "password": password }),
        ),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        ),
    )
    .await
}

/// Registers and logs in a fresh user, returning the bearer token.
pub async fn signed_in(app: &Router, email: &str) -> String {
    let (status, _) = register(app, "Ada Lovelace", email, "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = login(app, email, "secret1").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

pub fn profile_body() -> Value {
    json!({
        "age": 34,
        "gender": "prefer-not-to-say",
        "occupation": "Nurse",
        "sleepHours": 6.5,
        "exerciseFrequency": "regularly",
        "stressLevel": 7,
        "wellnessGoals": ["Better Sleep", "Stress Management"],
        "energyLevel": 4,
        "additionalInfo": "Night shifts"
    })
}
