//! `HttpApi` against a local axum backend.

use std::net::SocketAddr;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Json;
use member_portal::api::{endpoints, Api, ApiError, HttpApi, REQUEST_ID_HEADER};
use member_portal::config::ApiConfig;
use member_portal::state::model::Credentials;
use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

mod common;

async fn whoami(headers: HeaderMap) -> Response {
    let logged_in = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("sid=abc"));
    if logged_in {
        Json(common::user_json("u1", "member")).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized", "status": 401, "reference": "whoami"})),
        )
            .into_response()
    }
}

async fn login() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, "sid=abc; Path=/")])
}

async fn echo(headers: HeaderMap) -> Json<serde_json::Value> {
    let id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Json(json!({ "requestId": id }))
}

async fn full() -> impl IntoResponse {
    (
        StatusCode::CONFLICT,
        Json(json!({"message": "Event is full", "reference": "FULL"})),
    )
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "bad gateway")
}

async fn start() -> SocketAddr {
    let app = axum::Router::new()
        .route("/api/whoami", get(whoami))
        .route("/api/login", post(login))
        .route("/api/echo", get(echo))
        .route("/api/full", post(full))
        .route("/api/broken", get(broken))
        .route("/api/gone", delete(|| async { StatusCode::NO_CONTENT }));
    common::start_mock_backend(app).await
}

fn client(addr: SocketAddr) -> HttpApi {
    HttpApi::new(&ApiConfig {
        base_url: format!("http://{addr}"),
        ..ApiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_session_cookie_is_kept() {
    let api = client(start().await);

    assert_eq!(endpoints::whoami(&api).await.unwrap(), None);

    let credentials = Credentials {
        email: "u1@example.org".into(),
        password: "secret".into(),
    };
    endpoints::login(&api, &credentials).await.unwrap();

    let user = endpoints::whoami(&api).await.unwrap().unwrap();
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn test_every_call_carries_request_id() {
    let api = client(start().await);

    let first = api.request(Method::GET, "/echo", None).await.unwrap().unwrap();
    let second = api.request(Method::GET, "/echo", None).await.unwrap().unwrap();

    let first = Uuid::parse_str(first["requestId"].as_str().unwrap()).unwrap();
    let second = Uuid::parse_str(second["requestId"].as_str().unwrap()).unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_error_body_is_passed_through() {
    let api = client(start().await);

    let err = api
        .request(Method::POST, "/full", Some(json!({})))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::new("Event is full", 409, "FULL"));
}

#[tokio::test]
async fn test_non_json_error_becomes_unexpected() {
    let api = client(start().await);

    let err = api.request(Method::GET, "/broken", None).await.unwrap_err();
    assert_eq!(err, ApiError::unexpected(502, "/broken"));
}

#[tokio::test]
async fn test_no_content_is_none() {
    let api = client(start().await);
    assert_eq!(api.request(Method::DELETE, "/gone", None).await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_path_is_unexpected_404() {
    let api = client(start().await);

    let err = api.request(Method::GET, "/nowhere", None).await.unwrap_err();
    assert!(err.is_not_found());
}
