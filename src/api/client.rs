//! HTTP transport to the association backend.
//!
//! # Responsibilities
//! - Send JSON requests to `{base_url}{api_prefix}{path}`
//! - Keep the session cookie between calls
//! - Translate every failure into an [`ApiError`] value
//!
//! # Design Decisions
//! - The core sees only the [`Api`] trait, so tests substitute a mock
//! - No client-side timeout or retry
//! - Every call carries an `x-request-id` that also appears in the logs

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::observability::metrics;

/// Header carrying the per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Abstract JSON fetch. `Ok(None)` means an empty successful response.
#[async_trait]
pub trait Api: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<Value>)
        -> ApiResult<Option<Value>>;
}

/// [`Api`] over `reqwest` with a cookie jar.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: String,
}

impl HttpApi {
    /// Build a client for the configured backend.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::network(e, &config.base_url))?;

        let base = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            config.api_prefix.trim_end_matches('/')
        );

        tracing::info!(base = %base, "API client initialized");
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<Option<Value>> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base, path);
        let start = Instant::now();

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    "API request failed"
                );
                metrics::record_api_request(method.as_str(), 0, start.elapsed());
                return Err(ApiError::network(e, path));
            }
        };

        let status = response.status();
        metrics::record_api_request(method.as_str(), status.as_u16(), start.elapsed());

        let bytes = response.bytes().await.map_err(|e| ApiError::network(e, path))?;

        if !status.is_success() {
            let error = match serde_json::from_slice::<ApiError>(&bytes) {
                Ok(mut error) => {
                    if error.status == 0 {
                        error.status = status.as_u16();
                    }
                    error
                }
                Err(_) => ApiError::unexpected(status.as_u16(), path),
            };
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                message = %error.message,
                "API error response"
            );
            return Err(error);
        }

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "API response"
        );

        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|_| ApiError::parse(status.as_u16()))
    }
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi").field("base", &self.base).finish()
    }
}
