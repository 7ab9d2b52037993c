//! Backend error values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error reported by, or on the way to, the backend.
///
/// Mirrors the backend's JSON error body so it can be stored in
/// `AppState` and shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} (status {status}, {reference})")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, or `0` when no response was received.
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub reference: String,
}

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, reference: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            reference: reference.into(),
        }
    }

    /// The request never produced a response.
    pub fn network(error: impl std::fmt::Display, path: &str) -> Self {
        Self::new(error.to_string(), 0, format!("URL: {path}"))
    }

    /// A non-2xx response whose body was not an error document.
    pub fn unexpected(status: u16, path: &str) -> Self {
        Self::new("An unexpected error occurred", status, format!("URL: {path}"))
    }

    /// A 2xx response whose body could not be decoded.
    pub fn parse(status: u16) -> Self {
        Self::new("Failed to parse response", status, "PARSE_ERROR")
    }

    /// A request body could not be encoded.
    pub fn encode(error: impl std::fmt::Display) -> Self {
        Self::new(error.to_string(), 0, "ENCODE_ERROR")
    }

    /// No route matches the requested location.
    pub fn route_not_found(location: &str) -> Self {
        Self::new("Page not found", 404, format!("Route: {location}"))
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}
