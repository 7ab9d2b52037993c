//! Backend API subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware step / Operations
//!     → endpoints.rs (typed call: path, method, body)
//!     → Api::request (client.rs; HttpApi in production, mocks in tests)
//!     → JSON body decoded into wire types (state/model.rs)
//!     → Err(ApiError) on network, status or decode failure
//! ```
//!
//! # Design Decisions
//! - Errors are plain data (`ApiError`), stored in state and shown to users
//! - `401` on whoami is an answer, not an error
//! - Cookie-based session kept by the HTTP client

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{Api, HttpApi, REQUEST_ID_HEADER};
pub use error::{ApiError, ApiResult};
