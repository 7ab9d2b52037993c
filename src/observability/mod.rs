//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (route, resource, request_id)
//!     → metrics.rs (counters, histograms through the `metrics` facade)
//!
//! Binaries install consumers:
//!     → logging.rs (fmt subscriber, pretty or JSON)
//!     → metrics.rs (optional Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Navigation sequence and request ID flow through log fields
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;
