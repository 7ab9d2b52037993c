//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteDefinition tree (built-in or [[routes]] in config)
//!     → router.rs (depth-first flatten into dotted names)
//!     → matcher.rs (compile templates into segment patterns)
//!     → Freeze as immutable Router, shared via Arc
//!
//! Forward resolution:
//!     location "/events/42?tab=info"
//!     → strip trailing slash, split query
//!     → first matching pattern in declaration order
//!     → ResolvedRoute { name, path, params, query } or None
//!
//! Reverse resolution:
//!     ("events.event", {event_id: 42})
//!     → substitute placeholders
//!     → ResolvedRoute or RouteError
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First declared match wins; literal siblings are declared first

pub mod definition;
pub mod error;
pub mod matcher;
pub mod resolved;
pub mod router;

pub use definition::{default_routes, RouteDefinition};
pub use error::RouteError;
pub use resolved::{Params, ResolvedRoute};
pub use router::Router;
