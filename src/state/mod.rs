//! Application state subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware / Operations / Navigator
//!     → Action (closed enum, action.rs)
//!     → Store::dispatch_all (store.rs)
//!     → reduce(&AppState, &Action) → AppState (reducer.rs)
//!     → watch channel publishes Arc<AppState>
//!     → broadcast channel publishes applied actions
//!     → subscribers re-render
//! ```
//!
//! # Design Decisions
//! - Single immutable state tree; the reducer is the only writer
//! - Per-resource invalidation set instead of a global reload flag
//! - Per-resource revision counters let a navigation detect edits made while
//!   its fetches were in flight
//! - Caches are `Option<Arc<Vec<T>>>`: `None` means never loaded

pub mod action;
pub mod app_state;
pub mod model;
pub mod reducer;
pub mod resource;
pub mod store;

pub use action::Action;
pub use app_state::{AppState, Cache, Session, StateSummary};
pub use reducer::reduce;
pub use resource::{Resource, ResourceSet, Revisions};
pub use store::Store;
