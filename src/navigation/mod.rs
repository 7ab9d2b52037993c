//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! navigate(name, params) / navigate_to_path(location) / pop / boot
//!     → Router resolves target (NotFound → error indicator, stop)
//!     → sequence += 1, SetNextRoute(target)
//!     → MiddlewareChain runs on a snapshot (actions buffered)
//!     → commit under lock:
//!         sequence stale → Superseded (buffer dropped)
//!         Ok  → buffered actions + SetRoute in one store update, history push
//!         Err → SetError + SetNextRoute(None), previous route kept
//! ```
//!
//! # Design Decisions
//! - At most one navigation may commit: the latest started
//! - History is pushed only for link navigations whose location changed
//! - Store, API and history are injected; no globals

pub mod controller;
pub mod history;
pub mod request;

pub use controller::{NavigationError, Navigator};
pub use history::{History, MemoryHistory};
pub use request::{NavigationOrigin, NavigationOutcome, NavigationRequest};
