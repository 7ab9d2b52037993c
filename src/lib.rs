//! Member portal client library.
//!
//! Named, parameterised routes for an association's member site, a
//! navigation controller that loads each route's data through a middleware
//! chain before committing, and a reducer-based store holding the session and
//! cached backend collections.
//!
//! # Architecture Overview
//!
//! ```text
//!   navigate(name, params) / navigate_to_path(location) / pop / boot
//!                │
//!                ▼
//!        ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!        │   routing    │──▶│  navigation  │──▶│  middleware  │──▶ api (reqwest)
//!        │ match/render │   │  sequencing  │   │  fetch steps │
//!        └──────────────┘   └──────┬───────┘   └──────┬───────┘
//!                                  │ commit (one batch)│ actions
//!                                  ▼                   │
//!                           ┌──────────────┐◀──────────┘
//!   operations ────────────▶│    state     │──▶ watch / broadcast subscribers
//!   (create/update/delete)  │ reduce+store │
//!                           └──────────────┘
//! ```

// Core subsystems
pub mod api;
pub mod config;
pub mod routing;
pub mod state;

// Navigation
pub mod middleware;
pub mod navigation;
pub mod operations;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use api::{Api, ApiError, HttpApi};
pub use config::ClientConfig;
pub use lifecycle::Portal;
pub use navigation::{NavigationOutcome, Navigator};
pub use operations::Operations;
pub use routing::{ResolvedRoute, Router};
pub use state::{Action, AppState, Store};
