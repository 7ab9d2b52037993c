//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the route table from configuration
//! - Build the store, backend client, middleware chain and history
//! - Hand back a [`Portal`] with the navigator and operations wired together
//!
//! # Design Decisions
//! - Fail fast: a route table that does not compile or a client that cannot
//!   be built is a startup error
//! - Subscriber and metrics installation stay with the binaries
//! - Nothing navigates here; callers decide when to `boot`

use std::sync::Arc;

use thiserror::Error;

use crate::api::{Api, ApiError, HttpApi};
use crate::config::ClientConfig;
use crate::middleware::MiddlewareChain;
use crate::navigation::{History, MemoryHistory, Navigator};
use crate::operations::Operations;
use crate::routing::{RouteError, Router};
use crate::state::{AppState, Store};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route table: {0}")]
    Routes(#[from] RouteError),

    #[error("backend client: {0}")]
    Client(#[from] ApiError),
}

/// A fully wired client.
#[derive(Debug)]
pub struct Portal {
    pub navigator: Navigator,
    pub operations: Operations,
}

impl Portal {
    /// Wire a portal against an arbitrary backend and history.
    pub fn assemble(
        config: &ClientConfig,
        api: Arc<dyn Api>,
        history: Arc<dyn History>,
    ) -> Result<Self, StartupError> {
        let router = Arc::new(Router::compile(&config.routes)?);
        let store = Arc::new(Store::with_feed_capacity(
            AppState::default(),
            config.navigation.action_feed_capacity,
        ));
        let chain = Arc::new(MiddlewareChain::standard());

        tracing::info!(
            routes = router.len(),
            steps = ?chain.step_names(),
            start_location = %history.location(),
            "Portal assembled"
        );

        Ok(Self {
            operations: Operations::new(store.clone(), api.clone()),
            navigator: Navigator::new(router, store, api, chain, history),
        })
    }
}

/// Build a portal talking HTTP to the configured backend, with an in-memory
/// history starting at `navigation.start_location`.
pub fn start(config: &ClientConfig) -> Result<Portal, StartupError> {
    let api = HttpApi::new(&config.api)?;
    let history = MemoryHistory::new(config.navigation.start_location.clone());
    Portal::assemble(config, Arc::new(api), Arc::new(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteDefinition;

    #[test]
    fn test_start_with_defaults() {
        let portal = start(&ClientConfig::default()).unwrap();
        assert_eq!(portal.navigator.history().location(), "/");
        assert!(portal.navigator.router().template("events.event").is_some());
        assert!(portal.navigator.store().snapshot().route.is_none());
    }

    #[test]
    fn test_bad_route_table_fails_fast() {
        let config = ClientConfig {
            routes: vec![
                RouteDefinition::leaf("a", "/same"),
                RouteDefinition::leaf("a", "/other"),
            ],
            ..ClientConfig::default()
        };
        let err = start(&config).unwrap_err();
        assert!(matches!(err, StartupError::Routes(RouteError::DuplicateName(_))));
    }
}
