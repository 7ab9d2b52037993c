//! The navigation controller.
//!
//! # Responsibilities
//! - Resolve targets by name or location
//! - Run the middleware chain against a snapshot of the store
//! - Commit route and loaded data in one store update
//! - Keep history in step with committed routes
//!
//! # Design Decisions
//! - Sequence numbers decide which navigation may commit; stale ones run
//!   to completion and are dropped at commit time
//! - The sequence check and the commit happen under one lock, so a newer
//!   navigation can never be overwritten by an older one
//! - Unknown locations are user-facing errors; unknown names and missing
//!   params are caller bugs returned as `Err`. They supersede pending
//!   navigations like any other navigation
//! - Fetch results for a category edited or invalidated after the fetch
//!   started are dropped at commit, and the chain runs again from the live
//!   state to reload them. After `MAX_PASSES` the route commits without them

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use thiserror::Error;

use crate::api::{Api, ApiError};
use crate::middleware::{MiddlewareChain, NavigationContext};
use crate::navigation::history::History;
use crate::navigation::request::{NavigationOrigin, NavigationOutcome, NavigationRequest};
use crate::observability::metrics;
use crate::routing::{Params, ResolvedRoute, RouteError, Router};
use crate::state::{reduce, Action, AppState, Resource, Revisions, Store};

/// Chain runs per navigation before committing without outdated fetches.
const MAX_PASSES: u32 = 3;

/// A buffered action and the store revisions its pass started from.
type Buffered = (Revisions, Action);

enum Settled {
    Done(NavigationOutcome),
    /// Some fetches were outdated; run again from this live state.
    Retry(Arc<AppState>),
}

/// Errors raised by navigation calls that indicate caller defects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("cannot navigate: {0}")]
    Route(#[from] RouteError),
}

/// Drives route changes and the data they depend on.
pub struct Navigator {
    router: Arc<Router>,
    store: Arc<Store>,
    api: Arc<dyn Api>,
    chain: Arc<MiddlewareChain>,
    history: Arc<dyn History>,
    latest: Mutex<u64>,
}

impl Navigator {
    pub fn new(
        router: Arc<Router>,
        store: Arc<Store>,
        api: Arc<dyn Api>,
        chain: Arc<MiddlewareChain>,
        history: Arc<dyn History>,
    ) -> Self {
        Self {
            router,
            store,
            api,
            chain,
            history,
            latest: Mutex::new(0),
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Navigate to a route by dotted name.
    pub async fn navigate(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<NavigationOutcome, NavigationError> {
        let to = self.router.match_name(name, params).map_err(|e| {
            tracing::error!(route = %name, error = %e, "Navigation to invalid route");
            e
        })?;
        Ok(self.run(to, NavigationOrigin::Push).await)
    }

    /// Navigate to a location such as `/events/42?tab=info`.
    pub async fn navigate_to_path(&self, location: &str) -> NavigationOutcome {
        self.resolve_and_run(location, NavigationOrigin::Push).await
    }

    /// Load the route for the current history location.
    pub async fn boot(&self) -> NavigationOutcome {
        let location = self.history.location();
        self.resolve_and_run(&location, NavigationOrigin::Boot).await
    }

    /// Handle an externally changed location (back/forward in a browser).
    pub async fn pop(&self, location: &str) -> NavigationOutcome {
        self.resolve_and_run(location, NavigationOrigin::Pop).await
    }

    /// Step back in history. `None` at the oldest entry.
    pub async fn back(&self) -> Option<NavigationOutcome> {
        let location = self.history.back()?;
        Some(self.pop(&location).await)
    }

    /// Step forward in history. `None` at the newest entry.
    pub async fn forward(&self) -> Option<NavigationOutcome> {
        let location = self.history.forward()?;
        Some(self.pop(&location).await)
    }

    async fn resolve_and_run(&self, location: &str, origin: NavigationOrigin) -> NavigationOutcome {
        match self.router.match_path(location) {
            Some(to) => self.run(to, origin).await,
            None => self.not_found(location),
        }
    }

    fn not_found(&self, location: &str) -> NavigationOutcome {
        {
            let mut latest = self.lock_latest();
            *latest += 1;
            tracing::info!(sequence = *latest, location = %location, "No route for location");
            self.store.dispatch_all(vec![
                Action::SetError(Some(ApiError::route_not_found(location))),
                Action::SetNextRoute(None),
            ]);
        }
        metrics::record_navigation("not_found", std::time::Duration::ZERO);
        NavigationOutcome::NotFound(location.to_string())
    }

    async fn run(&self, to: ResolvedRoute, origin: NavigationOrigin) -> NavigationOutcome {
        let started = Instant::now();

        let mut request = {
            let mut latest = self.lock_latest();
            *latest += 1;
            self.store.dispatch(Action::SetNextRoute(Some(to.clone())));
            let pending_state = self.store.snapshot();
            NavigationRequest {
                sequence: *latest,
                from: pending_state.route.clone(),
                to,
                pending_state,
                origin,
            }
        };

        tracing::info!(
            sequence = request.sequence,
            origin = origin.as_str(),
            from = request.from.as_deref().map(|r| r.name.as_str()).unwrap_or("-"),
            to = %request.to.name,
            path = %request.to.path,
            "Navigation started"
        );

        let mut baseline = request.pending_state.revisions;
        let mut carried: Vec<Buffered> = Vec::new();
        let mut pass = 1;
        let outcome = loop {
            let mut ctx = NavigationContext::new(&request, self.api.as_ref());
            let result = self.chain.run(&mut ctx).await;
            let batch: Vec<Buffered> =
                ctx.into_actions().into_iter().map(|a| (baseline, a)).collect();

            match self.commit(&request, &mut carried, result.map(|()| batch), pass) {
                Settled::Done(outcome) => break outcome,
                Settled::Retry(live) => {
                    baseline = live.revisions;
                    let pending = carried
                        .iter()
                        .fold(AppState::clone(&live), |state, (_, a)| reduce(&state, a));
                    request.pending_state = Arc::new(pending);
                    pass += 1;
                }
            }
        };

        tracing::info!(
            sequence = request.sequence,
            to = %request.to.name,
            outcome = outcome.as_str(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Navigation finished"
        );
        metrics::record_navigation(outcome.as_str(), started.elapsed());
        outcome
    }

    /// Commit a finished pass, or ask for another one when some of its
    /// fetches were overtaken by edits to the live store.
    fn commit(
        &self,
        request: &NavigationRequest,
        carried: &mut Vec<Buffered>,
        result: Result<Vec<Buffered>, ApiError>,
        pass: u32,
    ) -> Settled {
        let latest = self.lock_latest();
        if *latest != request.sequence {
            tracing::debug!(
                sequence = request.sequence,
                latest = *latest,
                "Navigation superseded, dropping results"
            );
            return Settled::Done(NavigationOutcome::Superseded);
        }

        match result {
            Ok(batch) => {
                let live = self.store.snapshot();

                let reloaded: Vec<Resource> =
                    batch.iter().filter_map(|(_, a)| fetched(a)).collect();
                carried.retain(|(_, a)| fetched(a).map_or(true, |r| !reloaded.contains(&r)));
                carried.extend(batch);

                let before = carried.len();
                carried.retain(|(baseline, a)| {
                    let changed = live.revisions.changed_since(baseline);
                    fetched(a).map_or(true, |r| !changed.contains(r))
                });
                let outdated = before - carried.len();
                if outdated > 0 {
                    if pass < MAX_PASSES {
                        tracing::debug!(
                            sequence = request.sequence,
                            pass,
                            outdated,
                            "State changed during navigation, reloading"
                        );
                        return Settled::Retry(live);
                    }
                    tracing::warn!(
                        sequence = request.sequence,
                        outdated,
                        "Committing without outdated fetches"
                    );
                }

                let mut batch: Vec<Action> = carried.drain(..).map(|(_, a)| a).collect();
                if live.error.is_some() {
                    batch.push(Action::SetError(None));
                }
                batch.push(Action::SetRoute(request.to.clone()));
                self.store.dispatch_all(batch);

                let href = request.to.href();
                if request.origin == NavigationOrigin::Push && self.history.location() != href {
                    self.history.push(&href);
                }
                Settled::Done(NavigationOutcome::Committed(request.to.clone()))
            }
            Err(error) => {
                self.store.dispatch_all(vec![
                    Action::SetError(Some(error.clone())),
                    Action::SetNextRoute(None),
                ]);
                Settled::Done(NavigationOutcome::Failed(error))
            }
        }
    }

    fn lock_latest(&self) -> MutexGuard<'_, u64> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The category a buffered action loaded, counting session changes found
/// by whoami as session loads.
fn fetched(action: &Action) -> Option<Resource> {
    match action {
        Action::Login(_) | Action::Logout => Some(Resource::Session),
        other => other.loads(),
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("routes", &self.router.len())
            .field("chain", &self.chain)
            .field("latest", &*self.lock_latest())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResult;
    use crate::navigation::history::MemoryHistory;
    use crate::routing::default_routes;
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::{json, Value};

    /// Answers whoami with 401 and every list with `[]`.
    struct EmptyBackend;

    #[async_trait]
    impl Api for EmptyBackend {
        async fn request(
            &self,
            _method: Method,
            path: &str,
            _body: Option<Value>,
        ) -> ApiResult<Option<Value>> {
            if path == "/whoami" {
                return Err(ApiError::new("Unauthorized", 401, ""));
            }
            Ok(Some(json!([])))
        }
    }

    fn navigator(history: Arc<MemoryHistory>) -> Navigator {
        Navigator::new(
            Arc::new(Router::compile(&default_routes()).unwrap()),
            Arc::new(Store::default()),
            Arc::new(EmptyBackend),
            Arc::new(MiddlewareChain::standard()),
            history,
        )
    }

    #[tokio::test]
    async fn test_boot_commits_without_history_push() {
        let history = Arc::new(MemoryHistory::new("/about"));
        let nav = navigator(history.clone());

        let outcome = nav.boot().await;
        assert!(outcome.is_committed());
        assert_eq!(nav.store().snapshot().route_name(), Some("about"));
        assert_eq!(history.entries(), vec!["/about"]);
    }

    #[tokio::test]
    async fn test_navigate_pushes_history() {
        let history = Arc::new(MemoryHistory::new("/"));
        let nav = navigator(history.clone());

        let mut params = Params::new();
        params.insert("event_id".into(), "7".into());
        nav.navigate("events.event", &params).await.unwrap();

        assert_eq!(history.location(), "/events/7");
        let state = nav.store().snapshot();
        assert!(state.next_route.is_none());
        assert_eq!(state.route.as_ref().unwrap().param("event_id"), Some("7"));
    }

    #[tokio::test]
    async fn test_invalid_name_is_error_not_state() {
        let nav = navigator(Arc::new(MemoryHistory::default()));
        let err = nav.navigate("nowhere", &Params::new()).await.unwrap_err();
        assert_eq!(err, NavigationError::Route(RouteError::UnknownRoute("nowhere".into())));
        assert!(nav.store().snapshot().error.is_none());
        assert!(nav.store().snapshot().next_route.is_none());
    }

    #[tokio::test]
    async fn test_back_at_oldest_entry() {
        let nav = navigator(Arc::new(MemoryHistory::default()));
        assert!(nav.back().await.is_none());
    }
}
