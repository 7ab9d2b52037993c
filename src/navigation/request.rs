//! Navigation requests and their outcomes.

use std::sync::Arc;

use crate::api::ApiError;
use crate::routing::ResolvedRoute;
use crate::state::AppState;

/// What triggered a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOrigin {
    /// A link or programmatic navigation; pushes a history entry.
    Push,
    /// History back/forward; the location already changed.
    Pop,
    /// The initial load.
    Boot,
}

impl NavigationOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            NavigationOrigin::Push => "push",
            NavigationOrigin::Pop => "pop",
            NavigationOrigin::Boot => "boot",
        }
    }
}

/// One attempt to move from the committed route to `to`.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    /// Monotonic per navigator; the highest one in flight may commit.
    pub sequence: u64,
    /// The committed route when the attempt started.
    pub from: Option<Arc<ResolvedRoute>>,
    pub to: ResolvedRoute,
    /// State the middleware chain starts from: a store snapshot, plus the
    /// fetches kept from earlier passes of the same navigation.
    pub pending_state: Arc<AppState>,
    pub origin: NavigationOrigin,
}

impl NavigationRequest {
    /// Value of `key` on the origin route.
    pub fn from_param(&self, key: &str) -> Option<&str> {
        self.from.as_deref().and_then(|route| route.param(key))
    }

    /// Whether `key` differs between origin and target.
    pub fn param_changed(&self, key: &str) -> bool {
        self.from_param(key) != self.to.param(key)
    }
}

/// How a navigation attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The route and its data were committed.
    Committed(ResolvedRoute),
    /// No route matches the location; the error indicator was set.
    NotFound(String),
    /// A fetch failed; the error was set and the previous route kept.
    Failed(ApiError),
    /// A newer navigation started before this one finished.
    Superseded,
}

impl NavigationOutcome {
    /// Label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationOutcome::Committed(_) => "committed",
            NavigationOutcome::NotFound(_) => "not_found",
            NavigationOutcome::Failed(_) => "failed",
            NavigationOutcome::Superseded => "superseded",
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, NavigationOutcome::Committed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{default_routes, Router};

    #[test]
    fn test_param_changed() {
        let router = Router::compile(&default_routes()).unwrap();
        let from = router.match_path("/events/1").unwrap();
        let to = router.match_path("/events/1/edit").unwrap();

        let mut request = NavigationRequest {
            sequence: 1,
            from: Some(Arc::new(from)),
            to,
            pending_state: Arc::new(AppState::default()),
            origin: NavigationOrigin::Push,
        };
        assert!(!request.param_changed("event_id"));

        request.to = router.match_path("/events/2").unwrap();
        assert!(request.param_changed("event_id"));

        request.from = None;
        assert!(request.param_changed("event_id"));
        assert!(!request.param_changed("committee_id"));
    }
}
