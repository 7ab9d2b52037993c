//! Per-navigation working state for the middleware chain.

use crate::api::Api;
use crate::navigation::NavigationRequest;
use crate::routing::ResolvedRoute;
use crate::state::{reduce, Action, AppState};

/// Working copy of the state for one navigation attempt.
///
/// Actions dispatched here are reduced into the local copy right away, so
/// later steps see the effects of earlier ones. Nothing reaches the store
/// until the navigator commits the recorded actions.
pub struct NavigationContext<'a> {
    pub request: &'a NavigationRequest,
    pub api: &'a dyn Api,
    state: AppState,
    actions: Vec<Action>,
}

impl<'a> NavigationContext<'a> {
    pub fn new(request: &'a NavigationRequest, api: &'a dyn Api) -> Self {
        Self {
            request,
            api,
            state: AppState::clone(&request.pending_state),
            actions: Vec::new(),
        }
    }

    /// The pending state with this pass's actions applied.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The navigation target.
    pub fn to(&self) -> &ResolvedRoute {
        &self.request.to
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(
            sequence = self.request.sequence,
            action = action.kind(),
            "Action buffered"
        );
        self.state = reduce(&self.state, &action);
        self.actions.push(action);
    }

    /// Actions recorded so far, in dispatch order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}
