//! The shared state container.
//!
//! # Responsibilities
//! - Hold the current `Arc<AppState>` snapshot
//! - Apply actions through the reducer, one batch at a time
//! - Notify subscribers of new snapshots and applied actions
//!
//! # Design Decisions
//! - `tokio::sync::watch` for snapshots: readers never block writers and
//!   always see the latest state
//! - `tokio::sync::broadcast` for the applied-action feed; lagging
//!   receivers lose old actions, never the state
//! - A batch is reduced and published under the watch lock, so no reader
//!   observes half of a batch and the feed order equals application order

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::state::action::Action;
use crate::state::app_state::AppState;
use crate::state::reducer::reduce;

/// Default capacity of the applied-action feed.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

pub struct Store {
    state: watch::Sender<Arc<AppState>>,
    actions: broadcast::Sender<Action>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self::with_feed_capacity(initial, DEFAULT_FEED_CAPACITY)
    }

    pub fn with_feed_capacity(initial: AppState, capacity: usize) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        let (actions, _) = broadcast::channel(capacity.max(1));
        Self { state, actions }
    }

    /// The current state.
    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.subscribe()
    }

    /// Receive every applied action, in application order.
    pub fn actions(&self) -> broadcast::Receiver<Action> {
        self.actions.subscribe()
    }

    pub fn dispatch(&self, action: Action) {
        self.dispatch_all(vec![action]);
    }

    /// Apply a batch atomically: subscribers see the state before or after
    /// the whole batch, never in between.
    pub fn dispatch_all(&self, batch: Vec<Action>) {
        if batch.is_empty() {
            return;
        }

        self.state.send_modify(|current| {
            let mut next = AppState::clone(current);
            for action in &batch {
                next = reduce(&next, action);
                tracing::trace!(action = action.kind(), "Action applied");
            }
            *current = Arc::new(next);

            for action in batch {
                // No receivers is fine
                let _ = self.actions.send(action);
            }
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("route", &self.snapshot().route_name().map(str::to_owned))
            .field("subscribers", &self.state.receiver_count())
            .finish()
    }
}
