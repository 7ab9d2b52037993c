//! Mutation operations.
//!
//! # Data Flow
//! ```text
//! caller (UI, CLI)
//!     → Operations::<op> (events.rs, registrations.rs, committees.rs, users.rs)
//!     → endpoints.rs (POST / PUT / DELETE)
//!     → Ok:  dispatch the matching cache action (Add*, Replace*, Delete*)
//!     → Err: dispatch SetError, return the ApiError
//! ```
//!
//! # Design Decisions
//! - Results are applied to loaded caches directly; nothing is refetched
//! - Timestamps for committee joins and leaves are taken here, keeping the
//!   reducer pure
//! - A `401` on a mutation means the session expired and logs the user out

mod committees;
mod events;
mod registrations;
mod users;

use std::sync::Arc;

use crate::api::{Api, ApiResult};
use crate::state::{Action, Resource, Store};

/// Store-aware wrapper around the backend's mutating endpoints.
#[derive(Clone)]
pub struct Operations {
    store: Arc<Store>,
    api: Arc<dyn Api>,
}

impl Operations {
    pub fn new(store: Arc<Store>, api: Arc<dyn Api>) -> Self {
        Self { store, api }
    }

    /// Mark a resource category for refetch on the next navigation.
    pub fn invalidate(&self, resource: Resource) {
        tracing::debug!(resource = %resource, "Resource invalidated");
        self.store.dispatch(Action::Invalidate(resource));
    }

    fn api(&self) -> &dyn Api {
        self.api.as_ref()
    }

    /// Record a failed operation in the store and pass the result through.
    fn settle<T>(&self, operation: &'static str, result: ApiResult<T>) -> ApiResult<T> {
        let error = match result {
            Ok(value) => {
                tracing::info!(operation, "Operation succeeded");
                return Ok(value);
            }
            Err(error) => error,
        };

        tracing::warn!(
            operation,
            status = error.status,
            error = %error.message,
            reference = %error.reference,
            "Operation failed"
        );

        let mut batch = vec![Action::SetError(Some(error.clone()))];
        if error.is_unauthorized() && self.store.snapshot().session.user().is_some() {
            batch.push(Action::Logout);
        }
        self.store.dispatch_all(batch);
        Err(error)
    }
}

impl std::fmt::Debug for Operations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operations").field("store", &self.store).finish()
    }
}
