//! Ordered execution of loading steps.

use async_trait::async_trait;

use crate::api::ApiResult;
use crate::middleware::context::NavigationContext;
use crate::middleware::steps;
use crate::observability::metrics;
use crate::state::Resource;

/// One unit of the chain: decides whether a resource must be fetched for
/// the navigation target and, if so, fetches it.
#[async_trait]
pub trait MiddlewareStep: Send + Sync {
    /// Step name for logs.
    fn name(&self) -> &'static str;

    /// The resource category this step loads.
    fn resource(&self) -> Resource;

    /// Whether this navigation needs the resource fetched.
    fn applies(&self, ctx: &NavigationContext<'_>) -> bool;

    /// Fetch and dispatch the result into the context.
    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()>;
}

/// An ordered list of steps run for every navigation.
#[derive(Default)]
pub struct MiddlewareChain {
    steps: Vec<Box<dyn MiddlewareStep>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain used by the portal, in loading order.
    pub fn standard() -> Self {
        Self::new()
            .with_step(steps::SessionStep)
            .with_step(steps::EventsStep)
            .with_step(steps::LocationsStep)
            .with_step(steps::CommitteesStep)
            .with_step(steps::MyCommitteesStep)
            .with_step(steps::OwnRegistrationsStep)
            .with_step(steps::UsersStep)
            .with_step(steps::ProfileStep)
            .with_step(steps::CommitteeMembersStep)
            .with_step(steps::EventRegistrationsStep)
    }

    #[must_use]
    pub fn with_step(mut self, step: impl MiddlewareStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every applicable step in order. The first failure aborts the
    /// remaining steps.
    pub async fn run(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        for step in &self.steps {
            if !step.applies(ctx) {
                continue;
            }

            let resource = step.resource();
            tracing::debug!(
                sequence = ctx.request.sequence,
                route = %ctx.to().name,
                step = step.name(),
                resource = %resource,
                "Loading resource"
            );

            match step.load(ctx).await {
                Ok(()) => metrics::record_fetch(resource, true),
                Err(e) => {
                    metrics::record_fetch(resource, false);
                    tracing::warn!(
                        sequence = ctx.request.sequence,
                        route = %ctx.to().name,
                        step = step.name(),
                        status = e.status,
                        error = %e.message,
                        "Resource load failed"
                    );
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("steps", &self.step_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        assert_eq!(
            MiddlewareChain::standard().step_names(),
            vec![
                "session",
                "events",
                "locations",
                "committees",
                "my_committees",
                "own_registrations",
                "users",
                "profile",
                "committee_members",
                "event_registrations",
            ]
        );
    }
}
