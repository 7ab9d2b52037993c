//! The portal's loading steps.
//!
//! Each step fetches at most one resource category. Conditions read the
//! working state, so a step sees what earlier steps loaded in the same
//! pass (e.g. event registrations check visibility against freshly loaded
//! events and session).

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{endpoints, ApiResult};
use crate::middleware::chain::MiddlewareStep;
use crate::middleware::context::NavigationContext;
use crate::state::{Action, Resource, Session};

/// Routes that show committee names next to their content.
const COMMITTEE_ROUTES: [&str; 4] = ["events.new", "events.event.edit", "user", "settings"];

/// whoami when the session is unknown or invalidated.
pub struct SessionStep;

#[async_trait]
impl MiddlewareStep for SessionStep {
    fn name(&self) -> &'static str {
        "session"
    }

    fn resource(&self) -> Resource {
        Resource::Session
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        ctx.state().needs(Resource::Session)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let user = endpoints::whoami(ctx.api).await?;
        let current = ctx.state().session.clone();

        let action = match (user, &current) {
            (Some(user), Session::Authenticated(known)) if known.id != user.id => {
                Action::Login(Arc::new(user))
            }
            (Some(user), _) => Action::SetSession(Session::Authenticated(Arc::new(user))),
            (None, Session::Authenticated(_)) => Action::Logout,
            (None, _) => Action::SetSession(Session::Anonymous),
        };
        ctx.dispatch(action);
        Ok(())
    }
}

/// The event list, for the home page and everything under `events`.
pub struct EventsStep;

#[async_trait]
impl MiddlewareStep for EventsStep {
    fn name(&self) -> &'static str {
        "events"
    }

    fn resource(&self) -> Resource {
        Resource::Events
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        let to = ctx.to();
        (to.name == "index" || to.is_within("events")) && ctx.state().needs(Resource::Events)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let events = endpoints::events(ctx.api).await?;
        ctx.dispatch(Action::SetEvents(Arc::new(events)));
        Ok(())
    }
}

/// Event locations, for event-scoped routes.
pub struct LocationsStep;

#[async_trait]
impl MiddlewareStep for LocationsStep {
    fn name(&self) -> &'static str {
        "locations"
    }

    fn resource(&self) -> Resource {
        Resource::Locations
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        ctx.to().is_within("events") && ctx.state().needs(Resource::Locations)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let locations = endpoints::locations(ctx.api).await?;
        ctx.dispatch(Action::SetLocations(Arc::new(locations)));
        Ok(())
    }
}

/// The global committee list.
pub struct CommitteesStep;

#[async_trait]
impl MiddlewareStep for CommitteesStep {
    fn name(&self) -> &'static str {
        "committees"
    }

    fn resource(&self) -> Resource {
        Resource::Committees
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        let to = ctx.to();
        (to.is_within("committees") || COMMITTEE_ROUTES.contains(&to.name.as_str()))
            && ctx.state().needs(Resource::Committees)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let committees = endpoints::committees(ctx.api).await?;
        ctx.dispatch(Action::SetCommittees(Arc::new(committees)));
        Ok(())
    }
}

/// The session user's committee history.
pub struct MyCommitteesStep;

#[async_trait]
impl MiddlewareStep for MyCommitteesStep {
    fn name(&self) -> &'static str {
        "my_committees"
    }

    fn resource(&self) -> Resource {
        Resource::MyCommittees
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        let to = ctx.to();
        ctx.state().session.user().is_some()
            && (to.is_within("events") || to.is_within("committees") || to.name == "settings")
            && ctx.state().needs(Resource::MyCommittees)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let Some(user_id) = ctx.state().session.user().map(|u| u.id.clone()) else {
            return Ok(());
        };
        let committees = endpoints::user_committees(ctx.api, &user_id).await?;
        ctx.dispatch(Action::SetMyCommittees(Arc::new(committees)));
        Ok(())
    }
}

/// The session user's own event registrations.
pub struct OwnRegistrationsStep;

#[async_trait]
impl MiddlewareStep for OwnRegistrationsStep {
    fn name(&self) -> &'static str {
        "own_registrations"
    }

    fn resource(&self) -> Resource {
        Resource::UserEventRegistrations
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        let name = ctx.to().name.as_str();
        ctx.state().session.user().is_some()
            && (name == "events" || name == "settings")
            && ctx.state().needs(Resource::UserEventRegistrations)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let Some(user_id) = ctx.state().session.user().map(|u| u.id.clone()) else {
            return Ok(());
        };
        let registrations = endpoints::user_event_registrations(ctx.api, &user_id).await?;
        ctx.dispatch(Action::SetUserEventRegistrations(Arc::new(registrations)));
        Ok(())
    }
}

/// The member directory. Members only.
pub struct UsersStep;

#[async_trait]
impl MiddlewareStep for UsersStep {
    fn name(&self) -> &'static str {
        "users"
    }

    fn resource(&self) -> Resource {
        Resource::Users
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        ctx.state().session.is_member()
            && ctx.to().name == "members"
            && ctx.state().needs(Resource::Users)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let users = endpoints::users(ctx.api).await?;
        ctx.dispatch(Action::SetUsers(Arc::new(users)));
        Ok(())
    }
}

/// The user shown on `user`, with their committee history.
pub struct ProfileStep;

#[async_trait]
impl MiddlewareStep for ProfileStep {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn resource(&self) -> Resource {
        Resource::Profile
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        let state = ctx.state();
        let to = ctx.to();
        if to.name != "user" || state.session.user().is_none() {
            return false;
        }
        let shown = state.profile.as_ref().map(|p| p.id.as_str());
        shown != to.param("user_id") || state.is_stale(Resource::Profile)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let Some(user_id) = ctx.to().param("user_id").map(str::to_owned) else {
            return Ok(());
        };
        let user = endpoints::user(ctx.api, &user_id).await?;
        let committees = endpoints::user_committees(ctx.api, &user_id).await?;
        ctx.dispatch(Action::SetProfile {
            user: Arc::new(user),
            committees: Arc::new(committees),
        });
        Ok(())
    }
}

/// Members of the committee shown under `committees.committee`.
pub struct CommitteeMembersStep;

#[async_trait]
impl MiddlewareStep for CommitteeMembersStep {
    fn name(&self) -> &'static str {
        "committee_members"
    }

    fn resource(&self) -> Resource {
        Resource::CommitteeMembers
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        ctx.state().session.is_member()
            && ctx.to().is_within("committees.committee")
            && (ctx.state().needs(Resource::CommitteeMembers)
                || ctx.request.param_changed("committee_id"))
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let Some(committee_id) = ctx.to().param("committee_id").map(str::to_owned) else {
            return Ok(());
        };
        let members = endpoints::committee_members(ctx.api, &committee_id).await?;
        ctx.dispatch(Action::SetCommitteeMembers(Arc::new(members)));
        Ok(())
    }
}

/// Registrations of the event shown on `events.event`, when the visitor
/// may see them. Otherwise the list is emptied.
pub struct EventRegistrationsStep;

#[async_trait]
impl MiddlewareStep for EventRegistrationsStep {
    fn name(&self) -> &'static str {
        "event_registrations"
    }

    fn resource(&self) -> Resource {
        Resource::Registrations
    }

    fn applies(&self, ctx: &NavigationContext<'_>) -> bool {
        let to = ctx.to();
        let state = ctx.state();
        if to.name != "events.event" {
            return false;
        }
        if !state.needs(Resource::Registrations) && !ctx.request.param_changed("event_id") {
            return false;
        }
        // Registrations of a previously shown event must not outlive it
        state.registrations.is_some() || shown_event_visible(ctx)
    }

    async fn load(&self, ctx: &mut NavigationContext<'_>) -> ApiResult<()> {
        let Some(event_id) = ctx.to().param("event_id").map(str::to_owned) else {
            return Ok(());
        };
        let registrations = if shown_event_visible(ctx) {
            endpoints::event_registrations(ctx.api, &event_id).await?
        } else {
            Vec::new()
        };
        ctx.dispatch(Action::SetEventRegistrations(Arc::new(registrations)));
        Ok(())
    }
}

fn shown_event_visible(ctx: &NavigationContext<'_>) -> bool {
    let state = ctx.state();
    ctx.to()
        .param("event_id")
        .and_then(|id| state.event(id))
        .is_some_and(|event| event.is_visible_to(state.session.status()))
}
