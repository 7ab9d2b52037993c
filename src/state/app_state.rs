//! The application state tree.

use std::sync::Arc;

use serde::Serialize;

use crate::api::ApiError;
use crate::routing::ResolvedRoute;
use crate::state::model::{
    Committee, CommitteeMember, Event, Location, MembershipStatus, Registration, User,
    UserCommittee,
};
use crate::state::resource::{Resource, ResourceSet, Revisions};

/// A resource cache: `None` until first loaded, then the list in API order.
pub type Cache<T> = Option<Arc<Vec<T>>>;

/// Who is using the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Not yet asked the backend.
    #[default]
    Unknown,
    /// The backend answered `401` to whoami.
    Anonymous,
    Authenticated(Arc<User>),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Session::Unknown)
    }

    pub fn status(&self) -> Option<MembershipStatus> {
        self.user().map(|u| u.status)
    }

    /// Whether the session user is a (kind of) member.
    pub fn is_member(&self) -> bool {
        self.status().is_some_and(MembershipStatus::is_member)
    }
}

/// Immutable snapshot of everything the client knows.
///
/// Every sub-tree sits behind an `Arc`, so cloning a state and replacing
/// one cache shares all the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// The committed route.
    pub route: Option<Arc<ResolvedRoute>>,
    /// Target of the navigation being resolved.
    pub next_route: Option<Arc<ResolvedRoute>>,
    pub session: Session,
    /// The user shown on the `user` route.
    pub profile: Option<Arc<User>>,
    /// Committee history of the profile user.
    pub profile_committees: Cache<UserCommittee>,
    pub events: Cache<Event>,
    /// Registrations of the event shown on `events.event`.
    pub registrations: Cache<Registration>,
    /// The session user's own registrations.
    pub user_event_registrations: Cache<Registration>,
    pub locations: Cache<Location>,
    pub committees: Cache<Committee>,
    /// Committee history of the session user.
    pub my_committees: Cache<UserCommittee>,
    /// Members of the committee shown on `committees.committee*`.
    pub committee_members: Cache<CommitteeMember>,
    pub users: Cache<User>,
    pub error: Option<ApiError>,
    /// Categories to refetch on the next navigation.
    pub stale: ResourceSet,
    /// Bumped per category by edits and invalidations, never by fetches.
    pub revisions: Revisions,
}

impl AppState {
    pub fn is_stale(&self, resource: Resource) -> bool {
        self.stale.contains(resource)
    }

    /// Whether `resource` must be fetched: never loaded, or invalidated.
    pub fn needs(&self, resource: Resource) -> bool {
        let loaded = match resource {
            Resource::Session => self.session.is_known(),
            Resource::Events => self.events.is_some(),
            Resource::Registrations => self.registrations.is_some(),
            Resource::UserEventRegistrations => self.user_event_registrations.is_some(),
            Resource::Locations => self.locations.is_some(),
            Resource::Committees => self.committees.is_some(),
            Resource::MyCommittees => self.my_committees.is_some(),
            Resource::CommitteeMembers => self.committee_members.is_some(),
            Resource::Users => self.users.is_some(),
            Resource::Profile => self.profile.is_some(),
        };
        !loaded || self.is_stale(resource)
    }

    pub fn event(&self, event_id: &str) -> Option<&Event> {
        self.events.as_ref()?.iter().find(|e| e.id == event_id)
    }

    pub fn committee(&self, committee_id: &str) -> Option<&Committee> {
        self.committees.as_ref()?.iter().find(|c| c.id == committee_id)
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route.as_deref().map(|r| r.name.as_str())
    }

    /// Compact, serializable view for logs and the CLI.
    pub fn summary(&self) -> StateSummary {
        fn count<T>(cache: &Cache<T>) -> Option<usize> {
            cache.as_ref().map(|c| c.len())
        }

        StateSummary {
            route: self.route.as_deref().cloned(),
            next_route: self.next_route.as_deref().cloned(),
            session: match &self.session {
                Session::Unknown => "unknown".to_string(),
                Session::Anonymous => "anonymous".to_string(),
                Session::Authenticated(user) => user.full_name(),
            },
            profile: self.profile.as_ref().map(|u| u.id.clone()),
            events: count(&self.events),
            registrations: count(&self.registrations),
            user_event_registrations: count(&self.user_event_registrations),
            locations: count(&self.locations),
            committees: count(&self.committees),
            my_committees: count(&self.my_committees),
            committee_members: count(&self.committee_members),
            users: count(&self.users),
            error: self.error.clone(),
            stale: self.stale,
        }
    }
}

/// Cache sizes and routing state of an [`AppState`].
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub route: Option<ResolvedRoute>,
    pub next_route: Option<ResolvedRoute>,
    pub session: String,
    pub profile: Option<String>,
    pub events: Option<usize>,
    pub registrations: Option<usize>,
    pub user_event_registrations: Option<usize>,
    pub locations: Option<usize>,
    pub committees: Option<usize>,
    pub my_committees: Option<usize>,
    pub committee_members: Option<usize>,
    pub users: Option<usize>,
    pub error: Option<ApiError>,
    pub stale: ResourceSet,
}
