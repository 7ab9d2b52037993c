//! The closed set of state transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::ApiError;
use crate::routing::ResolvedRoute;
use crate::state::app_state::Session;
use crate::state::model::{
    Committee, CommitteeMember, Event, Location, Registration, User, UserCommittee,
};
use crate::state::resource::{Resource, ResourceSet};

/// A typed state transition.
///
/// List payloads are `Arc`ed so actions clone cheaply onto the action feed
/// and the reducer can install them without copying.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetNextRoute(Option<ResolvedRoute>),
    /// Commit a route and clear the pending one.
    SetRoute(ResolvedRoute),
    SetError(Option<ApiError>),

    SetSession(Session),
    Login(Arc<User>),
    Logout,

    SetEvents(Arc<Vec<Event>>),
    AddEvent(Event),
    ReplaceEvent(Event),
    DeleteEvent {
        event_id: String,
    },

    SetEventRegistrations(Arc<Vec<Registration>>),
    AddEventRegistration(Registration),
    DeleteEventRegistration {
        event_id: String,
        registration_id: String,
    },
    SetUserEventRegistrations(Arc<Vec<Registration>>),

    SetLocations(Arc<Vec<Location>>),

    SetCommittees(Arc<Vec<Committee>>),
    AddCommittee(Committee),
    ReplaceCommittee(Committee),
    DeleteCommittee {
        committee_id: String,
    },
    SetMyCommittees(Arc<Vec<UserCommittee>>),
    SetCommitteeMembers(Arc<Vec<CommitteeMember>>),
    AddCommitteeMember {
        committee_id: String,
        member: CommitteeMember,
        joined: DateTime<Utc>,
    },
    DeleteCommitteeMember {
        committee_id: String,
        user_id: String,
        left: DateTime<Utc>,
    },

    SetUsers(Arc<Vec<User>>),
    AddUser(User),
    DeleteUser {
        user_id: String,
    },
    SetProfile {
        user: Arc<User>,
        committees: Arc<Vec<UserCommittee>>,
    },

    Invalidate(Resource),
}

impl Action {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetNextRoute(_) => "set_next_route",
            Action::SetRoute(_) => "set_route",
            Action::SetError(_) => "set_error",
            Action::SetSession(_) => "set_session",
            Action::Login(_) => "login",
            Action::Logout => "logout",
            Action::SetEvents(_) => "set_events",
            Action::AddEvent(_) => "add_event",
            Action::ReplaceEvent(_) => "replace_event",
            Action::DeleteEvent { .. } => "delete_event",
            Action::SetEventRegistrations(_) => "set_event_registrations",
            Action::AddEventRegistration(_) => "add_event_registration",
            Action::DeleteEventRegistration { .. } => "delete_event_registration",
            Action::SetUserEventRegistrations(_) => "set_user_event_registrations",
            Action::SetLocations(_) => "set_locations",
            Action::SetCommittees(_) => "set_committees",
            Action::AddCommittee(_) => "add_committee",
            Action::ReplaceCommittee(_) => "replace_committee",
            Action::DeleteCommittee { .. } => "delete_committee",
            Action::SetMyCommittees(_) => "set_my_committees",
            Action::SetCommitteeMembers(_) => "set_committee_members",
            Action::AddCommitteeMember { .. } => "add_committee_member",
            Action::DeleteCommitteeMember { .. } => "delete_committee_member",
            Action::SetUsers(_) => "set_users",
            Action::AddUser(_) => "add_user",
            Action::DeleteUser { .. } => "delete_user",
            Action::SetProfile { .. } => "set_profile",
            Action::Invalidate(_) => "invalidate",
        }
    }

    /// The resource category this action loads, if it is a fetch result.
    pub fn loads(&self) -> Option<Resource> {
        match self {
            Action::SetSession(_) => Some(Resource::Session),
            Action::SetEvents(_) => Some(Resource::Events),
            Action::SetEventRegistrations(_) => Some(Resource::Registrations),
            Action::SetUserEventRegistrations(_) => Some(Resource::UserEventRegistrations),
            Action::SetLocations(_) => Some(Resource::Locations),
            Action::SetCommittees(_) => Some(Resource::Committees),
            Action::SetMyCommittees(_) => Some(Resource::MyCommittees),
            Action::SetCommitteeMembers(_) => Some(Resource::CommitteeMembers),
            Action::SetUsers(_) => Some(Resource::Users),
            Action::SetProfile { .. } => Some(Resource::Profile),
            _ => None,
        }
    }

    /// Categories this action edits or invalidates without fetching them.
    ///
    /// A fetch result for one of these categories, obtained before the
    /// action was applied, no longer reflects the backend.
    pub fn touches(&self) -> ResourceSet {
        let resources: &[Resource] = match self {
            Action::SetNextRoute(_) | Action::SetRoute(_) | Action::SetError(_) => &[],
            Action::SetSession(_)
            | Action::SetEvents(_)
            | Action::SetEventRegistrations(_)
            | Action::SetUserEventRegistrations(_)
            | Action::SetLocations(_)
            | Action::SetCommittees(_)
            | Action::SetMyCommittees(_)
            | Action::SetCommitteeMembers(_)
            | Action::SetUsers(_)
            | Action::SetProfile { .. } => &[],
            Action::Login(_) | Action::Logout => &[
                Resource::Session,
                Resource::Events,
                Resource::Registrations,
                Resource::UserEventRegistrations,
                Resource::Users,
                Resource::CommitteeMembers,
                Resource::MyCommittees,
                Resource::Profile,
            ],
            Action::AddEvent(_) | Action::ReplaceEvent(_) | Action::DeleteEvent { .. } => {
                &[Resource::Events]
            }
            Action::AddEventRegistration(_) | Action::DeleteEventRegistration { .. } => {
                &[Resource::Events, Resource::Registrations, Resource::UserEventRegistrations]
            }
            Action::AddCommittee(_)
            | Action::ReplaceCommittee(_)
            | Action::DeleteCommittee { .. } => &[Resource::Committees],
            Action::AddCommitteeMember { .. } | Action::DeleteCommitteeMember { .. } => {
                &[Resource::CommitteeMembers, Resource::MyCommittees, Resource::Profile]
            }
            Action::AddUser(_) => &[Resource::Users],
            Action::DeleteUser { .. } => &[Resource::Users, Resource::Profile],
            Action::Invalidate(resource) => return ResourceSet::empty().with(*resource),
        };
        resources.iter().copied().collect()
    }
}
