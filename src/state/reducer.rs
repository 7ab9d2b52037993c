//! The pure state transition function.
//!
//! # Design Decisions
//! - Exhaustive `match` over [`Action`]; adding a variant fails to compile here
//! - No I/O, clocks or randomness; timestamps arrive in the payload
//! - Mutations only touch caches that are already loaded; a `None` cache is
//!   fetched whole on the next navigation instead
//! - Untouched caches are shared with the previous state
//! - Every action bumps the revision counters of the categories it touches

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::state::action::Action;
use crate::state::app_state::{AppState, Cache, Session};
use crate::state::model::{Event, Registration, UserCommittee};
use crate::state::resource::Resource;

/// Apply one action, producing the next state.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::SetNextRoute(route) => {
            next.next_route = route.clone().map(Arc::new);
        }
        Action::SetRoute(route) => {
            next.route = Some(Arc::new(route.clone()));
            next.next_route = None;
        }
        Action::SetError(error) => {
            next.error = error.clone();
        }

        Action::SetSession(session) => {
            next.session = session.clone();
            next.stale = next.stale.without(Resource::Session);
        }
        Action::Login(user) => {
            next.session = Session::Authenticated(user.clone());
            invalidate_identity(&mut next);
        }
        Action::Logout => {
            next.session = Session::Anonymous;
            next.user_event_registrations = None;
            next.my_committees = None;
            next.users = None;
            invalidate_identity(&mut next);
        }

        Action::SetEvents(events) => {
            next.events = Some(events.clone());
            next.stale = next.stale.without(Resource::Events);
        }
        Action::AddEvent(event) => {
            next.events = push(&state.events, event.clone());
        }
        Action::ReplaceEvent(event) => {
            next.events = upsert(&state.events, event.clone(), |e| e.id == event.id);
        }
        Action::DeleteEvent { event_id } => {
            next.events = retain(&state.events, |e| &e.id != event_id);
        }

        Action::SetEventRegistrations(registrations) => {
            next.registrations = Some(registrations.clone());
            next.stale = next.stale.without(Resource::Registrations);
        }
        Action::AddEventRegistration(registration) => {
            next.registrations = push(&state.registrations, registration.clone());
            next.events = adjust_count(&state.events, &registration.event_id, registration.is_waiting(), 1);
            if state.session.user().is_some_and(|u| u.id == registration.user_id) {
                next.user_event_registrations =
                    push(&state.user_event_registrations, registration.clone());
            }
        }
        Action::DeleteEventRegistration {
            event_id,
            registration_id,
        } => {
            let waiting = find_registration(state, registration_id)
                .map(Registration::is_waiting)
                .unwrap_or(false);
            next.events = adjust_count(&state.events, event_id, waiting, -1);
            next.registrations = retain(&state.registrations, |r| &r.id != registration_id);
            next.user_event_registrations =
                retain(&state.user_event_registrations, |r| &r.id != registration_id);
        }
        Action::SetUserEventRegistrations(registrations) => {
            next.user_event_registrations = Some(registrations.clone());
            next.stale = next.stale.without(Resource::UserEventRegistrations);
        }

        Action::SetLocations(locations) => {
            next.locations = Some(locations.clone());
            next.stale = next.stale.without(Resource::Locations);
        }

        Action::SetCommittees(committees) => {
            next.committees = Some(committees.clone());
            next.stale = next.stale.without(Resource::Committees);
        }
        Action::AddCommittee(committee) => {
            next.committees = push(&state.committees, committee.clone());
        }
        Action::ReplaceCommittee(committee) => {
            next.committees = upsert(&state.committees, committee.clone(), |c| c.id == committee.id);
        }
        Action::DeleteCommittee { committee_id } => {
            next.committees = retain(&state.committees, |c| &c.id != committee_id);
        }
        Action::SetMyCommittees(committees) => {
            next.my_committees = Some(committees.clone());
            next.stale = next.stale.without(Resource::MyCommittees);
        }
        Action::SetCommitteeMembers(members) => {
            next.committee_members = Some(members.clone());
            next.stale = next.stale.without(Resource::CommitteeMembers);
        }
        Action::AddCommitteeMember {
            committee_id,
            member,
            joined,
        } => {
            let user_id = &member.user.id;
            if !contains(&state.committee_members, |m| &m.user.id == user_id) {
                next.committee_members = push(&state.committee_members, member.clone());
            }
            let entry = UserCommittee {
                user_id: user_id.clone(),
                committee_id: committee_id.clone(),
                role: member.role,
                joined: *joined,
                left: None,
            };
            if state.session.user().is_some_and(|u| &u.id == user_id) {
                next.my_committees = push(&state.my_committees, entry.clone());
            }
            if state.profile.as_ref().is_some_and(|p| &p.id == user_id) {
                next.profile_committees = push(&state.profile_committees, entry);
            }
        }
        Action::DeleteCommitteeMember {
            committee_id,
            user_id,
            left,
        } => {
            next.committee_members = retain(&state.committee_members, |m| &m.user.id != user_id);
            if state.session.user().is_some_and(|u| &u.id == user_id) {
                next.my_committees = close_membership(&state.my_committees, committee_id, *left);
            }
            if state.profile.as_ref().is_some_and(|p| &p.id == user_id) {
                next.profile_committees =
                    close_membership(&state.profile_committees, committee_id, *left);
            }
        }

        Action::SetUsers(users) => {
            next.users = Some(users.clone());
            next.stale = next.stale.without(Resource::Users);
        }
        Action::AddUser(user) => {
            next.users = push(&state.users, user.clone());
        }
        Action::DeleteUser { user_id } => {
            next.users = retain(&state.users, |u| &u.id != user_id);
            if state.profile.as_ref().is_some_and(|p| &p.id == user_id) {
                next.profile = None;
                next.profile_committees = None;
            }
        }
        Action::SetProfile { user, committees } => {
            next.profile = Some(user.clone());
            next.profile_committees = Some(committees.clone());
            next.stale = next.stale.without(Resource::Profile);
        }

        Action::Invalidate(resource) => {
            next.stale = next.stale.with(*resource);
        }
    }

    next.revisions = next.revisions.bump(action.touches());
    next
}

fn invalidate_identity(state: &mut AppState) {
    state.stale = Resource::IDENTITY_DEPENDENT
        .into_iter()
        .fold(state.stale, |set, r| set.with(r))
        .without(Resource::Session);
}

fn push<T: Clone>(cache: &Cache<T>, item: T) -> Cache<T> {
    cache.as_ref().map(|list| {
        let mut list = Vec::clone(list);
        list.push(item);
        Arc::new(list)
    })
}

fn retain<T: Clone>(cache: &Cache<T>, keep: impl Fn(&T) -> bool) -> Cache<T> {
    cache
        .as_ref()
        .map(|list| Arc::new(list.iter().filter(|&item| keep(item)).cloned().collect()))
}

fn contains<T>(cache: &Cache<T>, pred: impl Fn(&T) -> bool) -> bool {
    cache.as_ref().is_some_and(|list| list.iter().any(pred))
}

/// Replace the matching item in place, or append it.
fn upsert<T: Clone>(cache: &Cache<T>, item: T, is_same: impl Fn(&T) -> bool) -> Cache<T> {
    cache.as_ref().map(|list| {
        let mut list = Vec::clone(list);
        match list.iter().position(is_same) {
            Some(idx) => list[idx] = item,
            None => list.push(item),
        }
        Arc::new(list)
    })
}

fn find_registration<'a>(state: &'a AppState, registration_id: &str) -> Option<&'a Registration> {
    [&state.registrations, &state.user_event_registrations]
        .into_iter()
        .flatten()
        .flat_map(|list| list.iter())
        .find(|r| r.id == registration_id)
}

fn adjust_count(events: &Cache<Event>, event_id: &str, waiting: bool, delta: i32) -> Cache<Event> {
    let list = events.as_ref()?;
    if !list.iter().any(|e| e.id == event_id) {
        return events.clone();
    }

    let adjusted = list
        .iter()
        .map(|event| {
            if event.id != event_id {
                return event.clone();
            }
            let mut event = event.clone();
            let counter = if waiting {
                &mut event.waiting_list_count
            } else {
                &mut event.registration_count
            };
            *counter = counter.saturating_add_signed(delta);
            event
        })
        .collect();
    Some(Arc::new(adjusted))
}

fn close_membership(
    cache: &Cache<UserCommittee>,
    committee_id: &str,
    left: DateTime<Utc>,
) -> Cache<UserCommittee> {
    cache.as_ref().map(|list| {
        Arc::new(
            list.iter()
                .map(|entry| {
                    if entry.committee_id == committee_id && entry.is_active() {
                        UserCommittee {
                            left: Some(left),
                            ..entry.clone()
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::routing::{Params, ResolvedRoute};
    use crate::state::model::{
        CommitteeMember, CommitteeRole, EventContent, Localized, MembershipStatus, User,
    };
    use crate::state::resource::ResourceSet;
    use chrono::TimeZone;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "Ada".into(),
            infix: None,
            last_name: "Lovelace".into(),
            email: format!("{id}@example.org"),
            phone: None,
            roles: Vec::new(),
            status: MembershipStatus::Member,
        }
    }

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            registration_count: 2,
            waiting_list_count: 0,
            content: EventContent {
                name: Localized::default(),
                description: Localized::default(),
                dates: Vec::new(),
                registration_period: None,
                registration_max: None,
                waiting_list_max: None,
                is_published: true,
                required_membership_status: vec![MembershipStatus::NonMember],
                event_type: Default::default(),
                questions: Vec::new(),
                location: None,
            },
        }
    }

    fn registration(id: &str, event_id: &str, user_id: &str, waiting: Option<u32>) -> Registration {
        Registration {
            id: id.to_string(),
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            first_name: "Ada".into(),
            infix: None,
            last_name: "Lovelace".into(),
            attended: None,
            waiting_list_position: waiting,
            answers: Vec::new(),
            created: None,
            updated: None,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap()
    }

    fn route(name: &str, path: &str) -> ResolvedRoute {
        ResolvedRoute {
            name: name.into(),
            path: path.into(),
            params: Params::new(),
            query: Params::new(),
        }
    }

    #[test]
    fn test_route_commit_clears_next_route() {
        let state = reduce(
            &AppState::default(),
            &Action::SetNextRoute(Some(route("about", "/about"))),
        );
        assert!(state.next_route.is_some());

        let state = reduce(&state, &Action::SetRoute(route("about", "/about")));
        assert_eq!(state.route_name(), Some("about"));
        assert!(state.next_route.is_none());
    }

    #[test]
    fn test_set_clears_invalidation() {
        let state = reduce(&AppState::default(), &Action::Invalidate(Resource::Events));
        assert!(state.is_stale(Resource::Events));

        let state = reduce(&state, &Action::SetEvents(Arc::new(vec![event("1")])));
        assert!(!state.is_stale(Resource::Events));
        assert!(!state.needs(Resource::Events));
    }

    #[test]
    fn test_untouched_caches_are_shared() {
        let state = AppState {
            committees: Some(Arc::new(Vec::new())),
            ..AppState::default()
        };
        let next = reduce(&state, &Action::SetEvents(Arc::new(vec![event("1")])));
        assert!(Arc::ptr_eq(
            state.committees.as_ref().unwrap(),
            next.committees.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_login_and_logout_invalidate_identity_caches() {
        let state = AppState {
            users: Some(Arc::new(vec![user("u2")])),
            locations: Some(Arc::new(Vec::new())),
            ..AppState::default()
        };

        let state = reduce(&state, &Action::Login(Arc::new(user("u1"))));
        assert_eq!(state.session.user().map(|u| u.id.as_str()), Some("u1"));
        assert!(state.is_stale(Resource::Events));
        assert!(state.is_stale(Resource::MyCommittees));
        assert!(!state.is_stale(Resource::Locations));
        assert!(!state.is_stale(Resource::Session));

        let state = reduce(&state, &Action::Logout);
        assert_eq!(state.session, Session::Anonymous);
        assert!(state.users.is_none());
        assert!(state.locations.is_some());
    }

    #[test]
    fn test_registration_adjusts_counts() {
        let state = AppState {
            session: Session::Authenticated(Arc::new(user("u1"))),
            events: Some(Arc::new(vec![event("e1"), event("e2")])),
            registrations: Some(Arc::new(Vec::new())),
            user_event_registrations: Some(Arc::new(Vec::new())),
            ..AppState::default()
        };

        let state = reduce(
            &state,
            &Action::AddEventRegistration(registration("r1", "e1", "u1", None)),
        );
        assert_eq!(state.event("e1").unwrap().registration_count, 3);
        assert_eq!(state.event("e2").unwrap().registration_count, 2);
        assert_eq!(state.user_event_registrations.as_ref().unwrap().len(), 1);

        let state = reduce(
            &state,
            &Action::AddEventRegistration(registration("r2", "e1", "u9", Some(1))),
        );
        assert_eq!(state.event("e1").unwrap().waiting_list_count, 1);
        assert_eq!(state.event("e1").unwrap().registration_count, 3);
        assert_eq!(state.user_event_registrations.as_ref().unwrap().len(), 1);
        assert_eq!(state.registrations.as_ref().unwrap().len(), 2);

        let state = reduce(
            &state,
            &Action::DeleteEventRegistration {
                event_id: "e1".into(),
                registration_id: "r2".into(),
            },
        );
        assert_eq!(state.event("e1").unwrap().waiting_list_count, 0);
        assert_eq!(state.registrations.as_ref().unwrap().len(), 1);

        let state = reduce(
            &state,
            &Action::DeleteEventRegistration {
                event_id: "e1".into(),
                registration_id: "r1".into(),
            },
        );
        assert_eq!(state.event("e1").unwrap().registration_count, 2);
        assert!(state.user_event_registrations.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_mutations_leave_unloaded_caches_alone() {
        let state = reduce(&AppState::default(), &Action::AddEvent(event("e1")));
        assert!(state.events.is_none());

        let state = reduce(
            &state,
            &Action::AddEventRegistration(registration("r1", "e1", "u1", None)),
        );
        assert!(state.registrations.is_none());
        assert!(state.events.is_none());
    }

    #[test]
    fn test_replace_event_keeps_order() {
        let state = AppState {
            events: Some(Arc::new(vec![event("a"), event("b"), event("c")])),
            ..AppState::default()
        };
        let mut updated = event("b");
        updated.registration_count = 10;

        let state = reduce(&state, &Action::ReplaceEvent(updated));
        let ids: Vec<_> = state.events.as_ref().unwrap().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(state.event("b").unwrap().registration_count, 10);

        let state = reduce(&state, &Action::DeleteEvent { event_id: "a".into() });
        assert!(state.event("a").is_none());
    }

    #[test]
    fn test_join_and_leave_committee_stamps_history() {
        let me = user("u1");
        let state = AppState {
            session: Session::Authenticated(Arc::new(me.clone())),
            committee_members: Some(Arc::new(Vec::new())),
            my_committees: Some(Arc::new(Vec::new())),
            ..AppState::default()
        };

        let state = reduce(
            &state,
            &Action::AddCommitteeMember {
                committee_id: "c1".into(),
                member: CommitteeMember {
                    user: me.clone(),
                    role: CommitteeRole::Member,
                },
                joined: at(10),
            },
        );
        assert_eq!(state.committee_members.as_ref().unwrap().len(), 1);
        let entry = &state.my_committees.as_ref().unwrap()[0];
        assert_eq!(entry.joined, at(10));
        assert!(entry.is_active());

        let state = reduce(
            &state,
            &Action::DeleteCommitteeMember {
                committee_id: "c1".into(),
                user_id: "u1".into(),
                left: at(12),
            },
        );
        assert!(state.committee_members.as_ref().unwrap().is_empty());
        assert_eq!(state.my_committees.as_ref().unwrap()[0].left, Some(at(12)));
    }

    #[test]
    fn test_other_member_does_not_touch_my_committees() {
        let state = AppState {
            session: Session::Authenticated(Arc::new(user("u1"))),
            committee_members: Some(Arc::new(Vec::new())),
            my_committees: Some(Arc::new(Vec::new())),
            ..AppState::default()
        };
        let state = reduce(
            &state,
            &Action::AddCommitteeMember {
                committee_id: "c1".into(),
                member: CommitteeMember {
                    user: user("u2"),
                    role: CommitteeRole::Chair,
                },
                joined: at(9),
            },
        );
        assert!(state.my_committees.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_error_is_data() {
        let error = ApiError::unexpected(500, "/event");
        let state = reduce(&AppState::default(), &Action::SetError(Some(error.clone())));
        assert_eq!(state.error, Some(error));
        let state = reduce(&state, &Action::SetError(None));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_delete_user_clears_profile() {
        let state = AppState {
            users: Some(Arc::new(vec![user("u1"), user("u2")])),
            profile: Some(Arc::new(user("u2"))),
            profile_committees: Some(Arc::new(Vec::new())),
            ..AppState::default()
        };
        let state = reduce(&state, &Action::DeleteUser { user_id: "u2".into() });
        assert_eq!(state.users.as_ref().unwrap().len(), 1);
        assert!(state.profile.is_none());
    }

    #[test]
    fn test_edits_bump_revisions_and_fetches_do_not() {
        let start = AppState::default();

        let fetched = reduce(&start, &Action::SetEvents(Arc::new(vec![event("1")])));
        assert!(fetched.revisions.changed_since(&start.revisions).is_empty());

        let edited = reduce(&fetched, &Action::DeleteEvent { event_id: "1".into() });
        let changed = edited.revisions.changed_since(&fetched.revisions);
        assert!(changed.contains(Resource::Events));
        assert!(!changed.contains(Resource::Locations));

        let logged_in = reduce(&edited, &Action::Login(Arc::new(user("u1"))));
        let changed = logged_in.revisions.changed_since(&edited.revisions);
        assert!(changed.contains(Resource::Session));
        assert!(changed.contains(Resource::Events));
        assert!(!changed.contains(Resource::Committees));

        let invalidated = reduce(&logged_in, &Action::Invalidate(Resource::Locations));
        assert_eq!(
            invalidated.revisions.changed_since(&logged_in.revisions),
            ResourceSet::empty().with(Resource::Locations)
        );
    }
}
