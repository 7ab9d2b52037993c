//! Resource categories and invalidation signals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A category of cached data. Invalidation works per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Session,
    Events,
    Registrations,
    UserEventRegistrations,
    Locations,
    Committees,
    MyCommittees,
    CommitteeMembers,
    Users,
    Profile,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Session,
        Resource::Events,
        Resource::Registrations,
        Resource::UserEventRegistrations,
        Resource::Locations,
        Resource::Committees,
        Resource::MyCommittees,
        Resource::CommitteeMembers,
        Resource::Users,
        Resource::Profile,
    ];

    /// Caches whose content depends on who is logged in.
    pub const IDENTITY_DEPENDENT: [Resource; 7] = [
        Resource::Events,
        Resource::Registrations,
        Resource::UserEventRegistrations,
        Resource::Users,
        Resource::CommitteeMembers,
        Resource::MyCommittees,
        Resource::Profile,
    ];

    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Session => "session",
            Resource::Events => "events",
            Resource::Registrations => "registrations",
            Resource::UserEventRegistrations => "user_event_registrations",
            Resource::Locations => "locations",
            Resource::Committees => "committees",
            Resource::MyCommittees => "my_committees",
            Resource::CommitteeMembers => "committee_members",
            Resource::Users => "users",
            Resource::Profile => "profile",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of resource categories carrying an invalidation signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceSet(u16);

impl ResourceSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, resource: Resource) -> bool {
        self.0 & resource.bit() != 0
    }

    #[must_use]
    pub fn with(self, resource: Resource) -> Self {
        Self(self.0 | resource.bit())
    }

    #[must_use]
    pub fn without(self, resource: Resource) -> Self {
        Self(self.0 & !resource.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Resource> {
        Resource::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Serialize for ResourceSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Per-category change counters.
///
/// Bumped by every transition that edits or invalidates a category outside
/// of a fetch. Two snapshots' counters tell which categories moved between
/// them, so a fetch started against the older one can be recognised as
/// outdated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Revisions([u32; Resource::ALL.len()]);

impl Revisions {
    pub fn get(&self, resource: Resource) -> u32 {
        self.0[resource as usize]
    }

    #[must_use]
    pub fn bump(mut self, resources: ResourceSet) -> Self {
        for r in resources.iter() {
            self.0[r as usize] = self.0[r as usize].wrapping_add(1);
        }
        self
    }

    /// Categories whose counter differs from `earlier`.
    pub fn changed_since(&self, earlier: &Revisions) -> ResourceSet {
        Resource::ALL
            .into_iter()
            .filter(|r| self.get(*r) != earlier.get(*r))
            .collect()
    }
}
