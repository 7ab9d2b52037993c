//! Wire types exchanged with the association backend.
//!
//! All types use camelCase JSON. Identifiers are opaque strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text in both site languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub en: String,
    pub nl: String,
}

/// Membership status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipStatus {
    Pending,
    Member,
    Affiliated,
    Extraordinary,
    NonMember,
    Donor,
}

impl MembershipStatus {
    /// Whether this status grants access to member-only data.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Member | Self::Affiliated | Self::Extraordinary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infix: Option<String>,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub status: MembershipStatus,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Display name with optional infix, e.g. "Jan van Dijk".
    pub fn full_name(&self) -> String {
        match &self.infix {
            Some(infix) => format!("{} {} {}", self.first_name, infix, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDate {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    #[default]
    Activity,
    Course,
    Weekend,
    Training,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    ShortText,
    LongText,
    Number,
    Time,
    MultipleChoice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: Localized,
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
}

/// The editable part of an event, sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContent {
    pub name: Localized,
    #[serde(default)]
    pub description: Localized,
    #[serde(default)]
    pub dates: Vec<EventDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_period: Option<EventDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_list_max: Option<u32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub required_membership_status: Vec<MembershipStatus>,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub registration_count: u32,
    #[serde(default)]
    pub waiting_list_count: u32,
    #[serde(flatten)]
    pub content: EventContent,
}

impl Event {
    /// Whether `session_status` may see this event's registrations.
    ///
    /// `None` stands for an anonymous visitor.
    pub fn is_visible_to(&self, session_status: Option<MembershipStatus>) -> bool {
        let required = &self.content.required_membership_status;
        required.contains(&MembershipStatus::NonMember)
            || session_status.is_some_and(|status| required.contains(&status))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infix: Option<String>,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_list_position: Option<u32>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl Registration {
    pub fn is_waiting(&self) -> bool {
        self.waiting_list_position.is_some()
    }
}

/// Body of a new registration. `user_id` registers someone else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationUpdate {
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_list_position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name_nl: String,
    pub name_en: String,
    #[serde(default)]
    pub reusable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeContent {
    pub name: Localized,
    #[serde(default)]
    pub description: Localized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub content: CommitteeContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitteeRole {
    Chair,
    Member,
}

/// A user's membership of one committee, past or present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCommittee {
    pub user_id: String,
    pub committee_id: String,
    pub role: CommitteeRole,
    pub joined: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<DateTime<Utc>>,
}

impl UserCommittee {
    pub fn is_active(&self) -> bool {
        self.left.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeMember {
    #[serde(flatten)]
    pub user: User,
    pub role: CommitteeRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup form sent to `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infix: Option<String>,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub status: MembershipStatus,
}
