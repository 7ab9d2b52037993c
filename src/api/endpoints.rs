//! Typed backend endpoints.
//!
//! Thin wrappers over [`Api::request`] that fix the path and method of each
//! call and decode the JSON body into wire types.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::client::Api;
use crate::api::error::{ApiError, ApiResult};
use crate::state::model::{
    Committee, CommitteeContent, CommitteeMember, Credentials, Event, EventContent, Location,
    NewRegistration, Registration, RegistrationUpdate, SignupForm, User, UserCommittee,
};

async fn fetch<T: DeserializeOwned>(
    api: &dyn Api,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> ApiResult<T> {
    let value = api
        .request(method, path, body)
        .await?
        .ok_or_else(|| ApiError::parse(204))?;
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(path = %path, error = %e, "Response body did not match wire type");
        ApiError::parse(200)
    })
}

async fn send(api: &dyn Api, method: Method, path: &str, body: Option<Value>) -> ApiResult<()> {
    api.request(method, path, body).await.map(|_| ())
}

fn encode<B: Serialize>(body: &B) -> ApiResult<Option<Value>> {
    serde_json::to_value(body).map(Some).map_err(ApiError::encode)
}

// Session

/// The logged-in user, or `None` when the backend answers `401`.
pub async fn whoami(api: &dyn Api) -> ApiResult<Option<User>> {
    match fetch(api, Method::GET, "/whoami", None).await {
        Ok(user) => Ok(Some(user)),
        Err(e) if e.is_unauthorized() => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn login(api: &dyn Api, credentials: &Credentials) -> ApiResult<()> {
    send(api, Method::POST, "/login", encode(credentials)?).await
}

pub async fn logout(api: &dyn Api) -> ApiResult<()> {
    send(api, Method::GET, "/logout", None).await
}

pub async fn signup(api: &dyn Api, form: &SignupForm) -> ApiResult<()> {
    send(api, Method::POST, "/register", encode(form)?).await
}

// Events

pub async fn events(api: &dyn Api) -> ApiResult<Vec<Event>> {
    fetch(api, Method::GET, "/event", None).await
}

pub async fn create_event(api: &dyn Api, content: &EventContent) -> ApiResult<Event> {
    fetch(api, Method::POST, "/event", encode(content)?).await
}

pub async fn update_event(
    api: &dyn Api,
    event_id: &str,
    content: &EventContent,
) -> ApiResult<Event> {
    fetch(api, Method::PUT, &format!("/event/{event_id}"), encode(content)?).await
}

pub async fn delete_event(api: &dyn Api, event_id: &str) -> ApiResult<()> {
    send(api, Method::DELETE, &format!("/event/{event_id}"), None).await
}

pub async fn locations(api: &dyn Api) -> ApiResult<Vec<Location>> {
    fetch(api, Method::GET, "/location", None).await
}

// Registrations

pub async fn event_registrations(api: &dyn Api, event_id: &str) -> ApiResult<Vec<Registration>> {
    fetch(api, Method::GET, &format!("/event/{event_id}/registration"), None).await
}

pub async fn user_event_registrations(
    api: &dyn Api,
    user_id: &str,
) -> ApiResult<Vec<Registration>> {
    fetch(api, Method::GET, &format!("/user/{user_id}/event_registrations"), None).await
}

pub async fn create_registration(
    api: &dyn Api,
    event_id: &str,
    registration: &NewRegistration,
) -> ApiResult<Registration> {
    let path = format!("/event/{event_id}/registration");
    fetch(api, Method::POST, &path, encode(registration)?).await
}

pub async fn update_registration(
    api: &dyn Api,
    event_id: &str,
    registration_id: &str,
    update: &RegistrationUpdate,
) -> ApiResult<Registration> {
    let path = format!("/event/{event_id}/registration/{registration_id}");
    fetch(api, Method::PUT, &path, encode(update)?).await
}

pub async fn delete_registration(
    api: &dyn Api,
    event_id: &str,
    registration_id: &str,
) -> ApiResult<()> {
    let path = format!("/event/{event_id}/registration/{registration_id}");
    send(api, Method::DELETE, &path, None).await
}

// Committees

pub async fn committees(api: &dyn Api) -> ApiResult<Vec<Committee>> {
    fetch(api, Method::GET, "/committee", None).await
}

pub async fn user_committees(api: &dyn Api, user_id: &str) -> ApiResult<Vec<UserCommittee>> {
    fetch(api, Method::GET, &format!("/user/{user_id}/committees"), None).await
}

pub async fn committee_members(
    api: &dyn Api,
    committee_id: &str,
) -> ApiResult<Vec<CommitteeMember>> {
    fetch(api, Method::GET, &format!("/committee/{committee_id}/members"), None).await
}

pub async fn create_committee(api: &dyn Api, content: &CommitteeContent) -> ApiResult<Committee> {
    fetch(api, Method::POST, "/committee", encode(content)?).await
}

pub async fn update_committee(
    api: &dyn Api,
    committee_id: &str,
    content: &CommitteeContent,
) -> ApiResult<Committee> {
    let path = format!("/committee/{committee_id}");
    fetch(api, Method::PUT, &path, encode(content)?).await
}

pub async fn delete_committee(api: &dyn Api, committee_id: &str) -> ApiResult<()> {
    send(api, Method::DELETE, &format!("/committee/{committee_id}"), None).await
}

pub async fn add_committee_member(
    api: &dyn Api,
    committee_id: &str,
    user_id: &str,
) -> ApiResult<()> {
    let path = format!("/committee/{committee_id}/members/{user_id}");
    send(api, Method::POST, &path, None).await
}

pub async fn remove_committee_member(
    api: &dyn Api,
    committee_id: &str,
    user_id: &str,
) -> ApiResult<()> {
    let path = format!("/committee/{committee_id}/members/{user_id}");
    send(api, Method::DELETE, &path, None).await
}

// Users

pub async fn users(api: &dyn Api) -> ApiResult<Vec<User>> {
    fetch(api, Method::GET, "/user", None).await
}

pub async fn user(api: &dyn Api, user_id: &str) -> ApiResult<User> {
    fetch(api, Method::GET, &format!("/user/{user_id}"), None).await
}

pub async fn delete_user(api: &dyn Api, user_id: &str) -> ApiResult<()> {
    send(api, Method::DELETE, &format!("/user/{user_id}"), None).await
}
