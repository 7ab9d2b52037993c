//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use member_portal::api::{Api, ApiError, ApiResult};
use member_portal::middleware::MiddlewareChain;
use member_portal::navigation::{MemoryHistory, Navigator};
use member_portal::routing::{default_routes, Router};
use member_portal::state::{AppState, Store};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Programmable backend keyed by `"METHOD /path"`.
///
/// Unconfigured calls answer `404`. A gated call records itself, then waits
/// until the gate is opened.
#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<String, ApiResult<Option<Value>>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, call: &str, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(call.to_string(), Ok(Some(body)));
    }

    pub fn fail(&self, call: &str, error: ApiError) {
        self.replies.lock().unwrap().insert(call.to_string(), Err(error));
    }

    /// Hold the next `call` until the returned gate is notified. Later
    /// calls pass straight through.
    pub fn gate(&self, call: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(call.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Wait until `call` has been issued at least once.
    pub async fn wait_for(&self, call: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.count(call) == 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("call was never issued");
    }
}

#[async_trait]
impl Api for MockApi {
    async fn request(
        &self,
        method: Method,
        path: &str,
        _body: Option<Value>,
    ) -> ApiResult<Option<Value>> {
        let call = format!("{method} {path}");
        self.calls.lock().unwrap().push(call.clone());

        let gate = self.gates.lock().unwrap().remove(&call);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .get(&call)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::new("Not Found", 404, format!("URL: {path}"))))
    }
}

pub fn user_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "firstName": "Test",
        "lastName": id,
        "email": format!("{id}@example.org"),
        "status": status
    })
}

/// An event open to everyone, so its registrations are always visible.
pub fn event_json(id: &str) -> Value {
    json!({
        "id": id,
        "registrationCount": 0,
        "waitingListCount": 0,
        "name": {"en": format!("Event {id}"), "nl": format!("Activiteit {id}")},
        "requiredMembershipStatus": ["nonMember", "member"]
    })
}

/// Backend with an anonymous visitor and the given events.
pub fn anonymous_backend(event_ids: &[&str]) -> Arc<MockApi> {
    let api = MockApi::new();
    api.fail("GET /whoami", ApiError::new("Unauthorized", 401, "URL: /whoami"));
    api.reply(
        "GET /event",
        Value::Array(event_ids.iter().map(|id| event_json(id)).collect()),
    );
    api.reply("GET /location", json!([]));
    api.reply("GET /committee", json!([]));
    for id in event_ids {
        api.reply(&format!("GET /event/{id}/registration"), json!([]));
    }
    api
}

/// Navigator over the built-in route table.
pub fn navigator(api: Arc<MockApi>, initial: AppState, start: &str) -> (Arc<Navigator>, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::new(start));
    let navigator = Navigator::new(
        Arc::new(Router::compile(&default_routes()).unwrap()),
        Arc::new(Store::new(initial)),
        api,
        Arc::new(MiddlewareChain::standard()),
        history.clone(),
    );
    (Arc::new(navigator), history)
}

/// Serve `app` on an ephemeral local port.
pub async fn start_mock_backend(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
