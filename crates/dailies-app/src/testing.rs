//! Scripted in-memory transport for controller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use dailies_client::{ApiClient, ApiError, ApiRequest, ApiResponse, Transport};
use dailies_core::{Role, User, UserId};
use dailies_settings::ApiConfig;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use crate::controller::AppController;
use crate::state::View;

/// Holds a reply until [`Gate::open`] is called.
#[derive(Clone)]
pub(crate) struct Gate(Arc<Semaphore>);

impl Gate {
    pub(crate) fn open(&self) {
        self.0.add_permits(1);
    }
}

/// Pre-programmed reply for one route.
#[derive(Clone)]
pub(crate) enum Reply {
    Respond(ApiResponse),
    /// Transport-level failure with the given message.
    Fail(String),
    Gated(Gate, Box<Reply>),
}

impl Reply {
    pub(crate) fn json(value: Value) -> Self {
        Self::Respond(ApiResponse::json(value.to_string()))
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Self::Respond(ApiResponse::text(status, body))
    }

    pub(crate) fn no_content() -> Self {
        Self::Respond(ApiResponse::no_content())
    }

    /// Wrap this reply so it is only delivered once the gate opens.
    pub(crate) fn gated(self) -> (Gate, Self) {
        let gate = Gate(Arc::new(Semaphore::new(0)));
        (gate.clone(), Self::Gated(gate, Box::new(self)))
    }
}

type Route = (String, String);

#[derive(Default)]
struct Script {
    routes: HashMap<Route, VecDeque<Reply>>,
    seen: Vec<ApiRequest>,
}

/// Replies per `(method, path)`, consumed in order; the last one repeats.
/// Unscripted routes answer 404.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(self, method: &str, path: &str, reply: Reply) -> Self {
        self.script
            .lock()
            .routes
            .entry((method.to_owned(), path.to_owned()))
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn replace(&self, method: &str, path: &str, reply: Reply) {
        let _ = self
            .script
            .lock()
            .routes
            .insert((method.to_owned(), path.to_owned()), VecDeque::from([reply]));
    }

    pub(crate) fn count(&self, method: &str, path: &str) -> usize {
        self.script
            .lock()
            .seen
            .iter()
            .filter(|r| r.method.as_str() == method && r.url.path() == path)
            .count()
    }

    pub(crate) fn total(&self) -> usize {
        self.script.lock().seen.len()
    }

    pub(crate) fn last_query(&self, path: &str) -> Option<String> {
        self.last_to(path)
            .and_then(|r| r.url.query().map(ToOwned::to_owned))
    }

    pub(crate) fn last_body(&self, path: &str) -> Option<String> {
        self.last_to(path).and_then(|r| r.body)
    }

    fn last_to(&self, path: &str) -> Option<ApiRequest> {
        self.script
            .lock()
            .seen
            .iter()
            .rev()
            .find(|r| r.url.path() == path)
            .cloned()
    }

    fn next_reply(&self, request: ApiRequest) -> Option<Reply> {
        let mut script = self.script.lock();
        let key = (request.method.as_str().to_owned(), request.url.path().to_owned());
        script.seen.push(request);
        let queue = script.routes.get_mut(&key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut reply = self
            .next_reply(request)
            .unwrap_or_else(|| Reply::status(404, "no route"));
        loop {
            match reply {
                Reply::Respond(response) => return Ok(response),
                Reply::Fail(message) => return Err(ApiError::Other { message }),
                Reply::Gated(gate, inner) => {
                    let permit = gate.0.acquire().await.unwrap();
                    permit.forget();
                    gate.open();
                    reply = *inner;
                }
            }
        }
    }
}

/// Controller talking to `transport` at `http://tracker.test` with no prefix.
pub(crate) fn controller(transport: &ScriptedTransport) -> AppController {
    let config = ApiConfig::new("http://tracker.test", "/").unwrap();
    AppController::new(Ok(ApiClient::new(Arc::new(transport.clone()), config)))
}

/// Mark the controller signed in without going through login.
pub(crate) fn signed_in(ctrl: &AppController) {
    ctrl.with(|inner| {
        inner.state.user = Some(User {
            id: UserId::new(1),
            username: "ana".into(),
            nickname: None,
            role: Role::Producer,
        });
        inner.state.view = View::App;
    });
}

pub(crate) fn user_json(id: i64, username: &str) -> Value {
    json!({"id": id, "username": username, "role": "Artist"})
}

pub(crate) fn project_json(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name, "description": null, "archived": false})
}

pub(crate) fn task_json(id: i64, shot: &str) -> Value {
    json!({
        "id": id,
        "shotNo": shot,
        "title": format!("{shot} comp"),
        "stage": "comp",
        "status": "进行中",
        "assignee": user_json(9, "kai"),
        "dueDate": "2024-02-01",
        "updatedAt": "2024-01-15T09:00:00Z"
    })
}

pub(crate) fn version_json(no: i64, created_at: &str) -> Value {
    json!({"versionNo": no, "createdAt": created_at})
}

pub(crate) fn comment_json(id: i64, content: &str) -> Value {
    json!({
        "id": id,
        "author": user_json(2, "bo"),
        "content": content,
        "createdAt": "2024-01-16T10:00:00Z"
    })
}
