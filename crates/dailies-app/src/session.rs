//! Session gate: start-up probe, login and logout.

use dailies_client::{ApiError, Credentials};
use dailies_core::User;
use tracing::{debug, info, instrument, warn};

use crate::controller::AppController;
use crate::state::{Slot, Ticket, View};

/// Shown when a login fails without a usable message.
pub const LOGIN_FALLBACK_MESSAGE: &str = "login failed";

impl AppController {
    /// Start-up: report a configuration error, or probe the session and load
    /// reference data concurrently. A signed-in session moves to
    /// [`View::App`] and loads projects; a failed probe is silent.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let Some(client) = self.client() else {
            let message = self
                .config_error()
                .map(ToString::to_string)
                .unwrap_or_default();
            warn!(error = %message, "configuration error, not starting");
            self.with(|inner| inner.state.config_error = Some(message));
            return;
        };

        let ticket = self.issue(Slot::Session);
        let (me, ()) = tokio::join!(client.me(), self.load_reference_set());

        match me {
            Ok(Some(user)) => {
                if self.sign_in(ticket, user) {
                    self.load_projects().await;
                }
            }
            Ok(None) => debug!("no active session"),
            Err(error) => debug!(%error, "session probe failed, treating as signed out"),
        }
    }

    /// Send credentials, then re-probe the session. On failure `error` holds
    /// the server's message (or [`LOGIN_FALLBACK_MESSAGE`]) and the view is
    /// unchanged. Ignored while another login is in flight.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) {
        let Some(client) = self.client() else {
            let message = self.config_error().map(ToString::to_string);
            self.with(|inner| inner.state.error = message);
            return;
        };

        let ticket = self.with(|inner| {
            if inner.state.loading {
                return None;
            }
            inner.state.loading = true;
            inner.state.error = None;
            Some(inner.generations.issue(Slot::Session))
        });
        let Some(ticket) = ticket else {
            debug!("login already in flight, ignoring");
            return;
        };

        let outcome: Result<Option<User>, ApiError> = async {
            client.login(credentials).await?;
            client.me().await
        }
        .await;

        match outcome {
            Ok(Some(user)) => {
                if self.sign_in(ticket, user) {
                    let need_reference = self.with(|inner| inner.state.reference.is_empty());
                    if need_reference {
                        self.load_reference_set().await;
                    }
                    self.load_projects().await;
                }
            }
            Ok(None) => debug!("login accepted but no session user"),
            Err(error) => {
                warn!(%error, category = error.category(), "login failed");
                let message = error
                    .user_message()
                    .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_owned());
                let _ = self.apply(ticket, |state| state.error = Some(message));
            }
        }

        self.with(|inner| inner.state.loading = false);
    }

    /// Tell the server (failure ignored), then clear the session and every
    /// piece of state that belongs to it. Responses to requests issued before
    /// this call are discarded.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Some(client) = self.client() {
            if let Err(error) = client.logout().await {
                debug!(%error, "logout request failed, clearing session anyway");
            }
        }

        self.with(|inner| {
            inner.generations.invalidate_all();
            inner.state.clear_session();
        });
        info!("signed out");
    }

    fn sign_in(&self, ticket: Ticket, user: User) -> bool {
        let username = user.username.clone();
        let applied = self.apply(ticket, |state| {
            state.user = Some(user);
            state.view = View::App;
        });
        if applied {
            info!(%username, "signed in");
        }
        applied
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedTransport, controller, project_json, user_json};
    use dailies_logging::capture_logs;
    use dailies_settings::ConfigError;
    use serde_json::json;
    use tracing::Level;

    const POST: &str = "POST";

    #[tokio::test]
    async fn config_error_halts_without_requests() {
        let ctrl = AppController::new(Err(ConfigError::MissingApiConfig));
        ctrl.initialize().await;
        let state = ctrl.snapshot();
        assert!(state.config_error.is_some());
        assert_eq!(state.view, View::Login);

        ctrl.login(&Credentials::new("ana", "pw")).await;
        let state = ctrl.snapshot();
        assert_eq!(state.error, state.config_error);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn initialize_with_session_loads_projects() {
        let transport = ScriptedTransport::new()
            .on("GET", "/me", Reply::json(user_json(1, "ana")))
            .on("GET", "/sets", Reply::json(json!({"stages": ["comp"], "statuses": ["完成"]})))
            .on("GET", "/projects", Reply::json(json!([project_json(3, "Nova")])));
        let ctrl = controller(&transport);

        ctrl.initialize().await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::App);
        assert_eq!(state.user.unwrap().username, "ana");
        assert_eq!(state.reference.stages, vec!["comp"]);
        assert_eq!(state.projects.len(), 1);
    }

    #[tokio::test]
    async fn failed_probe_is_silent() {
        let transport = ScriptedTransport::new()
            .on("GET", "/me", Reply::status(401, "not signed in"))
            .on("GET", "/sets", Reply::json(json!({"stages": [], "statuses": []})));
        let ctrl = controller(&transport);

        ctrl.initialize().await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::Login);
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        assert_eq!(transport.count("GET", "/projects"), 0);
    }

    #[tokio::test]
    async fn login_failure_shows_server_message() {
        let transport = ScriptedTransport::new()
            .on(POST, "/auth/login", Reply::status(401, "用户名或密码错误"));
        let ctrl = controller(&transport);
        let (logs, _guard) = capture_logs();

        ctrl.login(&Credentials::new("ana", "bad")).await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::Login);
        assert_eq!(state.error.as_deref(), Some("用户名或密码错误"));
        assert!(!state.loading);
        assert!(logs.has_event(Level::WARN, "login failed"));
    }

    #[tokio::test]
    async fn login_failure_without_message_uses_fallback() {
        let transport =
            ScriptedTransport::new().on(POST, "/auth/login", Reply::Fail(String::new()));
        let ctrl = controller(&transport);

        ctrl.login(&Credentials::new("ana", "pw")).await;

        assert_eq!(
            ctrl.snapshot().error.as_deref(),
            Some(LOGIN_FALLBACK_MESSAGE)
        );
    }

    #[tokio::test]
    async fn login_success_reloads_missing_reference_data() {
        let transport = ScriptedTransport::new()
            .on(POST, "/auth/login", Reply::json(json!({"ok": true})))
            .on("GET", "/me", Reply::json(user_json(2, "bo")))
            .on("GET", "/sets", Reply::json(json!({"stages": ["anim"], "statuses": []})))
            .on("GET", "/projects", Reply::json(json!([])));
        let ctrl = controller(&transport);

        ctrl.login(&Credentials::new("bo", "pw")).await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::App);
        assert_eq!(state.reference.stages, vec!["anim"]);
        assert_eq!(transport.count("GET", "/projects"), 1);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn concurrent_login_is_ignored() {
        let (gate, reply) = Reply::json(json!({"ok": true})).gated();
        let transport = ScriptedTransport::new()
            .on(POST, "/auth/login", reply)
            .on("GET", "/me", Reply::json(user_json(1, "ana")))
            .on("GET", "/sets", Reply::json(json!({"stages": ["comp"], "statuses": []})))
            .on("GET", "/projects", Reply::json(json!([])));
        let ctrl = controller(&transport);
        let creds = Credentials::new("ana", "pw");

        let first = ctrl.login(&creds);
        tokio::pin!(first);
        assert!(futures::poll!(&mut first).is_pending());
        assert!(ctrl.snapshot().loading);

        ctrl.login(&creds).await;
        assert_eq!(transport.count(POST, "/auth/login"), 1);

        gate.open();
        first.await;
        assert_eq!(ctrl.snapshot().view, View::App);
        assert!(!ctrl.snapshot().loading);
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_fails() {
        let transport = ScriptedTransport::new()
            .on("GET", "/me", Reply::json(user_json(1, "ana")))
            .on("GET", "/sets", Reply::json(json!({"stages": ["comp"], "statuses": []})))
            .on("GET", "/projects", Reply::json(json!([project_json(3, "Nova")])))
            .on(POST, "/auth/logout", Reply::status(500, ""));
        let ctrl = controller(&transport);
        ctrl.initialize().await;
        ctrl.set_comment_draft("half-written");

        ctrl.logout().await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::Login);
        assert!(state.user.is_none());
        assert!(state.projects.is_empty());
        assert!(state.comment_draft.is_empty());
        assert_eq!(state.reference.stages, vec!["comp"]);
    }

    #[tokio::test]
    async fn login_resolving_after_logout_does_not_sign_in() {
        let (gate, accepted) = Reply::json(json!({"ok": true})).gated();
        let transport = ScriptedTransport::new()
            .on(POST, "/auth/login", accepted)
            .on("GET", "/me", Reply::json(user_json(1, "ana")))
            .on("GET", "/projects", Reply::json(json!([project_json(3, "Nova")])))
            .on(POST, "/auth/logout", Reply::no_content());
        let ctrl = controller(&transport);
        let (logs, _guard) = capture_logs();

        let creds = Credentials::new("ana", "pw");
        let login = ctrl.login(&creds);
        tokio::pin!(login);
        assert!(futures::poll!(&mut login).is_pending());

        ctrl.logout().await;
        gate.open();
        login.await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::Login);
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert_eq!(transport.count("GET", "/projects"), 0);
        assert!(logs.has_event_with(Level::DEBUG, "discarding stale response", ("slot", "Session")));
    }

    #[tokio::test]
    async fn logout_discards_in_flight_project_listing() {
        let (gate, projects) = Reply::json(json!([project_json(3, "Nova")])).gated();
        let transport = ScriptedTransport::new()
            .on("GET", "/me", Reply::json(user_json(1, "ana")))
            .on("GET", "/sets", Reply::json(json!({"stages": [], "statuses": []})))
            .on("GET", "/projects", projects)
            .on(POST, "/auth/logout", Reply::no_content());
        let ctrl = controller(&transport);

        let init = ctrl.initialize();
        tokio::pin!(init);
        assert!(futures::poll!(&mut init).is_pending());
        assert_eq!(ctrl.snapshot().view, View::App);

        ctrl.logout().await;
        gate.open();
        init.await;

        let state = ctrl.snapshot();
        assert_eq!(state.view, View::Login);
        assert!(state.projects.is_empty());
    }
}
