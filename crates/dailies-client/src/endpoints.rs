//! Typed wrappers for each tracker endpoint.

use dailies_core::{
    Comment, Project, ProjectId, ReferenceSet, SearchHit, Task, TaskId, User, Version,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;

/// Login credentials. The password never appears in `Debug` output.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: SecretString,
}

impl Credentials {
    /// Build credentials from plain strings.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Server-side task listing filters. Empty values mean "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilters {
    /// Free-text match.
    pub q: String,
    /// Stage label.
    pub stage: String,
    /// Status label.
    pub status: String,
}

impl TaskFilters {
    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.q.is_empty() && self.stage.is_empty() && self.status.is_empty()
    }
}

impl ApiClient {
    /// `GET /me`. `None` when the server answers `null`.
    pub async fn me(&self) -> Result<Option<User>, ApiError> {
        self.get_json("/me", &[]).await
    }

    /// `POST /auth/login` with `{username, password}`. The response body is
    /// ignored; the session cookie is what matters.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });
        let _ = self
            .request("/auth/login", RequestOptions::post_json(&body)?, &[])
            .await?;
        Ok(())
    }

    /// `POST /auth/logout`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let _ = self
            .request("/auth/logout", RequestOptions::post(), &[])
            .await?;
        Ok(())
    }

    /// `GET /sets`.
    pub async fn reference_set(&self) -> Result<ReferenceSet, ApiError> {
        self.get_json("/sets", &[]).await
    }

    /// `GET /projects?q=`.
    pub async fn projects(&self, query: &str) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects", &[("q", query)]).await
    }

    /// `GET /projects/{id}/tasks?q&stage&status`.
    pub async fn tasks(
        &self,
        project: ProjectId,
        filters: &TaskFilters,
    ) -> Result<Vec<Task>, ApiError> {
        let query = [
            ("q", filters.q.as_str()),
            ("stage", filters.stage.as_str()),
            ("status", filters.status.as_str()),
        ];
        self.get_json(&format!("/projects/{project}/tasks"), &query)
            .await
    }

    /// `GET /tasks/{id}`.
    pub async fn task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.get_json(&format!("/tasks/{id}"), &[]).await
    }

    /// `GET /tasks/{id}/versions`, ascending by creation.
    pub async fn versions(&self, id: TaskId) -> Result<Vec<Version>, ApiError> {
        self.get_json(&format!("/tasks/{id}/versions"), &[]).await
    }

    /// `GET /tasks/{id}/comments`.
    pub async fn comments(&self, id: TaskId) -> Result<Vec<Comment>, ApiError> {
        self.get_json(&format!("/tasks/{id}/comments"), &[]).await
    }

    /// `POST /tasks/{id}/comments` with `{content}`. The created comment is
    /// not returned; callers reload the listing.
    pub async fn post_comment(&self, id: TaskId, content: &str) -> Result<(), ApiError> {
        let options = RequestOptions::post_json(&json!({ "content": content }))?;
        let _ = self
            .request(&format!("/tasks/{id}/comments"), options, &[])
            .await?;
        Ok(())
    }

    /// `GET /search?q=`, flat hits in server order.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        self.get_json("/search", &[("q", query)]).await
    }

    /// Navigable URL of a version's download. Nothing is fetched.
    pub fn download_url(&self, task: TaskId, version_no: i64) -> Result<Url, ApiError> {
        self.build_url(&format!("/tasks/{task}/versions/{version_no}/download"), &[])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use crate::transport::{ApiRequest, ApiResponse, Transport};
    use async_trait::async_trait;
    use dailies_settings::ApiConfig;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<ApiRequest>>,
        reply: Mutex<Option<ApiResponse>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            Ok(self
                .reply
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(ApiResponse::no_content))
        }
    }

    fn setup(reply: Option<ApiResponse>) -> (Arc<Recorder>, ApiClient) {
        let rec = Arc::new(Recorder {
            reply: Mutex::new(reply),
            ..Recorder::default()
        });
        let cfg = ApiConfig::new("https://tracker.test", "/api").unwrap();
        (rec.clone(), ApiClient::new(rec, cfg))
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("ana", "hunter2");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("ana"));
        assert!(!dbg.contains("hunter2"));
    }

    #[tokio::test]
    async fn login_posts_username_and_password() {
        let (rec, client) = setup(None);
        client
            .login(&Credentials::new("ana", "hunter2"))
            .await
            .unwrap();
        let sent = rec.seen.lock().unwrap()[0].clone();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url.path(), "/api/auth/login");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"username": "ana", "password": "hunter2"}));
    }

    #[tokio::test]
    async fn me_accepts_null() {
        let (_rec, client) = setup(Some(ApiResponse::json("null")));
        assert_eq!(client.me().await.unwrap(), None);
    }

    #[tokio::test]
    async fn tasks_omit_empty_filters() {
        let (rec, client) = setup(Some(ApiResponse::json("[]")));
        let filters = TaskFilters {
            stage: "comp".into(),
            ..TaskFilters::default()
        };
        let tasks = client.tasks(ProjectId::new(4), &filters).await.unwrap();
        assert!(tasks.is_empty());
        let sent = rec.seen.lock().unwrap()[0].clone();
        assert_eq!(sent.url.path(), "/api/projects/4/tasks");
        assert_eq!(sent.url.query(), Some("stage=comp"));
    }

    #[tokio::test]
    async fn post_comment_sends_content() {
        let (rec, client) = setup(None);
        client.post_comment(TaskId::new(9), "looks good").await.unwrap();
        let sent = rec.seen.lock().unwrap()[0].clone();
        assert_eq!(sent.url.path(), "/api/tasks/9/comments");
        assert_eq!(sent.body.as_deref(), Some(r#"{"content":"looks good"}"#));
    }

    #[test]
    fn download_url_is_absolute() {
        let (rec, client) = setup(None);
        let url = client.download_url(TaskId::new(12), 3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://tracker.test/api/tasks/12/versions/3/download"
        );
        assert!(rec.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn filters_emptiness() {
        assert!(TaskFilters::default().is_empty());
        let f = TaskFilters {
            q: "hero".into(),
            ..TaskFilters::default()
        };
        assert!(!f.is_empty());
    }
}
