//! Project → task → (versions, comments) selection chain.
//!
//! Every load issues a ticket for its slot before suspending and applies the
//! response only if the ticket is still current. Selecting a parent clears
//! and invalidates its children in the same lock section, so nothing issued
//! for the old parent can land afterwards.

use dailies_client::TaskFilters;
use dailies_core::{ProjectId, TaskId, Version};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::controller::AppController;
use crate::state::{Slot, Ticket};

impl AppController {
    /// Replace the project name filter and reload projects.
    pub async fn set_project_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.with(|inner| inner.state.project_query = query);
        self.load_projects().await;
    }

    /// Fetch the project listing for the current query. Does nothing while
    /// signed out; failure empties the listing.
    #[instrument(skip(self))]
    pub async fn load_projects(&self) {
        let Some(client) = self.client() else {
            return;
        };
        let issued = self.with(|inner| {
            inner.state.user.as_ref()?;
            let ticket = inner.generations.issue(Slot::Projects);
            Some((ticket, inner.state.project_query.clone()))
        });
        let Some((ticket, query)) = issued else {
            debug!("not signed in, skipping project load");
            return;
        };

        let projects = client.projects(&query).await.unwrap_or_else(|error| {
            warn!(%error, %query, "project load failed");
            Vec::new()
        });
        let _ = self.apply(ticket, |state| state.projects = projects);
    }

    /// Select a project: clear the selected task, its versions and comments
    /// (and the old task listing) immediately, then load the new task listing.
    #[instrument(skip(self))]
    pub async fn select_project(&self, id: ProjectId) {
        self.enter_project(id);
        info!(project_id = %id, "project selected");
        self.load_tasks().await;
    }

    /// Point the selection at `id` and drop everything scoped to the previous
    /// project. A listing already in flight for it can no longer land.
    fn enter_project(&self, id: ProjectId) {
        self.with(|inner| {
            inner.state.selected_project_id = Some(id);
            inner.state.tasks.clear();
            inner.state.clear_task();
            inner.generations.invalidate(&[Slot::Tasks]);
            inner.generations.invalidate(&Slot::TASK_SCOPED);
        });
    }

    /// Replace the task filters and reload the task listing.
    pub async fn set_task_filters(&self, filters: TaskFilters) {
        self.with(|inner| inner.state.filters = filters);
        self.load_tasks().await;
    }

    /// Fetch the task listing of the selected project with the current
    /// filters. No project selected: empty listing, no request.
    #[instrument(skip(self))]
    pub async fn load_tasks(&self) {
        let issued = self.with(|inner| {
            let ticket = inner.generations.issue(Slot::Tasks);
            match inner.state.selected_project_id {
                Some(project) => Some((ticket, project, inner.state.filters.clone())),
                None => {
                    inner.state.tasks.clear();
                    None
                }
            }
        });
        let Some((ticket, project, filters)) = issued else {
            return;
        };
        let Some(client) = self.client() else {
            return;
        };

        let tasks = client.tasks(project, &filters).await.unwrap_or_else(|error| {
            warn!(%error, project_id = %project, "task load failed");
            Vec::new()
        });
        let _ = self.apply(ticket, |state| state.tasks = tasks);
    }

    /// Fetch a task's full record, then resynchronize its versions and
    /// comments. The previous task's versions and comments are dropped
    /// immediately, and so is the task itself when `id` names another one.
    /// A failed fetch leaves no task selected (and empty children).
    #[instrument(skip(self))]
    pub async fn select_task(&self, id: TaskId) {
        let Some(client) = self.client() else {
            return;
        };
        let ticket = self.with(|inner| {
            let state = &mut inner.state;
            if state.selected_task.as_ref().is_some_and(|t| t.id != id) {
                state.selected_task = None;
            }
            state.versions.clear();
            state.comments.clear();
            inner.generations.invalidate(&[Slot::Versions, Slot::Comments]);
            inner.generations.issue(Slot::TaskDetail)
        });

        let task = match client.task(id).await {
            Ok(task) => Some(task),
            Err(error) => {
                warn!(%error, task_id = %id, "task load failed");
                None
            }
        };
        if !self.apply(ticket, |state| state.selected_task = task) {
            return;
        }

        self.load_versions().await;
        self.load_comments().await;
    }

    /// Fetch the selected task's versions. No task: empty, no request.
    #[instrument(skip(self))]
    pub async fn load_versions(&self) {
        let Some((ticket, task)) = self.issue_for_task(Slot::Versions) else {
            return;
        };
        let Some(client) = self.client() else {
            return;
        };

        let versions = client.versions(task).await.unwrap_or_else(|error| {
            warn!(%error, task_id = %task, "version load failed");
            Vec::new()
        });
        let _ = self.apply(ticket, |state| state.versions = versions);
    }

    /// Fetch the selected task's comments. No task: empty, no request.
    #[instrument(skip(self))]
    pub async fn load_comments(&self) {
        let Some((ticket, task)) = self.issue_for_task(Slot::Comments) else {
            return;
        };
        let Some(client) = self.client() else {
            return;
        };

        let comments = client.comments(task).await.unwrap_or_else(|error| {
            warn!(%error, task_id = %task, "comment load failed");
            Vec::new()
        });
        let _ = self.apply(ticket, |state| state.comments = comments);
    }

    /// Replace the unsent comment text.
    pub fn set_comment_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.with(|inner| inner.state.comment_draft = text);
    }

    /// Post the trimmed draft on the selected task, then reload comments.
    /// Blank drafts and a missing task are ignored. On failure the draft is
    /// kept.
    #[instrument(skip(self))]
    pub async fn submit_comment(&self) {
        let pending = self.with(|inner| {
            let task = inner.state.selected_task.as_ref()?.id;
            let content = inner.state.comment_draft.trim();
            (!content.is_empty()).then(|| (task, content.to_owned()))
        });
        let Some((task, content)) = pending else {
            return;
        };
        let Some(client) = self.client() else {
            return;
        };

        if let Err(error) = client.post_comment(task, &content).await {
            warn!(%error, task_id = %task, "comment submit failed");
            return;
        }

        self.with(|inner| {
            if inner.state.comment_draft.trim() == content {
                inner.state.comment_draft.clear();
            }
        });
        self.load_comments().await;
    }

    /// Download link for `version` of the selected task, or `None` when no
    /// task is selected. Nothing is fetched.
    pub fn download_version(&self, version: &Version) -> Option<Url> {
        let task = self.with(|inner| inner.state.selected_task.as_ref().map(|t| t.id))?;
        let client = self.client()?;
        match client.download_url(task, version.version_no) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(%error, task_id = %task, "could not build download URL");
                None
            }
        }
    }

    /// Issue a ticket for a task-scoped slot. With no task selected the slot
    /// is emptied and `None` returned.
    fn issue_for_task(&self, slot: Slot) -> Option<(Ticket, TaskId)> {
        self.with(|inner| {
            let ticket = inner.generations.issue(slot);
            let task = inner.state.selected_task.as_ref().map(|t| t.id);
            if task.is_none() {
                match slot {
                    Slot::Versions => inner.state.versions.clear(),
                    Slot::Comments => inner.state.comments.clear(),
                    _ => {}
                }
            }
            task.map(|task| (ticket, task))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
