//! Records returned by the tracker server.
//!
//! Field names follow the server's camelCase JSON. Optional fields accept both
//! an absent key and an explicit `null`.

use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, ProjectId, TaskId, UserId};

/// Account role. The server enforces permissions; the client only displays it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Creative lead; reviews and approves work.
    Director,
    /// Schedules and assigns work.
    Producer,
    /// Delivers versions against assigned tasks.
    Artist,
}

impl Role {
    /// Wire label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Director => "Director",
            Self::Producer => "Producer",
            Self::Artist => "Artist",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in (or referenced) user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Account role.
    pub role: Role,
}

impl User {
    /// Nickname when set and non-blank, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// A production project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Server id.
    pub id: ProjectId,
    /// Project name (the listing is filtered by this server-side).
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the project has been archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl Project {
    /// `true` only when the server marked the project archived.
    pub fn is_archived(&self) -> bool {
        self.archived.unwrap_or(false)
    }
}

/// A unit of work on one shot at one pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server id.
    pub id: TaskId,
    /// Shot number, e.g. `"SH010"`.
    pub shot_no: String,
    /// Short title.
    pub title: String,
    /// Pipeline stage label (one of the reference set's stages).
    pub stage: String,
    /// Status label (one of the reference set's statuses).
    pub status: String,
    /// Assigned user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    /// Due date as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Free-form remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Last modification timestamp as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// One delivered version of a task. Listings are ascending by creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Version number, `1` for the first delivery.
    pub version_no: i64,
    /// Creation timestamp (RFC 3339 from the server).
    pub created_at: String,
}

/// A comment on a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Server id.
    pub id: CommentId,
    /// Who wrote it.
    pub author: User,
    /// Comment body.
    pub content: String,
    /// Creation timestamp as sent by the server.
    pub created_at: String,
}

/// Server-defined enumerations used to populate task filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    /// Pipeline stages, in display order.
    #[serde(default)]
    pub stages: Vec<String>,
    /// Task statuses, in display order.
    #[serde(default)]
    pub statuses: Vec<String>,
}

impl ReferenceSet {
    /// `true` when neither list has been populated.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty() && self.statuses.is_empty()
    }
}
