//! Search hits and grouped results.
//!
//! `GET /search` returns a flat list of hits, each tagged with a display
//! group and a record type. Ids arrive as either numbers or strings.

use serde::{Deserialize, Serialize};

/// A hit id exactly as the server sent it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchId {
    /// Integral JSON number.
    Int(i64),
    /// Non-integral JSON number.
    Float(f64),
    /// JSON string.
    Text(String),
}

impl SearchId {
    /// Interpret the id as a record id.
    ///
    /// Strings are parsed after trimming; blank strings, fractional numbers and
    /// anything non-numeric yield `None`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) => {
                (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(*f as i64)
            }
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for SearchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One flat hit from `GET /search`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Display group (category title).
    pub group: String,
    /// Record id.
    pub id: SearchId,
    /// Primary label.
    pub label: String,
    /// Secondary line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Record type tag, e.g. `"project"` or `"task"`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A hit inside a [`SearchResultGroup`] (the group tag is lifted out).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Record id.
    pub id: SearchId,
    /// Primary label.
    pub label: String,
    /// Secondary line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Record type tag.
    #[serde(rename = "type")]
    pub kind: String,
}

impl SearchItem {
    /// Navigation target for this item's type tag.
    pub fn target(&self) -> SearchTarget {
        SearchTarget::from_kind(&self.kind)
    }
}

impl From<SearchHit> for SearchItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.id,
            label: hit.label,
            subtitle: hit.subtitle,
            kind: hit.kind,
        }
    }
}

/// Hits sharing one group title, in server order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResultGroup {
    /// Group title.
    pub title: String,
    /// Items in the order the server returned them.
    pub items: Vec<SearchItem>,
}

/// What selecting a search item navigates to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchTarget {
    /// Select the project with the item's id.
    Project,
    /// Select the task with the item's id.
    Task,
    /// A type this client does not navigate to.
    Other(String),
}

impl SearchTarget {
    /// Classify a type tag. Matching is exact.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "project" => Self::Project,
            "task" => Self::Task,
            other => Self::Other(other.to_owned()),
        }
    }
}
