//! Pure helpers that derive display values from state.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use dailies_core::Version;

use crate::controller::AppController;

/// Shown in place of a version summary when there are no versions.
pub const NO_VERSIONS: &str = "—";

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `"v<n> · <created at, local time>"` for the last (latest) version, or
/// [`NO_VERSIONS`].
pub fn latest_version_summary(versions: &[Version]) -> String {
    match versions.last() {
        None => NO_VERSIONS.to_owned(),
        Some(latest) => format!(
            "v{} · {}",
            latest.version_no,
            local_timestamp(&latest.created_at)
        ),
    }
}

/// Render a server timestamp in local time. Offsets are honoured; timestamps
/// without one are taken as local. Anything unparseable is returned as-is.
pub fn local_timestamp(raw: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return at.with_timezone(&Local).format(LOCAL_FORMAT).to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            if let Some(at) = Local.from_local_datetime(&naive).earliest() {
                return at.format(LOCAL_FORMAT).to_string();
            }
        }
    }
    raw.to_owned()
}

/// Visual classification of a task status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusBadge {
    /// `完成`
    Done,
    /// `进行中`
    InProgress,
    /// `待开始`
    NotStarted,
    /// `审核中`
    InReview,
    /// Any other label.
    Neutral,
}

impl StatusBadge {
    /// Classify a status label. Total: unknown labels are [`Self::Neutral`].
    pub fn classify(status: &str) -> Self {
        match status {
            "完成" => Self::Done,
            "进行中" => Self::InProgress,
            "待开始" => Self::NotStarted,
            "审核中" => Self::InReview,
            _ => Self::Neutral,
        }
    }

    /// Stylesheet classes for the badge.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Done => "bg-green-50 text-green-700 border-green-200",
            Self::InProgress => "bg-yellow-50 text-yellow-800 border-yellow-200",
            Self::InReview => "bg-blue-50 text-blue-700 border-blue-200",
            Self::NotStarted | Self::Neutral => "bg-gray-50 text-gray-700 border-gray-200",
        }
    }

    /// Short token for plain-text output.
    pub fn token(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::InProgress => "in-progress",
            Self::NotStarted => "not-started",
            Self::InReview => "in-review",
            Self::Neutral => "neutral",
        }
    }
}

/// Stylesheet classes for a status label.
pub fn status_badge_class(status: &str) -> &'static str {
    StatusBadge::classify(status).css_class()
}

impl AppController {
    /// [`latest_version_summary`] of the current versions.
    pub fn latest_version_summary(&self) -> String {
        self.with(|inner| latest_version_summary(&inner.state.versions))
    }
}
