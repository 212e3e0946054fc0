//! # dailies-app
//!
//! Application state controller for the dailies tracker client.
//!
//! [`AppController`] owns one [`AppState`] and is the only thing that mutates
//! it. Its operations are grouped by concern:
//!
//! - **Session gate** ([`session`]): `initialize`, `login`, `logout`
//! - **Reference data** ([`reference`]): `load_reference_set`
//! - **Selection chain** ([`selection`]): projects → tasks → versions and
//!   comments, comment submission, download links
//! - **Search** ([`search`]): query, grouped results, navigation
//! - **Derived views** ([`view`]): latest-version summary, status badges
//!
//! Failures never reach the caller. Data loads degrade to empty state and log
//! at warn; only a failed login (`AppState::error`) and a configuration error
//! (`AppState::config_error`) are surfaced.

#![deny(unsafe_code)]

pub mod controller;
pub mod reference;
pub mod search;
pub mod selection;
pub mod session;
pub mod state;
pub mod view;

#[cfg(test)]
mod testing;

pub use controller::AppController;
pub use search::group_hits;
pub use session::LOGIN_FALLBACK_MESSAGE;
pub use state::{AppState, View};
pub use view::{NO_VERSIONS, StatusBadge, latest_version_summary, local_timestamp, status_badge_class};

pub use dailies_client::{Credentials, TaskFilters};
