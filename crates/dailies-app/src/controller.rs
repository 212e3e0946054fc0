//! The controller handle and the locking discipline shared by every
//! operation.
//!
//! Operations are split by concern across [`crate::session`],
//! [`crate::reference`], [`crate::selection`] and [`crate::search`]; each adds
//! an `impl AppController` block.
//!
//! The state lock is only ever taken inside [`AppController::with`], which
//! runs a synchronous closure, so no guard can live across an `.await`.

use dailies_client::ApiClient;
use dailies_settings::ConfigError;
use parking_lot::Mutex;
use tracing::debug;

use crate::state::{AppState, Inner, Slot, Ticket};

/// Owns the application state and drives every fetch that changes it.
///
/// All operations take `&self` and may be awaited concurrently; failures are
/// logged and degrade the affected state to empty, they are never returned.
pub struct AppController {
    client: Result<ApiClient, ConfigError>,
    inner: Mutex<Inner>,
}

impl AppController {
    /// Create a controller. A configuration error is kept and reported by
    /// [`initialize`](Self::initialize); no request is ever issued in that
    /// case.
    pub fn new(client: Result<ApiClient, ConfigError>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.with(|inner| inner.state.clone())
    }

    /// The API client, or `None` when configuration failed.
    pub fn client(&self) -> Option<&ApiClient> {
        self.client.as_ref().ok()
    }

    pub(crate) fn config_error(&self) -> Option<&ConfigError> {
        self.client.as_ref().err()
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub(crate) fn issue(&self, slot: Slot) -> Ticket {
        self.with(|inner| inner.generations.issue(slot))
    }

    /// Run `f` on the state if `ticket` is still current. Returns whether it
    /// ran.
    pub(crate) fn apply(&self, ticket: Ticket, f: impl FnOnce(&mut AppState)) -> bool {
        let applied = self.with(|inner| {
            if inner.generations.is_current(ticket) {
                f(&mut inner.state);
                true
            } else {
                false
            }
        });
        if !applied {
            debug!(slot = ?ticket.slot, "discarding stale response");
        }
        applied
    }
}

impl std::fmt::Debug for AppController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("configured", &self.client.is_ok())
            .finish_non_exhaustive()
    }
}
