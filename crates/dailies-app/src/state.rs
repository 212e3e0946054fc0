//! The state aggregate and the per-slot generation counters that guard it.

use dailies_client::TaskFilters;
use dailies_core::{
    Comment, Project, ProjectId, ReferenceSet, SearchResultGroup, Task, User, Version,
};

/// Which top-level screen is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// Sign-in form. Initial state.
    #[default]
    Login,
    /// The signed-in application.
    App,
}

/// Everything the controller owns. Readers get clones via
/// [`crate::AppController::snapshot`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Blocking configuration error, set by `initialize`.
    pub config_error: Option<String>,
    /// Current screen.
    pub view: View,
    /// A login attempt is in flight.
    pub loading: bool,
    /// Message from the last failed login.
    pub error: Option<String>,
    /// The signed-in user.
    pub user: Option<User>,

    /// Stages and statuses for the filter dropdowns.
    pub reference: ReferenceSet,

    /// Current project listing (server-filtered by `project_query`).
    pub projects: Vec<Project>,
    /// Project name filter.
    pub project_query: String,
    /// Selected project.
    pub selected_project_id: Option<ProjectId>,

    /// Task listing of the selected project.
    pub tasks: Vec<Task>,
    /// Task listing filters.
    pub filters: TaskFilters,
    /// Full record of the selected task.
    pub selected_task: Option<Task>,
    /// Versions of the selected task, ascending.
    pub versions: Vec<Version>,
    /// Comments on the selected task.
    pub comments: Vec<Comment>,
    /// Unsent comment text.
    pub comment_draft: String,

    /// Search overlay is open.
    pub search_open: bool,
    /// Last query passed to `search`.
    pub search_query: String,
    /// Grouped results of the last search.
    pub search_results: Vec<SearchResultGroup>,
}

impl AppState {
    /// Drop everything that belongs to a signed-in session. Reference data,
    /// configuration state and the login-in-flight flag survive.
    pub(crate) fn clear_session(&mut self) {
        let reference = std::mem::take(&mut self.reference);
        let config_error = self.config_error.take();
        *self = Self {
            reference,
            config_error,
            loading: self.loading,
            ..Self::default()
        };
    }

    /// Drop the selected task and everything scoped to it.
    pub(crate) fn clear_task(&mut self) {
        self.selected_task = None;
        self.versions.clear();
        self.comments.clear();
    }
}

/// Independently-fetched pieces of state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Session,
    Reference,
    Projects,
    Tasks,
    TaskDetail,
    Versions,
    Comments,
    Search,
}

impl Slot {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        match self {
            Self::Session => 0,
            Self::Reference => 1,
            Self::Projects => 2,
            Self::Tasks => 3,
            Self::TaskDetail => 4,
            Self::Versions => 5,
            Self::Comments => 6,
            Self::Search => 7,
        }
    }

    /// Slots whose contents depend on the selected task.
    pub(crate) const TASK_SCOPED: [Self; 3] = [Self::TaskDetail, Self::Versions, Self::Comments];
}

/// Proof that a fetch was issued at a given generation of its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub(crate) slot: Slot,
    generation: u64,
}

/// Monotonic counter per slot. Issuing a fetch or invalidating a slot bumps
/// its counter; a response is applied only while its ticket is current.
#[derive(Debug, Default)]
pub(crate) struct Generations([u64; Slot::COUNT]);

impl Generations {
    pub(crate) fn issue(&mut self, slot: Slot) -> Ticket {
        let counter = &mut self.0[slot.index()];
        *counter += 1;
        Ticket {
            slot,
            generation: *counter,
        }
    }

    pub(crate) fn invalidate(&mut self, slots: &[Slot]) {
        for slot in slots {
            self.0[slot.index()] += 1;
        }
    }

    pub(crate) fn invalidate_all(&mut self) {
        for counter in &mut self.0 {
            *counter += 1;
        }
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.0[ticket.slot.index()] == ticket.generation
    }
}

/// State plus its generations, guarded together by one lock.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) state: AppState,
    pub(crate) generations: Generations,
}
