//! Search overlay: free-text query, grouped results, navigation.

use dailies_core::{ProjectId, SearchHit, SearchItem, SearchResultGroup, SearchTarget, TaskId};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::controller::AppController;
use crate::state::Slot;

/// Group flat hits by their `group` tag. Groups appear in order of first
/// occurrence; items keep their relative order within a group.
pub fn group_hits(hits: Vec<SearchHit>) -> Vec<SearchResultGroup> {
    let mut groups: IndexMap<String, Vec<SearchItem>> = IndexMap::new();
    for mut hit in hits {
        let title = std::mem::take(&mut hit.group);
        groups.entry(title).or_default().push(hit.into());
    }
    groups
        .into_iter()
        .map(|(title, items)| SearchResultGroup { title, items })
        .collect()
}

impl AppController {
    /// Open the overlay with an empty query and no results. A search still in
    /// flight is discarded.
    pub fn open_search(&self) {
        self.with(|inner| {
            inner.generations.invalidate(&[Slot::Search]);
            inner.state.search_open = true;
            inner.state.search_query.clear();
            inner.state.search_results.clear();
        });
    }

    /// Close the overlay. Results are kept until the next search.
    pub fn close_search(&self) {
        self.with(|inner| inner.state.search_open = false);
    }

    /// Run a search. A blank query empties the results without a request;
    /// failure also empties them.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) {
        let trimmed = query.trim().to_owned();
        let ticket = self.with(|inner| {
            query.clone_into(&mut inner.state.search_query);
            let ticket = inner.generations.issue(Slot::Search);
            if trimmed.is_empty() {
                inner.state.search_results.clear();
            }
            ticket
        });
        if trimmed.is_empty() {
            return;
        }
        let Some(client) = self.client() else {
            return;
        };

        let results = match client.search(&trimmed).await {
            Ok(hits) => group_hits(hits),
            Err(error) => {
                warn!(%error, query = %trimmed, "search failed");
                Vec::new()
            }
        };
        let _ = self.apply(ticket, |state| state.search_results = results);
    }

    /// Close the overlay and select what `item` points at. Unknown types and
    /// ids that are not whole numbers are ignored.
    #[instrument(skip_all, fields(kind = %item.kind, id = %item.id))]
    pub async fn navigate_search_result(&self, item: &SearchItem) {
        self.close_search();
        let target = item.target();
        let Some(id) = item.id.as_numeric() else {
            debug!("search result id is not numeric, ignoring");
            return;
        };
        match target {
            SearchTarget::Project => self.select_project(ProjectId::new(id)).await,
            SearchTarget::Task => self.select_task(TaskId::new(id)).await,
            SearchTarget::Other(kind) => debug!(%kind, "no navigation for search result type"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
