//! Paginated, filterable list views shared by the users, ads and reports pages

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};

use crate::debounce::Debouncer;
use crate::error::Error;
use crate::interaction::{Interaction, UNKNOWN_ERROR};
use crate::pagination::{Page, Pager};

/// Filters sent with every list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Free-text search
    pub search: String,

    /// Status filter; `None` means all statuses
    pub status: Option<String>,

    /// Requested page, starting at 1
    pub page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            page: 1,
        }
    }
}

impl ListQuery {
    /// Query filtered to one status
    pub fn with_status(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            ..Self::default()
        }
    }
}

/// A collection endpoint a [`ListView`] can page through
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Row type
    type Item: Clone + Send + Sync + 'static;

    /// Name used in log lines
    fn name(&self) -> &'static str;

    /// Fetch the page selected by `query`
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Self::Item>, Error>;
}

/// Snapshot of a list view
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// Rows of the current page
    pub items: Vec<T>,

    /// Total matching rows
    pub total: u64,

    /// Number of pages
    pub total_pages: u32,

    /// Whether a fetch is outstanding
    pub loading: bool,

    /// Whether at least one fetch succeeded
    pub loaded: bool,

    /// Current filters
    pub query: ListQuery,

    /// Keys of actions currently running
    pub in_flight: HashSet<String>,
}

impl<T> ListState<T> {
    fn new(query: ListQuery) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 1,
            loading: false,
            loaded: false,
            query,
            in_flight: HashSet::new(),
        }
    }

    /// Pager for the current page
    pub fn pager(&self) -> Pager {
        Pager::new(self.query.page, self.total_pages)
    }

    /// Whether the action identified by `key` is running
    pub fn is_busy(&self, key: &str) -> bool {
        self.in_flight.contains(key)
    }
}

/// Result of a user-triggered action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The call succeeded and the list was re-fetched
    Completed,

    /// The user declined a confirmation or prompt; nothing was sent
    Cancelled,

    /// The same action is still running
    Busy,
}

struct Shared<T> {
    state: Mutex<ListState<T>>,
    generation: AtomicU64,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, ListState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Paginated list bound to a [`PageSource`]
///
/// Filter changes schedule a fetch through a [`Debouncer`]. Every fetch
/// is numbered; a response that arrives after a newer fetch was issued
/// is dropped, so the view never regresses to stale data.
pub struct ListView<S: PageSource> {
    source: Arc<S>,
    shared: Arc<Shared<S::Item>>,
    debouncer: Debouncer,
}

impl<S: PageSource> ListView<S> {
    /// Create an idle view; call [`ListView::load`] to fetch the first page
    pub fn new(source: S, query: ListQuery, debounce: Duration) -> Self {
        Self {
            source: Arc::new(source),
            shared: Arc::new(Shared {
                state: Mutex::new(ListState::new(query)),
                generation: AtomicU64::new(0),
            }),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// The underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ListState<S::Item> {
        self.shared.lock().clone()
    }

    /// Current rows
    pub fn items(&self) -> Vec<S::Item> {
        self.shared.lock().items.clone()
    }

    /// Whether the action identified by `key` is running
    pub fn is_busy(&self, key: &str) -> bool {
        self.shared.lock().is_busy(key)
    }

    /// Find a row on the current page
    pub fn find<P>(&self, predicate: P) -> Option<S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.shared.lock().items.iter().find(|item| predicate(item)).cloned()
    }

    /// Fetch the current page now
    pub async fn load(&self) {
        self.refresh().await;
    }

    /// Fetch the current page now, bypassing the debounce delay
    pub async fn refresh(&self) {
        fetch_into(self.source.clone(), self.shared.clone()).await;
    }

    /// Wait until any scheduled fetch has completed
    pub async fn settle(&self) {
        self.debouncer.flush().await;
    }

    /// Change the search text
    pub fn set_search(&self, search: &str) {
        self.shared.lock().query.search = search.to_string();
        self.schedule();
    }

    /// Change the status filter
    pub fn set_status(&self, status: Option<&str>) {
        self.shared.lock().query.status = status.filter(|s| !s.is_empty()).map(str::to_string);
        self.schedule();
    }

    /// Jump to `page` (clamped to at least 1)
    pub fn set_page(&self, page: u32) {
        self.shared.lock().query.page = page.max(1);
        self.schedule();
    }

    /// Go to the next page; returns false at the last page
    pub fn next_page(&self) -> bool {
        {
            let mut state = self.shared.lock();
            if !state.pager().has_next() {
                return false;
            }
            state.query.page += 1;
        }
        self.schedule();
        true
    }

    /// Go to the previous page; returns false at the first page
    pub fn prev_page(&self) -> bool {
        {
            let mut state = self.shared.lock();
            if !state.pager().has_prev() {
                return false;
            }
            state.query.page -= 1;
        }
        self.schedule();
        true
    }

    /// Cancel the scheduled fetch, if any
    ///
    /// A fetch already in flight is dropped and `loading` is cleared.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }

    fn schedule(&self) {
        self.debouncer
            .schedule(fetch_into(self.source.clone(), self.shared.clone()));
    }

    /// Run a mutating call under `key`
    ///
    /// On success the current page is re-fetched. On failure the user is
    /// alerted with `"{failure_prefix}: {message}"` and the error returned;
    /// the list is left as it was.
    pub async fn run_action<F, Fut>(
        &self,
        key: &str,
        interaction: &dyn Interaction,
        failure_prefix: &str,
        action: F,
    ) -> Result<ActionOutcome, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), Error>>,
    {
        if !self.shared.lock().in_flight.insert(key.to_string()) {
            debug!("{} action '{}' already running", self.source.name(), key);
            return Ok(ActionOutcome::Busy);
        }

        let result = action().await;
        self.shared.lock().in_flight.remove(key);

        match result {
            Ok(()) => {
                self.refresh().await;
                Ok(ActionOutcome::Completed)
            }
            Err(err) => {
                let message = err.user_message(UNKNOWN_ERROR);
                interaction.alert(&format!("{}: {}", failure_prefix, message));
                Err(err)
            }
        }
    }
}

/// Clears `loading` if a fetch is dropped mid-flight while still the latest
struct LoadingGuard<'a, T> {
    shared: &'a Shared<T>,
    generation: u64,
    armed: bool,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed && self.shared.generation.load(Ordering::SeqCst) == self.generation {
            self.shared.lock().loading = false;
        }
    }
}

async fn fetch_into<S: PageSource>(source: Arc<S>, shared: Arc<Shared<S::Item>>) {
    let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
    let query = {
        let mut state = shared.lock();
        state.loading = true;
        state.query.clone()
    };

    let mut guard = LoadingGuard {
        shared: &shared,
        generation,
        armed: true,
    };
    let result = source.fetch_page(&query).await;
    guard.armed = false;
    drop(guard);

    let mut state = shared.lock();
    if shared.generation.load(Ordering::SeqCst) != generation {
        debug!("Discarding stale {} page (generation {})", source.name(), generation);
        return;
    }
    state.loading = false;

    match result {
        Ok(page) => {
            state.total_pages = page.total_pages();
            state.total = page.total;
            state.items = page.items;
            state.loaded = true;
        }
        Err(err) => error!("Error fetching {}: {}", source.name(), err),
    }
}
