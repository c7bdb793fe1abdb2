//! Generic fetch/paginate/filter controller behind every list page.
//!
//! Every admin list view (payouts, verifications, transactions, users) is
//! the same machine: mutate a [`ListQuery`], issue exactly one fetch for
//! the query in effect at trigger time, and land in `Loaded` or `Errored`.
//! The one genuine race in the system lives here: a slow response to an
//! earlier query must never overwrite a later query's faster response.
//! Each trigger takes a monotonically increasing sequence number and a
//! completion is applied only while its number is still the newest
//! (last-trigger-wins). Discarding is advisory filtering of the result,
//! not transport cancellation; the stale request still runs to completion
//! on the wire.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::session::SessionManager;

/// Asynchronous fetch function a controller is parameterized by.
pub type ListFetcher<T> =
    Arc<dyn Fn(ListQuery) -> BoxFuture<'static, Result<ListResult<T>, GatewayError>> + Send + Sync>;

/// Errors raised when a controller cannot be brought up.
#[derive(Debug, Error)]
pub enum ListError {
    /// The session is not an authenticated admin; no protected request may
    /// be issued.
    #[error("an authenticated admin session is required")]
    Unauthorized,
}

/// The page/page-size/filter combination driving a list fetch.
///
/// Filters keep insertion order for query-string serialization; setting an
/// existing name replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    filters: Vec<(String, String)>,
}

impl ListQuery {
    /// Create a query for `page` with `page_size` rows (both clamped to a
    /// minimum of 1) and no filters.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            filters: Vec::new(),
        }
    }

    /// First page of ten rows, the default every list page starts from.
    #[must_use]
    pub fn first_page() -> Self {
        Self::new(1, 10)
    }

    /// Builder-style filter for constructing initial queries.
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(&name.into(), Some(&value.into()));
        self
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Value of a named filter, if set.
    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Filters in insertion order.
    #[must_use]
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Serialize as query pairs: `page`, `limit`, then filters in insertion
    /// order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.filters.iter().cloned());
        pairs
    }

    fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
    }

    /// Set (`Some`) or remove (`None`) a filter, preserving insertion
    /// order for names that already exist.
    fn set_filter(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                if let Some(slot) = self.filters.iter_mut().find(|(n, _)| n == name) {
                    slot.1 = value.to_string();
                } else {
                    self.filters.push((name.to_string(), value.to_string()));
                }
            }
            None => self.filters.retain(|(n, _)| n != name),
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::first_page()
    }
}

/// One page of results as the backend reported it.
///
/// `current_page` and `total_items` are authoritative backend values; the
/// controller never computes them locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult<T> {
    /// Rows for the current page.
    pub items: Vec<T>,
    /// Page this result belongs to (1-based).
    pub current_page: u32,
    /// Total rows across all pages.
    pub total_items: u64,
}

impl<T> ListResult<T> {
    /// Wrap an unpaginated backend list as a single page, so single-shot
    /// endpoints run through the same controller as paginated ones.
    #[must_use]
    pub fn single_page(items: Vec<T>) -> Self {
        let total_items = items.len() as u64;
        Self {
            items,
            current_page: 1,
            total_items,
        }
    }
}

/// Observable state of one list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<T> {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is in flight; `previous` keeps the last loaded result for
    /// flicker-free display.
    Loading { previous: Option<ListResult<T>> },
    /// The most recent fetch succeeded.
    Loaded(ListResult<T>),
    /// The most recent fetch failed.
    Errored(String),
}

/// Reusable engine behind every paginated/filterable admin list view.
///
/// Construction requires an authenticated admin session; the refusal
/// happens before any protected-endpoint request is sent. Instances never
/// share state with each other.
pub struct ResourceListController<T> {
    inner: Arc<ControllerInner<T>>,
}

impl<T> Clone for ResourceListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<T> {
    fetcher: ListFetcher<T>,
    query: Mutex<ListQuery>,
    state: Mutex<ListState<T>>,
    seq: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> ResourceListController<T> {
    /// Create a controller over `fetcher`, starting from `initial`.
    ///
    /// No fetch is issued until [`load`](Self::load) or a setter runs.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Unauthorized`] unless `session` currently
    /// holds an authenticated admin principal.
    pub fn new(
        session: &SessionManager,
        fetcher: ListFetcher<T>,
        initial: ListQuery,
    ) -> Result<Self, ListError> {
        if !session.is_admin() {
            return Err(ListError::Unauthorized);
        }

        Ok(Self {
            inner: Arc::new(ControllerInner {
                fetcher,
                query: Mutex::new(initial),
                state: Mutex::new(ListState::Idle),
                seq: AtomicU64::new(0),
            }),
        })
    }

    /// Issue the initial fetch for the configured query (mount).
    pub async fn load(&self) {
        self.trigger().await;
    }

    /// Jump to `page` and re-fetch. Filters are left untouched.
    pub async fn set_page(&self, page: u32) {
        self.mutate_query(|q| q.set_page(page));
        self.trigger().await;
    }

    /// Change the page size and re-fetch. Filters are left untouched.
    pub async fn set_page_size(&self, page_size: u32) {
        self.mutate_query(|q| q.set_page_size(page_size));
        self.trigger().await;
    }

    /// Set (`Some`) or remove (`None`) a filter and re-fetch.
    ///
    /// A filter change invalidates the current page's meaning, so the page
    /// resets to 1.
    pub async fn set_filter(&self, name: &str, value: Option<&str>) {
        self.mutate_query(|q| {
            q.set_filter(name, value);
            q.set_page(1);
        });
        self.trigger().await;
    }

    /// Re-issue a fetch for the current query without altering it.
    ///
    /// Called after an action workflow completes successfully.
    pub async fn refresh(&self) {
        self.trigger().await;
    }

    /// Current observable state.
    #[must_use]
    pub fn current_state(&self) -> ListState<T> {
        self.inner
            .state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(ListState::Idle)
    }

    /// Snapshot of the query currently in effect.
    #[must_use]
    pub fn current_query(&self) -> ListQuery {
        self.inner
            .query
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn mutate_query(&self, mutate: impl FnOnce(&mut ListQuery)) {
        if let Ok(mut guard) = self.inner.query.lock() {
            mutate(&mut guard);
        }
    }

    /// Run one fetch cycle: snapshot the query, enter `Loading`, await the
    /// fetch, and apply the outcome only if no newer trigger superseded it.
    async fn trigger(&self) {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.current_query();

        if let Ok(mut state) = self.inner.state.lock() {
            let previous = match &*state {
                ListState::Loaded(result) => Some(result.clone()),
                ListState::Loading { previous } => previous.clone(),
                ListState::Idle | ListState::Errored(_) => None,
            };
            *state = ListState::Loading { previous };
        }

        tracing::debug!(seq, page = query.page(), "List fetch issued");
        let outcome = (self.inner.fetcher)(query).await;

        if let Ok(mut state) = self.inner.state.lock() {
            if self.inner.seq.load(Ordering::SeqCst) != seq {
                tracing::debug!(seq, "Discarding stale list response");
                return;
            }
            *state = match outcome {
                Ok(result) => ListState::Loaded(result),
                Err(e) => ListState::Errored(e.user_message()),
            };
        }
    }
}
