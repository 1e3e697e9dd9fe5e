// Client-side application state for the crawl service.
//
// The store is single-writer: every mutation goes through a `&mut self`
// method, and the only suspension points are backend calls.

use crate::detail::DetailView;
use crate::form::SubmissionForm;
use crate::notify::{Level, Notification, Notifications};
use crate::query::{DEFAULT_PAGE_SIZE, Pagination, QueryState};
use crate::selection::Selection;
use futures::future::join_all;
use sitelens_client::{
    ApiError, CrawlApi, CrawlItem, ListQuery, ListResponse, SortColumn, SortSpec,
};
use tracing::{debug, error, info, warn};

/// A list request that has been issued but not yet applied.
///
/// Only the ticket with the newest generation may update the list; responses
/// to older tickets are discarded when they arrive.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTicket {
    pub generation: u64,
    pub query: ListQuery,
}

pub struct Store<A> {
    api: A,
    query: QueryState,
    items: Vec<CrawlItem>,
    total_count: u64,
    selection: Selection,
    detail: DetailView,
    form: SubmissionForm,
    notifications: Notifications,
    pending: bool,
    generation: u64,
}

impl<A: CrawlApi> Store<A> {
    pub fn new(api: A) -> Self {
        Self::with_page_size(api, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(api: A, page_size: u32) -> Self {
        Self {
            api,
            query: QueryState::new(page_size),
            items: Vec::new(),
            total_count: 0,
            selection: Selection::new(),
            detail: DetailView::default(),
            form: SubmissionForm::new(),
            notifications: Notifications::default(),
            pending: false,
            generation: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[CrawlItem] {
        &self.items
    }

    pub fn item(&self, id: i64) -> Option<&CrawlItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.query.current_page(),
            self.total_count,
            self.query.page_size(),
        )
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.form
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// Issue a ticket for the current query and mark the store pending.
    pub fn begin_list(&mut self) -> ListTicket {
        self.generation += 1;
        self.pending = true;
        ListTicket {
            generation: self.generation,
            query: self.query.to_list_query(),
        }
    }

    /// Apply the response for `generation`. Returns `false` when the response
    /// was stale and ignored.
    pub fn apply_list(&mut self, generation: u64, result: Result<ListResponse, ApiError>) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding stale list response (generation {} < {})",
                generation, self.generation
            );
            return false;
        }

        match result {
            Ok(response) => {
                debug!(
                    "Loaded {} item(s) of {}",
                    response.list.len(),
                    response.total_count
                );
                self.items = response.list;
                self.total_count = response.total_count;
                self.selection.prune(&self.items);
            }
            Err(e) => self.report(&e, None),
        }

        self.pending = false;
        true
    }

    pub async fn fetch_list(&mut self) {
        let ticket = self.begin_list();
        let result = self.api.list(&ticket.query).await;
        self.apply_list(ticket.generation, result);
    }

    pub async fn set_page(&mut self, page: u32) {
        self.query.set_page(page);
        self.fetch_list().await;
    }

    /// Set the page and hand back a ticket for the caller to resolve.
    pub fn request_page(&mut self, page: u32) -> ListTicket {
        self.query.set_page(page);
        self.begin_list()
    }

    /// Update the search text without fetching.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query.set_search_text(text);
    }

    /// Replace the sort spec without fetching.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.query.set_sort(sort);
    }

    pub async fn submit_search(&mut self) {
        self.fetch_list().await;
    }

    pub async fn clear_search(&mut self) {
        self.query.set_search_text("");
        self.fetch_list().await;
    }

    pub async fn toggle_sort(&mut self, column: SortColumn) {
        let next = self.query.sort().toggled(column);
        self.query.set_sort(next);
        self.fetch_list().await;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn set_selected(&mut self, ids: &[i64]) {
        self.selection.set(ids, &self.items);
    }

    pub fn toggle_one(&mut self, id: i64, checked: bool) {
        self.selection.toggle(id, checked, &self.items);
    }

    pub fn toggle_all(&mut self, checked: bool) {
        if checked {
            self.selection.select_all(&self.items);
        } else {
            self.selection.clear();
        }
    }

    pub async fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            debug!("Delete requested with an empty selection");
            return;
        }

        self.pending = true;
        let ids = self.selection.ids().to_vec();
        let outcome = self.api.delete(&ids).await;

        if outcome.is_ok() {
            self.selection.clear();
        }

        self.fetch_list().await;

        match outcome {
            Ok(response) => {
                info!("Deleted {} item(s)", ids.len());
                self.notifications.success(response.message);
            }
            Err(e) => self.report(&e, None),
        }
        self.pending = false;
    }

    /// Re-submit the URL of every selected item on the loaded page.
    pub async fn reanalyze_selected(&mut self) {
        self.pending = true;

        let mut urls = Vec::new();
        let mut skipped = Vec::new();
        for id in self.selection.ids() {
            match self.item(*id).and_then(CrawlItem::url) {
                Some(url) => urls.push(url.to_string()),
                None => skipped.push(*id),
            }
        }
        for id in skipped {
            warn!("No URL for item {}, skipping re-analysis", id);
            self.notifications
                .warning(format!("Item {} has no URL and was skipped.", id));
        }

        if !urls.is_empty() {
            self.notifications
                .info(format!("{} items submitted for re-analysis.", urls.len()));

            let results = join_all(urls.iter().map(|url| self.api.submit_url(url))).await;
            let failures: Vec<ApiError> = results.into_iter().filter_map(Result::err).collect();

            if let Some(first) = failures.first() {
                error!("{} of {} re-analysis submission(s) failed", failures.len(), urls.len());
                self.report(
                    first,
                    Some("An error occurred during the re-analysis batch process"),
                );
            }
        }

        self.fetch_list().await;
        self.set_selected(&[]);
        self.pending = false;
    }

    // ------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------

    /// Open the detail view for a loaded item, or close it.
    pub fn set_current_item(&mut self, id: Option<i64>) {
        let item = id.and_then(|id| self.item(id).cloned());
        match item {
            Some(item) => self.detail.open(item),
            None => {
                if let Some(id) = id {
                    debug!("Item {} is not on the loaded page", id);
                }
                self.detail.clear();
            }
        }
    }

    pub fn set_modal_open(&mut self, open: bool) {
        self.detail.set_open(open);
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.form.set_input(input);
    }

    /// Validate the form input and submit it. Returns whether the backend
    /// accepted the URL.
    pub async fn submit(&mut self) -> bool {
        if !self.form.validate() {
            debug!("Submission blocked by validation");
            return false;
        }

        self.pending = true;
        let url = self.form.input().to_string();
        let accepted = match self.api.submit_url(&url).await {
            Ok(response) => {
                info!("Submitted {} as item {}", url, response.id);
                self.form.mark_succeeded();
                self.notifications.push(
                    Notification::new(Level::Success, response.message)
                        .with_item(response.id)
                        .sticky(),
                );
                true
            }
            Err(e) => {
                self.form.mark_failed();
                self.report(&e, None);
                false
            }
        };
        self.pending = false;
        accepted
    }

    pub fn reset(&mut self) {
        self.form.reset();
    }

    // ------------------------------------------------------------------

    fn report(&mut self, err: &ApiError, context: Option<&str>) {
        let handled = err.handled();
        error!(
            status = ?handled.status_code,
            body = ?handled.response_body,
            "Request failed: {}",
            handled.message
        );
        let message = match context {
            Some(context) => format!("{}: {}", context, handled.message),
            None => handled.message,
        };
        self.notifications.error(message);
    }
}
