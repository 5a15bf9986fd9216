//! Selection & pagination controller.
//!
//! Owns the page pointer, the current page payload, the selection set and the
//! transient UI flags. Every count and predicate is recomputed from the
//! selection set on read.

use super::pager::{PageMarker, PagerState};
use super::selection::SelectionSet;
use crate::api::{ApiError, ApiResult, ArtworkId, ArtworkPage, ArtworkRecord, PageSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Maximum digits accepted in the bulk-select input
const MAX_BULK_INPUT_LEN: usize = 6;

/// Load state of the page the pointer is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Why a bulk selection stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectStop {
    /// Exactly the requested number of rows were marked
    Completed,
    /// The last page ran out before the requested number was reached
    Exhausted,
    /// A page fetch failed; rows marked before it stay marked
    FetchFailed { page: u32, error: ApiError },
    /// Another bulk operation was already running
    Refused,
}

/// Result of [`CatalogController::select_first_n`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    pub requested: usize,
    pub marked: usize,
    pub pages_fetched: u32,
    pub stop: SelectStop,
}

impl SelectOutcome {
    fn new(requested: usize) -> Self {
        Self {
            requested,
            marked: 0,
            pages_fetched: 0,
            stop: SelectStop::Completed,
        }
    }

    /// One-line description for status bars and CLI output
    pub fn summary(&self) -> String {
        match &self.stop {
            SelectStop::Completed => format!("Selected {} rows", self.marked),
            SelectStop::Exhausted => format!(
                "Selected {} of {} rows (no more pages)",
                self.marked, self.requested
            ),
            SelectStop::FetchFailed { page, error } => format!(
                "Selected {} of {} rows; stopped at page {}: {}",
                self.marked, self.requested, page, error
            ),
            SelectStop::Refused => "Another selection is already running".to_string(),
        }
    }
}

/// Holds the busy flag for as long as it lives
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: Arc::clone(flag) })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Controller driving the catalog view
pub struct CatalogController<S: PageSource> {
    source: Arc<S>,
    pager: PagerState,
    page: Option<ArtworkPage>,
    load_state: LoadState,
    selection: SelectionSet,
    busy: Arc<AtomicBool>,
    dropdown_open: bool,
    bulk_input: String,
}

impl<S: PageSource> CatalogController<S> {
    /// Create a controller positioned on page 1
    pub fn new(source: Arc<S>) -> Self {
        Self::starting_at(source, 1)
    }

    /// Create a controller positioned on `page`
    pub fn starting_at(source: Arc<S>, page: u32) -> Self {
        Self {
            source,
            pager: PagerState::new(page),
            page: None,
            load_state: LoadState::Idle,
            selection: SelectionSet::new(),
            busy: Arc::new(AtomicBool::new(false)),
            dropdown_open: false,
            bulk_input: String::new(),
        }
    }

    /// Shared handle to the page source, for spawning loads
    pub fn source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    pub fn current_page(&self) -> u32 {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.pager.total_pages()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Records of the current page, empty unless the page loaded successfully
    pub fn records(&self) -> &[ArtworkRecord] {
        match (&self.load_state, &self.page) {
            (LoadState::Ready, Some(page)) => &page.items,
            _ => &[],
        }
    }

    /// Error text for a failed page load
    pub fn load_error_message(&self) -> Option<String> {
        match &self.load_state {
            LoadState::Failed(message) => Some(format!("Failed to load artworks: {}", message)),
            _ => None,
        }
    }

    // ---- page loading ---------------------------------------------------

    /// Enter `Loading` for the current page and return the page to fetch
    pub fn begin_load(&mut self) -> u32 {
        self.load_state = LoadState::Loading;
        self.pager.current_page()
    }

    /// Apply the result of loading `page`. Results for a page other than the
    /// current one are discarded. Returns whether the result was applied.
    ///
    /// When the response shows `page` is past the last page, the pointer moves
    /// to the last page and the controller stays `Loading` for it.
    pub fn finish_load(&mut self, page: u32, result: ApiResult<ArtworkPage>) -> bool {
        if page != self.pager.current_page() {
            debug!(
                "Discarding result for page {} (current page is {})",
                page,
                self.pager.current_page()
            );
            return false;
        }

        match result {
            Ok(data) => {
                if self.pager.learn_total(data.pagination.total_pages) {
                    debug!("Total pages is now {}", data.pagination.total_pages);
                }
                if self.pager.clamp_to_total() {
                    info!(
                        "Page {} is past the last page, moving to page {}",
                        page,
                        self.pager.current_page()
                    );
                    self.page = None;
                    self.load_state = LoadState::Loading;
                    return true;
                }
                self.page = Some(data);
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                error!("Failed to load artworks page {}: {}", page, e);
                self.page = None;
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Fetch and apply the current page, following a move to the last page
    pub async fn load_current_page(&mut self) -> ApiResult<()> {
        loop {
            let page = self.begin_load();
            let result = self.source.fetch_page(page).await;
            let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
            self.finish_load(page, result);
            if !self.is_loading() {
                return outcome;
            }
        }
    }

    // ---- selection queries ----------------------------------------------

    pub fn is_selected(&self, id: ArtworkId) -> bool {
        self.selection.is_selected(id)
    }

    /// True only for a non-empty current page whose items are all selected
    pub fn all_current_page_selected(&self) -> bool {
        let records = self.records();
        !records.is_empty() && records.iter().all(|r| self.selection.is_selected(r.id))
    }

    pub fn current_page_selected_count(&self) -> usize {
        self.selection.count_in(self.records().iter().map(|r| &r.id))
    }

    pub fn total_selected_count(&self) -> usize {
        self.selection.selected_count()
    }

    pub fn selected_ids(&self) -> Vec<ArtworkId> {
        self.selection.selected_ids()
    }

    // ---- selection actions ----------------------------------------------

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Shared view of the busy flag
    #[cfg(test)]
    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    /// Flip the selection of `id`. Returns false when refused because busy.
    pub fn toggle(&mut self, id: ArtworkId) -> bool {
        if self.is_busy() {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Select every row on the current page, or deselect them all if they
    /// already are all selected.
    pub fn toggle_all_current_page(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        let select = !self.all_current_page_selected();
        let ids: Vec<ArtworkId> = self.records().iter().map(|r| r.id).collect();
        for id in ids {
            self.selection.set(id, select);
        }
        true
    }

    /// Forget the selection on every page
    pub fn clear_all(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Mark the first `n` rows as selected, starting with the current page and
    /// walking forward through later pages one fetch at a time.
    ///
    /// When the current page is still loading or failed to load, the walk
    /// fetches it first. A failed fetch ends the walk; rows marked before the
    /// failure stay marked. The failure is logged and described in the outcome but is not
    /// a page-load error.
    pub async fn select_first_n(&mut self, n: usize) -> SelectOutcome {
        let outcome = match BusyGuard::acquire(&self.busy) {
            Some(_busy) => self.mark_forward(n).await,
            None => {
                warn!("Bulk selection of {} rows refused: already busy", n);
                SelectOutcome {
                    stop: SelectStop::Refused,
                    ..SelectOutcome::new(n)
                }
            }
        };
        self.bulk_input.clear();
        outcome
    }

    async fn mark_forward(&mut self, n: usize) -> SelectOutcome {
        let mut outcome = SelectOutcome::new(n);
        if n == 0 {
            return outcome;
        }

        let current = self.pager.current_page();
        if let (LoadState::Ready, Some(page)) = (&self.load_state, &self.page) {
            for record in page.items.iter().take(n) {
                self.selection.set(record.id, true);
                outcome.marked += 1;
            }
        } else {
            // Still loading or failed: the walk fetches the current page itself
            match self.source.fetch_page(current).await {
                Ok(data) => {
                    outcome.pages_fetched += 1;
                    for record in data.items.iter().take(n) {
                        self.selection.set(record.id, true);
                        outcome.marked += 1;
                    }
                }
                Err(e) => {
                    error!("Bulk selection stopped at page {}: {}", current, e);
                    outcome.stop = SelectStop::FetchFailed { page: current, error: e };
                    return outcome;
                }
            }
        }

        let mut cursor = current + 1;
        while outcome.marked < n && cursor <= self.pager.total_pages() {
            let data = match self.source.fetch_page(cursor).await {
                Ok(data) => data,
                Err(e) => {
                    error!("Bulk selection stopped at page {}: {}", cursor, e);
                    outcome.stop = SelectStop::FetchFailed { page: cursor, error: e };
                    return outcome;
                }
            };
            outcome.pages_fetched += 1;

            for record in data.items.iter().take(n - outcome.marked) {
                self.selection.set(record.id, true);
                outcome.marked += 1;
            }
            cursor += 1;
        }

        if outcome.marked < n {
            outcome.stop = SelectStop::Exhausted;
        }
        info!("{}", outcome.summary());
        outcome
    }

    // ---- navigation -------------------------------------------------------

    /// Move to page `n` when `1 <= n <= total_pages`; anything else is ignored.
    /// A move puts the controller back into `Loading` for the new page.
    pub fn go_to_page(&mut self, n: u32) -> bool {
        if self.is_busy() || !self.pager.go_to(n) {
            return false;
        }
        self.page = None;
        self.load_state = LoadState::Loading;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.pager.current_page() + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.pager.current_page().saturating_sub(1))
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.go_to_page(self.pager.total_pages())
    }

    pub fn has_next_page(&self) -> bool {
        self.pager.has_next()
    }

    pub fn has_previous_page(&self) -> bool {
        self.pager.has_previous()
    }

    pub fn visible_page_window(&self) -> Vec<PageMarker> {
        self.pager.window()
    }

    // ---- bulk-select dropdown ---------------------------------------------

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn open_dropdown(&mut self) {
        if !self.is_busy() {
            self.dropdown_open = true;
        }
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn bulk_input(&self) -> &str {
        &self.bulk_input
    }

    pub fn push_bulk_digit(&mut self, ch: char) {
        if ch.is_ascii_digit() && self.bulk_input.len() < MAX_BULK_INPUT_LEN {
            self.bulk_input.push(ch);
        }
    }

    pub fn pop_bulk_digit(&mut self) {
        self.bulk_input.pop();
    }

    /// Run the bulk selection typed into the dropdown. Invalid or zero input
    /// selects nothing. The input is reset and the dropdown closed either way.
    pub async fn submit_bulk_select(&mut self) -> Option<SelectOutcome> {
        self.dropdown_open = false;
        match self.bulk_input.parse::<usize>() {
            Ok(n) if n > 0 => Some(self.select_first_n(n).await),
            _ => {
                debug!("Ignoring bulk selection input '{}'", self.bulk_input);
                self.bulk_input.clear();
                None
            }
        }
    }
}
