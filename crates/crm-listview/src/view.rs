//! List View State
//!
//! Everything one page keeps between renders: the loaded collection, the
//! committed search term and category, one page cursor per sub-list, the
//! modal, and the single error slot.

use crate::entity::{Record, Searchable};
use crate::error::{ApiError, ApiResult};
use crate::filter::filter_records;
use crate::paginate::{paginate, PageCursor};

/// Which modal is open; at most one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState<Id> {
    Closed,
    Adding,
    Editing(Id),
    Viewing(Id),
}

impl<Id> Default for ModalState<Id> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<Id: Clone> ModalState<Id> {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn editing(&self) -> Option<Id> {
        match self {
            ModalState::Editing(id) => Some(id.clone()),
            _ => None,
        }
    }

    pub fn viewing(&self) -> Option<Id> {
        match self {
            ModalState::Viewing(id) => Some(id.clone()),
            _ => None,
        }
    }
}

/// Handle for one load; only the newest one may store its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// An owned page of one sub-list, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> PageView<T> {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.total_pages)
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }
}

/// Routes a record to a sub-list: `false` → lane 0, `true` → lane 1
pub type LaneSplit<T> = fn(&T) -> bool;

#[derive(Clone)]
pub struct ListView<T: Record> {
    records: Vec<T>,
    search: String,
    category: String,
    page_size: usize,
    split: Option<LaneSplit<T>>,
    cursors: Vec<PageCursor>,
    modal: ModalState<T::Id>,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

impl<T: Record + Searchable> ListView<T> {
    /// Single paginated list
    pub fn new(page_size: usize) -> Self {
        Self::with_lanes(page_size, None, 1)
    }

    /// Two independently paginated sub-lists split by `split`
    pub fn split(page_size: usize, split: LaneSplit<T>) -> Self {
        Self::with_lanes(page_size, Some(split), 2)
    }

    fn with_lanes(page_size: usize, split: Option<LaneSplit<T>>, lanes: usize) -> Self {
        Self {
            records: Vec::new(),
            search: String::new(),
            category: String::new(),
            page_size: page_size.max(1),
            split,
            cursors: vec![PageCursor::new(); lanes],
            modal: ModalState::Closed,
            error: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn lanes(&self) -> usize {
        self.cursors.len()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    // ========================
    // Loading
    // ========================

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a load; any ticket issued earlier becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Store a load result. Returns `false` if a newer load superseded it.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<T>>) -> bool {
        if ticket.0 != self.generation {
            log::debug!("dropping superseded load {}", ticket.0);
            return false;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                self.set_records(records);
                self.error = None;
            }
            Err(e) => self.fail(&e),
        }
        true
    }

    /// Replace the collection and pull every cursor back into range
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.clamp_cursors();
    }

    /// A create/update/delete finished and returned the reloaded collection.
    /// That reload is newer than any load still in flight.
    pub fn mutation_succeeded(&mut self, records: Vec<T>) {
        self.generation += 1;
        self.loading = false;
        self.modal = ModalState::Closed;
        self.error = None;
        self.set_records(records);
    }

    // ========================
    // Filters
    // ========================

    /// Commit a search term; pages reset when it changes
    pub fn set_search(&mut self, term: &str) {
        if self.search != term {
            self.search = term.to_string();
            self.reset_pages();
        }
    }

    /// Select a category (empty = all); pages reset when it changes
    pub fn set_category(&mut self, category: &str) {
        if self.category != category {
            self.category = category.to_string();
            self.reset_pages();
        }
    }

    pub fn reset_pages(&mut self) {
        self.cursors.iter_mut().for_each(PageCursor::reset);
    }

    /// Whole filtered subset across lanes, in collection order
    pub fn filtered(&self) -> Vec<T> {
        filter_records(&self.records, &self.category, &self.search)
    }

    /// Filtered subset of one lane
    pub fn lane(&self, lane: usize) -> Vec<T> {
        let filtered = self.filtered();
        match self.split {
            Some(split) => filtered
                .into_iter()
                .filter(|record| usize::from(split(record)) == lane)
                .collect(),
            None if lane == 0 => filtered,
            None => Vec::new(),
        }
    }

    // ========================
    // Pagination
    // ========================

    pub fn page(&self, lane: usize) -> PageView<T> {
        let subset = self.lane(lane);
        let index = self.cursors.get(lane).map(PageCursor::index).unwrap_or(0);
        let page = paginate(&subset, index, self.page_size);
        PageView {
            items: page.items.to_vec(),
            page_index: page.page_index,
            total_pages: page.total_pages,
            total_items: subset.len(),
        }
    }

    pub fn next_page(&mut self, lane: usize) {
        let total = self.page(lane).total_pages;
        if let Some(cursor) = self.cursors.get_mut(lane) {
            cursor.next(total);
        }
    }

    pub fn prev_page(&mut self, lane: usize) {
        if let Some(cursor) = self.cursors.get_mut(lane) {
            cursor.prev();
        }
    }

    fn clamp_cursors(&mut self) {
        for lane in 0..self.cursors.len() {
            let total = self.page(lane).total_pages;
            self.cursors[lane].clamp(total);
        }
    }

    // ========================
    // Modal and error slot
    // ========================

    pub fn modal(&self) -> &ModalState<T::Id> {
        &self.modal
    }

    pub fn open_add(&mut self) {
        self.error = None;
        self.modal = ModalState::Adding;
    }

    pub fn open_edit(&mut self, id: T::Id) {
        self.error = None;
        self.modal = ModalState::Editing(id);
    }

    pub fn open_view(&mut self, id: T::Id) {
        self.modal = ModalState::Viewing(id);
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Record currently being edited or viewed
    pub fn selected(&self) -> Option<&T> {
        let id = match &self.modal {
            ModalState::Editing(id) | ModalState::Viewing(id) => id,
            _ => return None,
        };
        self.records.iter().find(|record| &record.id() == id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last error wins
    pub fn fail(&mut self, error: &ApiError) {
        self.error = Some(error.user_message());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
