// Query state and pagination arithmetic

use sitelens_client::{ListQuery, SortColumn, SortDirection, SortSpec};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// What the list view is currently asking the backend for.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    current_page: u32,
    page_size: u32,
    search_text: String,
    sort: SortSpec,
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            search_text: String::new(),
            sort: SortSpec::by(SortColumn::CreatedAt, SortDirection::Descending),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Pages are 1-based; zero is treated as the first page.
    pub fn set_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn to_list_query(&self) -> ListQuery {
        ListQuery {
            page: self.current_page,
            page_size: self.page_size,
            query: self.search_text.clone(),
            sorting: self.sort.clone(),
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Snapshot of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total_count: u64, page_size: u32) -> Self {
        Self {
            current_page,
            total_pages: total_pages(total_count, page_size),
            total_count,
            page_size,
        }
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn prev(&self) -> Option<u32> {
        self.can_prev().then(|| self.current_page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.can_next().then(|| self.current_page + 1)
    }

    /// A page other than the current one, if it exists.
    pub fn jump(&self, page: u32) -> Option<u32> {
        (page >= 1 && page <= self.total_pages && page != self.current_page).then_some(page)
    }

    pub fn page_numbers(&self) -> impl Iterator<Item = u32> {
        1..=self.total_pages
    }

    /// One-based first and last entry shown on the current page.
    pub fn showing(&self) -> Option<(u64, u64)> {
        if self.total_count == 0 || self.page_size == 0 || self.current_page == 0 {
            return None;
        }
        let size = self.page_size as u64;
        let first = (self.current_page as u64 - 1) * size + 1;
        if first > self.total_count {
            return None;
        }
        Some((first, (self.current_page as u64 * size).min(self.total_count)))
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(page_size as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
