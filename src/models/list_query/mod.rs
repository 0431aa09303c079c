use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod builder;

pub const DEFAULT_PER_PAGE: i64 = 5;
pub const MAX_PER_PAGE: i64 = 100;
/// Highest page number accepted; keeps `(page - 1) * per_page` in range.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;
/// Numbered links shown on each side of the current page.
pub const PAGE_WINDOW: i64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub dir: SortDir,
}

/// Substring match of `term` against any of `columns` (logical column names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub columns: Vec<&'static str>,
    pub term: String,
}

/// Store-agnostic description of one list request: optional search, sort
/// and the page window. Built with the chaining methods below and the
/// per-entity scope functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<SearchFilter>,
    pub sort: Option<SortSpec>,
    pub page: i64,
    pub per_page: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { search: None, sort: None, page: 1, per_page: DEFAULT_PER_PAGE }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to rows where any of `columns` contains `term`. A blank term
    /// leaves the query unfiltered.
    pub fn where_any_contains(mut self, columns: &[&'static str], term: &str) -> Self {
        let term = term.trim();
        self.search = if term.is_empty() || columns.is_empty() {
            None
        } else {
            Some(SearchFilter { columns: columns.to_vec(), term: term.to_string() })
        };
        self
    }

    pub fn order_by(mut self, column: &str, dir: SortDir) -> Self {
        self.sort = Some(SortSpec { column: column.to_string(), dir });
        self
    }

    /// Set the page window; page is clamped to `1..=MAX_PAGE`, page size to
    /// `1..=MAX_PER_PAGE`.
    pub fn paginate(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.clamp(1, MAX_PAGE);
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of results plus the totals needed for pagination links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: &ListQuery) -> Self {
        Self { items, total, per_page: query.per_page, current_page: query.page }
    }

    /// Number of the last page; an empty result still has one page.
    pub fn last_page(&self) -> i64 {
        if self.per_page <= 0 {
            return 1;
        }
        ((self.total + self.per_page - 1) / self.per_page).max(1)
    }

    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_item(&self) -> i64 {
        if self.items.is_empty() {
            return 0;
        }
        (self.current_page - 1).saturating_mul(self.per_page).saturating_add(1)
    }

    pub fn last_item(&self) -> i64 {
        if self.items.is_empty() { 0 } else { self.first_item() + self.items.len() as i64 - 1 }
    }

    /// Page numbers within `PAGE_WINDOW` of the current page.
    pub fn page_numbers(&self) -> Vec<i64> {
        let last = self.last_page();
        let current = self.current_page.clamp(1, last);
        let start = current.saturating_sub(PAGE_WINDOW).max(1);
        let end = current.saturating_add(PAGE_WINDOW).min(last);
        (start..=end).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
