//! Navigable state of the users table, carried in the query string.
//!
//! Keys are `search`, `perPage`, `sortField`, `sortDirection` and `page`.
//! Fields at their default value are left out of the encoded string, and a
//! value that does not parse falls back to its default instead of failing
//! the whole request.

use serde::{Deserialize, Serialize};

pub use crate::models::list_query::DEFAULT_PER_PAGE;
use crate::models::list_query::{MAX_PAGE, MAX_PER_PAGE, SortDir};
use crate::models::user::scopes;

pub const DEFAULT_SORT_FIELD: &str = "name";
pub const DEFAULT_SORT_DIRECTION: SortDir = SortDir::Desc;

/// How a state change should be reflected in browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Push,
    Replace,
}

impl Navigation {
    pub fn as_str(self) -> &'static str {
        match self {
            Navigation::Push => "push",
            Navigation::Replace => "replace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    Search,
    PerPage,
    SortField,
    SortDirection,
    Page,
}

impl UrlField {
    pub const ALL: [UrlField; 5] = [
        UrlField::Search,
        UrlField::PerPage,
        UrlField::SortField,
        UrlField::SortDirection,
        UrlField::Page,
    ];

    pub fn key(self) -> &'static str {
        match self {
            UrlField::Search => "search",
            UrlField::PerPage => "perPage",
            UrlField::SortField => "sortField",
            UrlField::SortDirection => "sortDirection",
            UrlField::Page => "page",
        }
    }

    /// Page size changes replace the current history entry; everything else
    /// pushes a new one.
    pub fn history(self) -> Navigation {
        match self {
            UrlField::PerPage => Navigation::Replace,
            _ => Navigation::Push,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlState {
    pub search: String,
    pub per_page: i64,
    pub sort_field: String,
    pub sort_direction: SortDir,
    pub page: i64,
}

impl Default for UrlState {
    fn default() -> Self {
        Self {
            search: String::new(),
            per_page: DEFAULT_PER_PAGE,
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_direction: DEFAULT_SORT_DIRECTION,
            page: 1,
        }
    }
}

/// Query string as received; every value is optional and unparsed.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawState {
    search: Option<String>,
    #[serde(rename = "perPage")]
    per_page: Option<String>,
    #[serde(rename = "sortField")]
    sort_field: Option<String>,
    #[serde(rename = "sortDirection")]
    sort_direction: Option<String>,
    page: Option<String>,
}

impl UrlState {
    /// Parse a query string (without the leading `?`).
    pub fn decode(query: &str) -> Self {
        let raw: RawState = match serde_urlencoded::from_str(query) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("Ignoring malformed users table query '{query}': {e}");
                return Self::default();
            }
        };
        let defaults = Self::default();

        let per_page = raw
            .per_page
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| (1..=MAX_PER_PAGE).contains(n))
            .unwrap_or(defaults.per_page);
        let sort_field = raw
            .sort_field
            .filter(|f| scopes::is_sortable(f))
            .unwrap_or(defaults.sort_field);
        let sort_direction = raw
            .sort_direction
            .and_then(|d| d.parse::<SortDir>().ok())
            .unwrap_or(defaults.sort_direction);
        let page = raw
            .page
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .map(|n| n.min(MAX_PAGE))
            .unwrap_or(defaults.page);

        Self {
            search: raw.search.unwrap_or(defaults.search),
            per_page,
            sort_field,
            sort_direction,
            page,
        }
    }

    /// Encode non-default fields in a fixed key order.
    pub fn encode(&self) -> String {
        let defaults = Self::default();
        let mut pairs: Vec<(&str, String)> = Vec::new();
        for field in UrlField::ALL {
            if self.differs(&defaults, field) {
                pairs.push((field.key(), self.value(field)));
            }
        }
        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }

    /// `base` with the encoded state appended, if any.
    pub fn href(&self, base: &str) -> String {
        let query = self.encode();
        if query.is_empty() { base.to_string() } else { format!("{base}?{query}") }
    }

    /// Link to another page of the same listing.
    pub fn page_href(&self, base: &str, page: i64) -> String {
        let mut next = self.clone();
        next.page = page.max(1);
        next.href(base)
    }

    /// Whether moving from `previous` to `self` adds a history entry.
    pub fn navigation_from(&self, previous: &UrlState) -> Navigation {
        let pushes = UrlField::ALL
            .into_iter()
            .any(|f| f.history() == Navigation::Push && self.differs(previous, f));
        if pushes { Navigation::Push } else { Navigation::Replace }
    }

    fn differs(&self, other: &UrlState, field: UrlField) -> bool {
        match field {
            UrlField::Search => self.search != other.search,
            UrlField::PerPage => self.per_page != other.per_page,
            UrlField::SortField => self.sort_field != other.sort_field,
            UrlField::SortDirection => self.sort_direction != other.sort_direction,
            UrlField::Page => self.page != other.page,
        }
    }

    fn value(&self, field: UrlField) -> String {
        match field {
            UrlField::Search => self.search.clone(),
            UrlField::PerPage => self.per_page.to_string(),
            UrlField::SortField => self.sort_field.clone(),
            UrlField::SortDirection => self.sort_direction.to_string(),
            UrlField::Page => self.page.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_encode_to_nothing() {
        assert_eq!(UrlState::default().encode(), "");
        assert_eq!(UrlState::default().href("/admin/users"), "/admin/users");
    }

    #[test]
    fn encodes_only_changed_fields() {
        let state = UrlState {
            search: "ali ce".into(),
            sort_direction: SortDir::Asc,
            page: 2,
            ..UrlState::default()
        };
        assert_eq!(state.encode(), "search=ali+ce&sortDirection=asc&page=2");
        assert_eq!(UrlState::decode(&state.encode()), state);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let state = UrlState::decode("perPage=abc&sortField=password&sortDirection=up&page=-3&search=bob");
        assert_eq!(state.per_page, DEFAULT_PER_PAGE);
        assert_eq!(state.sort_field, "name");
        assert_eq!(state.sort_direction, SortDir::Desc);
        assert_eq!(state.page, 1);
        assert_eq!(state.search, "bob");

        assert_eq!(UrlState::decode("perPage=1000").per_page, DEFAULT_PER_PAGE);
        assert_eq!(UrlState::decode("page=9223372036854775807").page, MAX_PAGE);
        assert_eq!(UrlState::decode("unrelated=1"), UrlState::default());
    }

    #[test]
    fn per_page_alone_replaces_history() {
        let before = UrlState::default();
        let after = UrlState { per_page: 25, ..before.clone() };
        assert_eq!(after.navigation_from(&before), Navigation::Replace);

        let searched = UrlState { search: "x".into(), ..before.clone() };
        assert_eq!(searched.navigation_from(&before), Navigation::Push);
        assert_eq!(UrlField::PerPage.history(), Navigation::Replace);
        assert_eq!(UrlField::SortField.history(), Navigation::Push);
    }

    #[test]
    fn page_href_keeps_other_fields() {
        let state = UrlState { search: "bob".into(), ..UrlState::default() };
        assert_eq!(state.page_href("/admin/users", 3), "/admin/users?search=bob&page=3");
        assert_eq!(state.page_href("/admin/users", 1), "/admin/users?search=bob");
    }
}
