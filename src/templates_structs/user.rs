use askama::Template;

use super::{PageContext, Pager};
use crate::components::users_table::BASE_PATH;
use crate::components::{ModalState, UrlState};
use crate::models::list_query::{Page, SortDir};
use crate::models::user::UserDisplay;
use crate::validation::ValidationErrors;

pub const PER_PAGE_OPTIONS: [i64; 5] = [5, 10, 25, 50, 100];

const HEADERS: [(&str, &str); 4] = [
    ("id", "#"),
    ("name", "Name"),
    ("email", "Email"),
    ("created_at", "Created"),
];

pub struct SortHeader {
    pub label: &'static str,
    pub href: String,
    pub indicator: &'static str,
}

pub struct PerPageOption {
    pub value: i64,
    pub selected: bool,
}

/// First error message per modal field, for inline display.
#[derive(Default)]
pub struct UserFieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<&ValidationErrors> for UserFieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let first = |field: &str| errors.first(field).map(str::to_string);
        Self { name: first("name"), email: first("email"), password: first("password") }
    }
}

#[derive(Template)]
#[template(path = "users/table.html")]
pub struct UsersTableTemplate {
    pub ctx: PageContext,
    pub users: Vec<UserDisplay>,
    pub pager: Pager,
    pub search: String,
    pub per_page_options: Vec<PerPageOption>,
    pub headers: Vec<SortHeader>,
    pub modal: ModalState,
    /// Row shown in view mode, with timestamps.
    pub viewed: Option<UserDisplay>,
    pub errors: UserFieldErrors,
    /// `?query` of the current listing, appended to every form action so
    /// redirects land back on the same view.
    pub query_suffix: String,
}

impl UsersTableTemplate {
    pub fn new(
        ctx: PageContext,
        page: Page<UserDisplay>,
        url: &UrlState,
        modal: ModalState,
        viewed: Option<UserDisplay>,
        errors: &ValidationErrors,
    ) -> Self {
        let pager = Pager::new(&page, |n| url.page_href(BASE_PATH, n));
        let query = url.encode();
        let query_suffix = if query.is_empty() { String::new() } else { format!("?{query}") };
        let headers = HEADERS
            .iter()
            .map(|&(field, label)| SortHeader {
                label,
                href: format!("{BASE_PATH}/sort/{field}{query_suffix}"),
                indicator: match (url.sort_field == field, url.sort_direction) {
                    (false, _) => "",
                    (true, SortDir::Asc) => "▲",
                    (true, SortDir::Desc) => "▼",
                },
            })
            .collect();
        let per_page_options = PER_PAGE_OPTIONS
            .iter()
            .map(|&value| PerPageOption { value, selected: value == url.per_page })
            .collect();

        Self {
            ctx,
            users: page.items,
            pager,
            search: url.search.clone(),
            per_page_options,
            headers,
            modal,
            viewed,
            errors: UserFieldErrors::from(errors),
            query_suffix,
        }
    }
}
