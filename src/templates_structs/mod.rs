// Template context structures for Askama templates, organized by screen.

use actix_session::Session;

use crate::auth::{csrf, session};
use crate::components::Notification;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::list_query::Page;

mod comment;
mod permission;
mod role;
mod user;

pub use comment::*;
pub use permission::*;
pub use role::*;
pub use user::*;

/// Common context shared by all admin pages.
/// Templates access these as `ctx.app_name`, `ctx.notifications`, etc.
pub struct PageContext {
    pub app_name: String,
    pub lang: &'static str,
    pub csrf_token: String,
    pub notifications: Vec<Notification>,
    pub current_path: String,
}

impl PageContext {
    /// Drains pending notifications from the session, so build it once per
    /// rendered page.
    pub fn build(session: &Session, config: &AppConfig, current_path: &str) -> Result<Self, AppError> {
        Ok(Self {
            app_name: config.app_name.clone(),
            lang: config.locale.tag(),
            csrf_token: csrf::get_or_create_token(session)?,
            notifications: session::take_notifications(session),
            current_path: current_path.to_string(),
        })
    }

    /// Whether the navigation link for `prefix` is the active one.
    pub fn is_active(&self, prefix: &str) -> bool {
        self.current_path.starts_with(prefix)
    }
}

/// One numbered link in a pagination bar.
pub struct PageLink {
    pub number: i64,
    pub href: String,
    pub current: bool,
}

pub fn page_links<T>(page: &Page<T>, href: impl Fn(i64) -> String) -> Vec<PageLink> {
    page.page_numbers()
        .into_iter()
        .map(|number| PageLink { number, href: href(number), current: number == page.current_page })
        .collect()
}

/// Previous/next links, `None` at either end.
pub struct Pager {
    pub links: Vec<PageLink>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub first_item: i64,
    pub last_item: i64,
    pub total: i64,
}

impl Pager {
    pub fn new<T>(page: &Page<T>, href: impl Fn(i64) -> String) -> Self {
        let previous = (!page.on_first_page()).then(|| href(page.current_page - 1));
        let next = page.has_more_pages().then(|| href(page.current_page + 1));
        Self {
            links: page_links(page, &href),
            previous,
            next,
            first_item: page.first_item(),
            last_item: page.last_item(),
            total: page.total,
        }
    }
}
