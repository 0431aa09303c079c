//! Users table endpoints. Every request restores a [`UsersTable`] from the
//! query string and the session, runs one operation, then either redirects
//! to the canonical listing URL or renders the table.

mod crud;
mod list;
mod modal;

pub use crud::{create, delete, update};
pub use list::{list, per_page, search, sort};
pub use modal::{close, open_create, open_edit, open_view};

use actix_session::Session;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse};

use crate::auth::session;
use crate::components::UsersTable;
use crate::components::url_state::UrlState;
use crate::components::users_table::BASE_PATH;
use crate::config::AppConfig;
use crate::errors::{AppError, render_with_status};
use crate::store::UserStore;
use crate::templates_structs::{PageContext, UsersTableTemplate};
use crate::validation::ValidationErrors;

/// Response header telling the client whether to push or replace the
/// browser history entry for the redirect target.
pub const HISTORY_HEADER: &str = "X-Url-History";

fn restore<'a, S: UserStore + ?Sized>(
    store: &'a S,
    config: &AppConfig,
    session: &Session,
    req: &HttpRequest,
) -> UsersTable<'a, S> {
    let url = UrlState::decode(req.query_string());
    let modal = session::load_users_modal(session);
    UsersTable::restore(store, config.locale, url, modal)
}

/// Persist modal state and notifications, then redirect to the listing.
fn finish<S: UserStore + ?Sized>(
    session: &Session,
    mut table: UsersTable<'_, S>,
    previous: &UrlState,
) -> Result<HttpResponse, AppError> {
    session::store_users_modal(session, &table.modal)?;
    session::push_notifications(session, table.take_notifications())?;
    let navigation = table.url.navigation_from(previous);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, table.url.href(BASE_PATH)))
        .insert_header((HISTORY_HEADER, navigation.as_str()))
        .finish())
}

async fn render_table<S: UserStore + ?Sized>(
    table: &UsersTable<'_, S>,
    session: &Session,
    config: &AppConfig,
    errors: &ValidationErrors,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let page = table.render().await?;
    let viewed = table.viewed_user().await?;
    let ctx = PageContext::build(session, config, BASE_PATH)?;
    let tmpl = UsersTableTemplate::new(ctx, page, &table.url, table.modal.clone(), viewed, errors);
    render_with_status(tmpl, status)
}
