use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::{finish, render_table, restore};
use crate::auth::csrf;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::store::AdminStore;
use crate::validation::ValidationErrors;

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct PerPageForm {
    #[serde(default)]
    pub per_page: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// GET /admin/users: render the table for the URL state in the query string.
pub async fn list<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let table = restore(store.get_ref(), &config, &session, &req);
    render_table(&table, &session, &config, &ValidationErrors::new(), StatusCode::OK).await
}

/// POST /admin/users/search
pub async fn search<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    form: web::Form<SearchForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    table.set_search(&form.search);
    finish(&session, table, &previous)
}

/// POST /admin/users/per-page: an unparseable size keeps the current one.
pub async fn per_page<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    form: web::Form<PerPageForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    if let Ok(n) = form.per_page.trim().parse::<i64>() {
        table.set_per_page(n);
    }
    finish(&session, table, &previous)
}

/// GET /admin/users/sort/{field}
pub async fn sort<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    table.sort_by(&path.into_inner());
    finish(&session, table, &previous)
}
