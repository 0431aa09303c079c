use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use super::{finish, restore};
use crate::auth::csrf;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::handlers::CsrfOnly;
use crate::store::AdminStore;

pub async fn open_create<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    table.open_create_modal();
    finish(&session, table, &previous)
}

pub async fn open_edit<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    table.open_edit_modal(path.into_inner()).await?;
    finish(&session, table, &previous)
}

pub async fn open_view<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    table.open_view_modal(path.into_inner()).await?;
    finish(&session, table, &previous)
}

pub async fn close<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();
    table.close_modal();
    finish(&session, table, &previous)
}
