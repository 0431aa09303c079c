use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};

use super::{finish, render_table, restore};
use crate::auth::{csrf, session};
use crate::config::AppConfig;
use crate::errors::{AdminError, AppError};
use crate::handlers::CsrfOnly;
use crate::models::user::UserForm;
use crate::store::AdminStore;

/// POST /admin/users: save the create modal.
pub async fn create<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();

    match table.create_user(&form).await {
        Ok(_) => finish(&session, table, &previous),
        Err(AdminError::Validation(errors)) => {
            // Keep the modal open with what was typed (minus passwords).
            session::store_users_modal(&session, &table.modal)?;
            render_table(&table, &session, &config, &errors, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /admin/users/update: save the edit modal for the selected user.
pub async fn update<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    req: HttpRequest,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut table = restore(store.get_ref(), &config, &session, &req);
    let previous = table.url.clone();

    match table.update_user(&form).await {
        Ok(()) => finish(&session, table, &previous),
        Err(AdminError::Validation(errors)) => {
            session::store_users_modal(&session, &table.modal)?;
            render_table(&table, &session, &config, &errors, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /admin/users/{id}/delete
pub async fn delete<S: AdminStore>(
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
    table.delete(path.into_inner()).await?;
    finish(&session, table, &previous)
}
