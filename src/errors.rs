use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;

use crate::validation::ValidationErrors;

/// Failures of admin operations, independent of the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),
    #[error("invalid list query: {0}")]
    InvalidQuery(String),
    #[error("password hash error: {0}")]
    Hash(String),
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::Validation(errors)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
    #[error("session error: {0}")]
    Session(String),
    #[error("invalid or missing CSRF token")]
    Csrf,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Admin(AdminError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Admin(AdminError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Csrf => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Admin(AdminError::NotFound) => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(include_str!("../templates/errors/404.html")),
            AppError::Admin(AdminError::Validation(errors)) => {
                HttpResponse::UnprocessableEntity().body(errors.to_string())
            }
            AppError::Csrf => {
                log::warn!("{self}");
                HttpResponse::Forbidden().body("Invalid or missing CSRF token")
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

/// Render a template into a 200 HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    render_with_status(tmpl, StatusCode::OK)
}

pub fn render_with_status(tmpl: impl Template, status: StatusCode) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}
