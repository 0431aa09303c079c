use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::templates_structs::{CommentIndexTemplate, PageContext};

pub async fn index(config: web::Data<AppConfig>, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &config, "/admin/comments")?;
    render(CommentIndexTemplate { ctx })
}
