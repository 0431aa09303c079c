use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, session};
use crate::components::Notification;
use crate::config::AppConfig;
use crate::errors::{AppError, render, render_with_status};
use crate::i18n::{self, Notice};
use crate::models::list_query::{ListQuery, SortDir};
use crate::models::permission::{NewPermission, PermissionForm, scopes};
use crate::store::AdminStore;
use crate::templates_structs::{PageContext, Pager, PermissionDetailTemplate, PermissionFieldErrors, PermissionListTemplate};
use crate::validation::{self, ValidationErrors};

pub const PERMISSIONS_PER_PAGE: i64 = 10;

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("").trim()
    }

    fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1)
    }
}

fn list_href(search: &str, page: i64) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    if !search.is_empty() {
        pairs.push(("search", search.to_string()));
    }
    if page > 1 {
        pairs.push(("page", page.to_string()));
    }
    let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    if query.is_empty() { "/admin/permissions".to_string() } else { format!("/admin/permissions?{query}") }
}

#[allow(clippy::too_many_arguments)]
async fn render_list<S: AdminStore>(
    store: &S,
    config: &AppConfig,
    session: &Session,
    search: &str,
    page: i64,
    form: PermissionForm,
    errors: &ValidationErrors,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let query = scopes::search(ListQuery::new(), search)
        .order_by("name", SortDir::Asc)
        .paginate(page, PERMISSIONS_PER_PAGE);
    let result = store.list_permissions(&query).await?;
    let pager = Pager::new(&result, |n| list_href(search, n));
    let ctx = PageContext::build(session, config, "/admin/permissions")?;
    let tmpl = PermissionListTemplate {
        ctx,
        permissions: result.items,
        pager,
        search: search.to_string(),
        form,
        errors: PermissionFieldErrors::from(errors),
    };
    render_with_status(tmpl, status)
}

/// GET /admin/permissions?search=...&page=N
pub async fn list<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    render_list(
        store.get_ref(),
        &config,
        &session,
        params.search(),
        params.page(),
        PermissionForm::default(),
        &ValidationErrors::new(),
        StatusCode::OK,
    )
    .await
}

/// GET /admin/permissions/{id}: the permission and the roles holding it.
pub async fn show<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let permission = store.find_permission(id).await?;
    let roles = store.permission_roles(id).await?;
    let ctx = PageContext::build(&session, &config, "/admin/permissions")?;
    render(PermissionDetailTemplate { ctx, permission, roles })
}

/// POST /admin/permissions
pub async fn create<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<PermissionForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let new = NewPermission {
        name: form.name.trim().to_string(),
        slug: form.slug.trim().to_string(),
        description: form.description.trim().to_string(),
    };
    let slug_taken = !new.slug.is_empty() && store.slug_taken(&new.slug).await?;
    if let Err(errors) = validation::validate_new_permission(&new.name, &new.slug, slug_taken, config.locale) {
        return render_list(
            store.get_ref(),
            &config,
            &session,
            "",
            1,
            form,
            &errors,
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .await;
    }

    let id = store.create_permission(&new).await?;
    log::info!("Created permission {id} '{}'", new.slug);

    let message = i18n::notice_message(Notice::PermissionCreated, config.locale);
    session::push_notifications(&session, vec![Notification::success(message)])?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/admin/permissions"))
        .finish())
}
