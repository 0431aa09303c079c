use std::collections::HashSet;

use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::{csrf, session};
use crate::components::Notification;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::i18n::{self, Notice};
use crate::models::role::PermissionCheckbox;
use crate::store::AdminStore;
use crate::templates_structs::{PageContext, RoleListTemplate, RolePermissionsTemplate};

/// GET /admin/roles
pub async fn list<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let roles = store.list_roles().await?;
    let ctx = PageContext::build(&session, &config, "/admin/roles")?;
    render(RoleListTemplate { ctx, roles })
}

/// GET /admin/roles/{id}/permissions: checkbox per permission, checked when attached.
pub async fn permissions_form<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let role = store.find_role(path.into_inner()).await?;
    let attached: HashSet<i64> = store
        .role_permissions(role.id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    let checkboxes = store
        .all_permissions()
        .await?
        .into_iter()
        .map(|p| PermissionCheckbox { checked: attached.contains(&p.id), id: p.id, name: p.name, slug: p.slug })
        .collect();

    let ctx = PageContext::build(&session, &config, "/admin/roles")?;
    render(RolePermissionsTemplate { ctx, role, checkboxes })
}

/// Form body with repeated `permission_ids` keys, which `web::Form` cannot
/// collect into a Vec.
struct SyncForm {
    csrf_token: String,
    permission_ids: Vec<i64>,
}

fn parse_sync_form(body: &[u8]) -> SyncForm {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();
    let mut form = SyncForm { csrf_token: String::new(), permission_ids: Vec::new() };
    for (key, value) in pairs {
        match key.as_str() {
            "csrf_token" => form.csrf_token = value,
            "permission_ids" => match value.parse::<i64>() {
                Ok(id) => form.permission_ids.push(id),
                Err(_) => log::warn!("Ignoring non-numeric permission id '{value}'"),
            },
            _ => {}
        }
    }
    form
}

/// POST /admin/roles/{id}/permissions: replace the role's permission set.
pub async fn sync_permissions<S: AdminStore>(
    store: web::Data<S>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let form = parse_sync_form(&body);
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let role_id = path.into_inner();

    let known: HashSet<i64> = store.all_permissions().await?.into_iter().map(|p| p.id).collect();
    let (mut selected, unknown): (Vec<i64>, Vec<i64>) =
        form.permission_ids.into_iter().partition(|id| known.contains(id));
    selected.sort_unstable();
    selected.dedup();

    store.sync_permissions(role_id, &selected).await?;
    log::info!("Synced role {role_id} permissions: {selected:?}");

    let mut notifications = vec![Notification::success(i18n::notice_message(
        Notice::RolePermissionsSynced,
        config.locale,
    ))];
    if !unknown.is_empty() {
        log::warn!("Skipped unknown permission ids for role {role_id}: {unknown:?}");
        notifications.push(Notification::error(i18n::notice_message(
            Notice::UnknownPermissionsSkipped,
            config.locale,
        )));
    }
    session::push_notifications(&session, notifications)?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/admin/roles/{role_id}/permissions")))
        .finish())
}
