pub mod comment_handlers;
pub mod permission_handlers;
pub mod role_handlers;
pub mod user_handlers;

use actix_web::web;
use serde::Deserialize;

use crate::store::AdminStore;

/// Body of forms that only carry the CSRF token (buttons).
#[derive(Deserialize)]
pub struct CsrfOnly {
    #[serde(default)]
    pub csrf_token: String,
}

/// Register the admin routes for one store type.
///
/// The app must provide `web::Data<S>` and `web::Data<AppConfig>`.
pub fn configure<S: AdminStore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            // Users table
            .route("/users", web::get().to(user_handlers::list::<S>))
            .route("/users", web::post().to(user_handlers::create::<S>))
            .route("/users/search", web::post().to(user_handlers::search::<S>))
            .route("/users/per-page", web::post().to(user_handlers::per_page::<S>))
            .route("/users/sort/{field}", web::get().to(user_handlers::sort::<S>))
            .route("/users/update", web::post().to(user_handlers::update::<S>))
            .route("/users/modal/create", web::post().to(user_handlers::open_create::<S>))
            .route("/users/modal/close", web::post().to(user_handlers::close::<S>))
            .route("/users/{id}/modal/edit", web::post().to(user_handlers::open_edit::<S>))
            .route("/users/{id}/modal/view", web::post().to(user_handlers::open_view::<S>))
            .route("/users/{id}/delete", web::post().to(user_handlers::delete::<S>))
            // Permissions
            .route("/permissions", web::get().to(permission_handlers::list::<S>))
            .route("/permissions", web::post().to(permission_handlers::create::<S>))
            .route("/permissions/{id}", web::get().to(permission_handlers::show::<S>))
            // Roles
            .route("/roles", web::get().to(role_handlers::list::<S>))
            .route("/roles/{id}/permissions", web::get().to(role_handlers::permissions_form::<S>))
            .route("/roles/{id}/permissions", web::post().to(role_handlers::sync_permissions::<S>))
            // Comments
            .route("/comments", web::get().to(comment_handlers::index)),
    );
}
