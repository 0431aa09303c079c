use askama::Template;

use super::PageContext;
use crate::models::role::{PermissionCheckbox, Role, RoleListItem};

#[derive(Template)]
#[template(path = "roles/list.html")]
pub struct RoleListTemplate {
    pub ctx: PageContext,
    pub roles: Vec<RoleListItem>,
}

#[derive(Template)]
#[template(path = "roles/permissions.html")]
pub struct RolePermissionsTemplate {
    pub ctx: PageContext,
    pub role: Role,
    pub checkboxes: Vec<PermissionCheckbox>,
}
