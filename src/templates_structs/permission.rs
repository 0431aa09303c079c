use askama::Template;

use super::{PageContext, Pager};
use crate::models::permission::{Permission, PermissionForm};
use crate::models::role::Role;
use crate::validation::ValidationErrors;

#[derive(Default)]
pub struct PermissionFieldErrors {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl From<&ValidationErrors> for PermissionFieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            name: errors.first("name").map(str::to_string),
            slug: errors.first("slug").map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "permissions/list.html")]
pub struct PermissionListTemplate {
    pub ctx: PageContext,
    pub permissions: Vec<Permission>,
    pub pager: Pager,
    pub search: String,
    pub form: PermissionForm,
    pub errors: PermissionFieldErrors,
}

#[derive(Template)]
#[template(path = "permissions/show.html")]
pub struct PermissionDetailTemplate {
    pub ctx: PageContext,
    pub permission: Permission,
    pub roles: Vec<Role>,
}
