use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Row for the roles list page.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RoleListItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub permission_count: i64,
}

/// A permission with its checked state for the role assignment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheckbox {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub checked: bool,
}
