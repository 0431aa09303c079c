use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewPermission {
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Form data from the "new permission" form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermissionForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub csrf_token: String,
}
