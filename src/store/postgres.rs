use async_trait::async_trait;
use sqlx::PgPool;

use super::{PermissionStore, RoleStore, UserStore};
use crate::errors::AdminError;
use crate::models::list_query::{ListQuery, Page};
use crate::models::permission::{self, NewPermission, Permission};
use crate::models::role::{self, Role, RoleListItem};
use crate::models::user::{self, NewUser, User, UserChanges, UserDisplay};

fn found<T>(row: Option<T>) -> Result<T, AdminError> {
    row.ok_or(AdminError::NotFound)
}

fn affected(changed: bool) -> Result<(), AdminError> {
    if changed { Ok(()) } else { Err(AdminError::NotFound) }
}

#[async_trait]
impl UserStore for PgPool {
    async fn find_user(&self, id: i64) -> Result<User, AdminError> {
        found(user::find_by_id(self, id).await?)
    }

    async fn find_user_display(&self, id: i64) -> Result<UserDisplay, AdminError> {
        found(user::find_display_by_id(self, id).await?)
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AdminError> {
        Ok(user::email_exists(self, email, except_id).await?)
    }

    async fn create_user(&self, new: &NewUser) -> Result<i64, AdminError> {
        Ok(user::create(self, new).await?)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<(), AdminError> {
        affected(user::update(self, id, changes).await?)
    }

    async fn delete_user(&self, id: i64) -> Result<(), AdminError> {
        affected(user::delete(self, id).await?)
    }

    async fn list_users(&self, query: &ListQuery) -> Result<Page<UserDisplay>, AdminError> {
        user::find_paginated(self, query).await
    }
}

#[async_trait]
impl PermissionStore for PgPool {
    async fn find_permission(&self, id: i64) -> Result<Permission, AdminError> {
        found(permission::find_by_id(self, id).await?)
    }

    async fn all_permissions(&self) -> Result<Vec<Permission>, AdminError> {
        Ok(permission::find_all(self).await?)
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, AdminError> {
        Ok(permission::slug_exists(self, slug).await?)
    }

    async fn create_permission(&self, new: &NewPermission) -> Result<i64, AdminError> {
        Ok(permission::create(self, new).await?)
    }

    async fn permission_roles(&self, permission_id: i64) -> Result<Vec<Role>, AdminError> {
        found(permission::find_by_id(self, permission_id).await?)?;
        Ok(permission::find_roles(self, permission_id).await?)
    }

    async fn list_permissions(&self, query: &ListQuery) -> Result<Page<Permission>, AdminError> {
        permission::find_paginated(self, query).await
    }
}

#[async_trait]
impl RoleStore for PgPool {
    async fn list_roles(&self) -> Result<Vec<RoleListItem>, AdminError> {
        Ok(role::find_all_list_items(self).await?)
    }

    async fn find_role(&self, id: i64) -> Result<Role, AdminError> {
        found(role::find_by_id(self, id).await?)
    }

    async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>, AdminError> {
        found(role::find_by_id(self, role_id).await?)?;
        Ok(role::find_permissions(self, role_id).await?)
    }

    async fn attach_permission(&self, role_id: i64, permission_id: i64) -> Result<(), AdminError> {
        found(role::find_by_id(self, role_id).await?)?;
        found(permission::find_by_id(self, permission_id).await?)?;
        Ok(role::attach(self, role_id, permission_id).await?)
    }

    async fn detach_permission(&self, role_id: i64, permission_id: i64) -> Result<(), AdminError> {
        Ok(role::detach(self, role_id, permission_id).await?)
    }

    async fn sync_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<(), AdminError> {
        found(role::find_by_id(self, role_id).await?)?;
        Ok(role::sync_permissions(self, role_id, permission_ids).await?)
    }
}
