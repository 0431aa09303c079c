//! Persistence ports for the admin screens.
//!
//! Handlers and the users table component only talk to these traits, so the
//! same code runs against PostgreSQL in production and against
//! [`MemoryStore`] in tests.

use async_trait::async_trait;

use crate::errors::AdminError;
use crate::models::list_query::{ListQuery, Page};
use crate::models::permission::{NewPermission, Permission};
use crate::models::role::{Role, RoleListItem};
use crate::models::user::{NewUser, User, UserChanges, UserDisplay};

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Full row including the password hash. `NotFound` when absent.
    async fn find_user(&self, id: i64) -> Result<User, AdminError>;

    async fn find_user_display(&self, id: i64) -> Result<UserDisplay, AdminError>;

    /// Case-insensitive email lookup, ignoring `except_id`.
    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AdminError>;

    async fn create_user(&self, new: &NewUser) -> Result<i64, AdminError>;

    /// `NotFound` when the row no longer exists.
    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<(), AdminError>;

    async fn delete_user(&self, id: i64) -> Result<(), AdminError>;

    async fn list_users(&self, query: &ListQuery) -> Result<Page<UserDisplay>, AdminError>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_permission(&self, id: i64) -> Result<Permission, AdminError>;

    async fn all_permissions(&self) -> Result<Vec<Permission>, AdminError>;

    async fn slug_taken(&self, slug: &str) -> Result<bool, AdminError>;

    async fn create_permission(&self, new: &NewPermission) -> Result<i64, AdminError>;

    /// Roles holding the permission. `NotFound` when the permission is absent.
    async fn permission_roles(&self, permission_id: i64) -> Result<Vec<Role>, AdminError>;

    async fn list_permissions(&self, query: &ListQuery) -> Result<Page<Permission>, AdminError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<RoleListItem>, AdminError>;

    async fn find_role(&self, id: i64) -> Result<Role, AdminError>;

    async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>, AdminError>;

    /// Idempotent: attaching an existing pair is a no-op.
    async fn attach_permission(&self, role_id: i64, permission_id: i64) -> Result<(), AdminError>;

    async fn detach_permission(&self, role_id: i64, permission_id: i64) -> Result<(), AdminError>;

    /// Replace the role's whole permission set atomically.
    async fn sync_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<(), AdminError>;
}

/// Everything the admin handlers need from storage.
pub trait AdminStore: UserStore + PermissionStore + RoleStore + 'static {}

impl<T> AdminStore for T where T: UserStore + PermissionStore + RoleStore + 'static {}
