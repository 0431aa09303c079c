use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{PermissionStore, RoleStore, UserStore};
use crate::errors::AdminError;
use crate::models::list_query::{ListQuery, Page, SortDir};
use crate::models::permission::{NewPermission, Permission};
use crate::models::role::{Role, RoleListItem};
use crate::models::user::{NewUser, User, UserChanges, UserDisplay};

/// In-process store with the same observable behaviour as the PostgreSQL
/// queries: case-insensitive search and email matching, and stable ordering
/// with `id` as the tiebreak.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    permissions: BTreeMap<i64, Permission>,
    roles: BTreeMap<i64, Role>,
    // (permission_id, role_id)
    permission_role: BTreeSet<(i64, i64)>,
    last_user_id: i64,
    last_permission_id: i64,
    last_role_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Roles have no admin form, so tests and seeds add them directly.
    pub fn insert_role(&self, name: &str, slug: &str, description: &str) -> i64 {
        let mut tables = self.write();
        tables.last_role_id += 1;
        let id = tables.last_role_id;
        tables.roles.insert(
            id,
            Role {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                description: description.to_string(),
            },
        );
        id
    }

    pub fn user_count(&self) -> usize {
        self.read().users.len()
    }
}

fn now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Value<'a> {
    Int(i64),
    Text(&'a str),
}

/// Rows that can be searched and sorted by logical column name.
trait Listable {
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    fn value(&self, column: &str) -> Option<Value<'_>>;
}

impl Listable for User {
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "created_at", "updated_at"];

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, column: &str) -> Option<Value<'_>> {
        match column {
            "id" => Some(Value::Int(self.id)),
            "name" => Some(Value::Text(&self.name)),
            "email" => Some(Value::Text(&self.email)),
            "created_at" => Some(Value::Text(&self.created_at)),
            "updated_at" => Some(Value::Text(&self.updated_at)),
            _ => None,
        }
    }
}

impl Listable for Permission {
    const COLUMNS: &'static [&'static str] = &["id", "name", "slug"];

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, column: &str) -> Option<Value<'_>> {
        match column {
            "id" => Some(Value::Int(self.id)),
            "name" => Some(Value::Text(&self.name)),
            "slug" => Some(Value::Text(&self.slug)),
            _ => None,
        }
    }
}

fn contains_ci(value: Option<Value<'_>>, needle: &str) -> bool {
    match value {
        Some(Value::Text(text)) => text.to_lowercase().contains(needle),
        Some(Value::Int(n)) => n.to_string().contains(needle),
        None => false,
    }
}

/// Filter, sort and slice rows the way `find_paginated` does in SQL.
fn select_page<'a, T, U>(
    rows: impl Iterator<Item = &'a T>,
    query: &ListQuery,
    project: impl Fn(&T) -> U,
) -> Result<Page<U>, AdminError>
where
    T: Listable + 'a,
{
    if let Some(filter) = &query.search {
        if let Some(unknown) = filter.columns.iter().find(|c| !T::COLUMNS.contains(*c)) {
            return Err(AdminError::InvalidQuery(format!("unknown column '{unknown}'")));
        }
    }

    let mut matched: Vec<&T> = match &query.search {
        Some(filter) => {
            let needle = filter.term.to_lowercase();
            rows.filter(|row| filter.columns.iter().any(|c| contains_ci(row.value(c), &needle)))
                .collect()
        }
        None => rows.collect(),
    };

    let sort = query
        .sort
        .as_ref()
        .filter(|s| T::COLUMNS.contains(&s.column.as_str()));
    matched.sort_by(|a, b| {
        let primary = match sort {
            Some(s) => {
                let ord = a.value(&s.column).cmp(&b.value(&s.column));
                if s.dir == SortDir::Desc { ord.reverse() } else { ord }
            }
            None => Ordering::Equal,
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    });

    let total = matched.len() as i64;
    let offset = usize::try_from(query.offset()).unwrap_or(0);
    let limit = usize::try_from(query.per_page).unwrap_or(0);
    let items = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(project)
        .collect();
    Ok(Page::new(items, total, query))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<User, AdminError> {
        self.read().users.get(&id).cloned().ok_or(AdminError::NotFound)
    }

    async fn find_user_display(&self, id: i64) -> Result<UserDisplay, AdminError> {
        self.find_user(id).await.map(UserDisplay::from)
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AdminError> {
        let email = email.to_lowercase();
        Ok(self
            .read()
            .users
            .values()
            .any(|u| Some(u.id) != except_id && u.email.to_lowercase() == email))
    }

    async fn create_user(&self, new: &NewUser) -> Result<i64, AdminError> {
        let mut tables = self.write();
        tables.last_user_id += 1;
        let id = tables.last_user_id;
        let stamp = now();
        tables.users.insert(
            id,
            User {
                id,
                name: new.name.clone(),
                email: new.email.clone(),
                password: new.password.clone(),
                created_at: stamp.clone(),
                updated_at: stamp,
            },
        );
        Ok(id)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<(), AdminError> {
        let mut tables = self.write();
        let user = tables.users.get_mut(&id).ok_or(AdminError::NotFound)?;
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        if let Some(hash) = &changes.password {
            user.password = hash.clone();
        }
        user.updated_at = now();
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), AdminError> {
        self.write()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(AdminError::NotFound)
    }

    async fn list_users(&self, query: &ListQuery) -> Result<Page<UserDisplay>, AdminError> {
        let tables = self.read();
        select_page(tables.users.values(), query, |u| UserDisplay::from(u.clone()))
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_permission(&self, id: i64) -> Result<Permission, AdminError> {
        self.read().permissions.get(&id).cloned().ok_or(AdminError::NotFound)
    }

    async fn all_permissions(&self) -> Result<Vec<Permission>, AdminError> {
        let mut all: Vec<Permission> = self.read().permissions.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, AdminError> {
        Ok(self.read().permissions.values().any(|p| p.slug == slug))
    }

    async fn create_permission(&self, new: &NewPermission) -> Result<i64, AdminError> {
        let mut tables = self.write();
        tables.last_permission_id += 1;
        let id = tables.last_permission_id;
        tables.permissions.insert(
            id,
            Permission {
                id,
                name: new.name.clone(),
                slug: new.slug.clone(),
                description: new.description.clone(),
            },
        );
        Ok(id)
    }

    async fn permission_roles(&self, permission_id: i64) -> Result<Vec<Role>, AdminError> {
        let tables = self.read();
        if !tables.permissions.contains_key(&permission_id) {
            return Err(AdminError::NotFound);
        }
        let mut roles: Vec<Role> = tables
            .permission_role
            .iter()
            .filter(|(p, _)| *p == permission_id)
            .filter_map(|(_, r)| tables.roles.get(r).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(roles)
    }

    async fn list_permissions(&self, query: &ListQuery) -> Result<Page<Permission>, AdminError> {
        let tables = self.read();
        select_page(tables.permissions.values(), query, Permission::clone)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn list_roles(&self) -> Result<Vec<RoleListItem>, AdminError> {
        let tables = self.read();
        let mut items: Vec<RoleListItem> = tables
            .roles
            .values()
            .map(|r| RoleListItem {
                id: r.id,
                name: r.name.clone(),
                slug: r.slug.clone(),
                description: r.description.clone(),
                permission_count: tables.permission_role.iter().filter(|(_, role)| *role == r.id).count()
                    as i64,
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn find_role(&self, id: i64) -> Result<Role, AdminError> {
        self.read().roles.get(&id).cloned().ok_or(AdminError::NotFound)
    }

    async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>, AdminError> {
        let tables = self.read();
        if !tables.roles.contains_key(&role_id) {
            return Err(AdminError::NotFound);
        }
        let mut permissions: Vec<Permission> = tables
            .permission_role
            .iter()
            .filter(|(_, r)| *r == role_id)
            .filter_map(|(p, _)| tables.permissions.get(p).cloned())
            .collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(permissions)
    }

    async fn attach_permission(&self, role_id: i64, permission_id: i64) -> Result<(), AdminError> {
        let mut tables = self.write();
        if !tables.roles.contains_key(&role_id) || !tables.permissions.contains_key(&permission_id) {
            return Err(AdminError::NotFound);
        }
        tables.permission_role.insert((permission_id, role_id));
        Ok(())
    }

    async fn detach_permission(&self, role_id: i64, permission_id: i64) -> Result<(), AdminError> {
        self.write().permission_role.remove(&(permission_id, role_id));
        Ok(())
    }

    async fn sync_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<(), AdminError> {
        let mut tables = self.write();
        if !tables.roles.contains_key(&role_id) {
            return Err(AdminError::NotFound);
        }
        if permission_ids.iter().any(|id| !tables.permissions.contains_key(id)) {
            return Err(AdminError::NotFound);
        }
        tables.permission_role.retain(|(_, r)| *r != role_id);
        for permission_id in permission_ids {
            tables.permission_role.insert((*permission_id, role_id));
        }
        Ok(())
    }
}
