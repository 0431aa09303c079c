use sqlx::PgPool;

use super::types::{Role, RoleListItem};
use crate::models::permission::Permission;

/// All roles with their permission count, for the list page.
pub async fn find_all_list_items(pool: &PgPool) -> Result<Vec<RoleListItem>, sqlx::Error> {
    sqlx::query_as::<_, RoleListItem>(
        "SELECT r.id, r.name, r.slug, COALESCE(r.description, '') AS description, \
                (SELECT COUNT(*) FROM permission_role pr WHERE pr.role_id = r.id) AS permission_count \
         FROM roles r \
         ORDER BY r.name, r.id",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        "SELECT id, name, slug, COALESCE(description, '') AS description FROM roles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, name: &str, slug: &str, description: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO roles (name, slug, description) VALUES ($1, $2, NULLIF($3, '')) RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Permissions granted to a role, through the `permission_role` pivot.
pub async fn find_permissions(pool: &PgPool, role_id: i64) -> Result<Vec<Permission>, sqlx::Error> {
    sqlx::query_as::<_, Permission>(
        "SELECT p.id, p.name, p.slug, COALESCE(p.description, '') AS description \
         FROM permission_role pr \
         JOIN permissions p ON p.id = pr.permission_id \
         WHERE pr.role_id = $1 \
         ORDER BY p.name, p.id",
    )
    .bind(role_id)
    .fetch_all(pool)
    .await
}

pub async fn attach(pool: &PgPool, role_id: i64, permission_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO permission_role (permission_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(permission_id)
    .bind(role_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn detach(pool: &PgPool, role_id: i64, permission_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM permission_role WHERE permission_id = $1 AND role_id = $2")
        .bind(permission_id)
        .bind(role_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace the role's permission set in one transaction: delete all, re-insert selected.
pub async fn sync_permissions(pool: &PgPool, role_id: i64, permission_ids: &[i64]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM permission_role WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;
    for permission_id in permission_ids {
        sqlx::query(
            "INSERT INTO permission_role (permission_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(permission_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
