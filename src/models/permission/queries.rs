use sqlx::PgPool;

use super::scopes;
use super::types::{NewPermission, Permission};
use crate::errors::AdminError;
use crate::models::list_query::{ListQuery, Page, builder};
use crate::models::role::Role;

const SELECT_PERMISSION: &str = "\
    SELECT permissions.id, permissions.name, permissions.slug, \
           COALESCE(permissions.description, '') AS description \
    FROM permissions";

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Permission>, sqlx::Error> {
    let sql = format!("{SELECT_PERMISSION} WHERE permissions.id = $1");
    sqlx::query_as::<_, Permission>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
    let sql = format!("{SELECT_PERMISSION} ORDER BY permissions.name, permissions.id");
    sqlx::query_as::<_, Permission>(&sql).fetch_all(pool).await
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM permissions WHERE slug = $1)")
        .bind(slug)
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &PgPool, new: &NewPermission) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO permissions (name, slug, description) VALUES ($1, $2, NULLIF($3, '')) RETURNING id",
    )
    .bind(&new.name)
    .bind(&new.slug)
    .bind(&new.description)
    .fetch_one(pool)
    .await
}

/// Roles holding this permission, through the `permission_role` pivot.
pub async fn find_roles(pool: &PgPool, permission_id: i64) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.slug, COALESCE(r.description, '') AS description \
         FROM permission_role pr \
         JOIN roles r ON r.id = pr.role_id \
         WHERE pr.permission_id = $1 \
         ORDER BY r.name, r.id",
    )
    .bind(permission_id)
    .fetch_all(pool)
    .await
}

/// Find permissions with search, sort and pagination.
pub async fn find_paginated(pool: &PgPool, query: &ListQuery) -> Result<Page<Permission>, AdminError> {
    let (where_clause, params) = builder::search_clause(query.search.as_ref(), scopes::column, 0)
        .map_err(|e| AdminError::InvalidQuery(e.to_string()))?;
    let order = builder::order_clause(query.sort.as_ref(), scopes::column, "permissions.id");

    let count_sql = format!("SELECT COUNT(*) FROM permissions WHERE {where_clause}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for p in &params {
        count_query = count_query.bind(p);
    }
    let total = count_query.fetch_one(pool).await?;

    let n = params.len();
    let data_sql = format!(
        "{SELECT_PERMISSION} WHERE {where_clause} ORDER BY {order} LIMIT ${} OFFSET ${}",
        n + 1,
        n + 2
    );
    let mut data_query = sqlx::query_as::<_, Permission>(&data_sql);
    for p in &params {
        data_query = data_query.bind(p);
    }
    let items = data_query
        .bind(query.per_page)
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, total, query))
}
