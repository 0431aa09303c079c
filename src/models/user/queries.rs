use sqlx::PgPool;

use super::scopes;
use super::types::{NewUser, User, UserChanges, UserDisplay};
use crate::errors::AdminError;
use crate::models::list_query::{ListQuery, Page, builder};

const SELECT_USER: &str = "\
    SELECT users.id, users.name, users.email, users.password, \
           to_char(users.created_at, 'YYYY-MM-DD HH24:MI') AS created_at, \
           to_char(users.updated_at, 'YYYY-MM-DD HH24:MI') AS updated_at \
    FROM users";

const SELECT_USER_DISPLAY: &str = "\
    SELECT users.id, users.name, users.email, \
           to_char(users.created_at, 'YYYY-MM-DD HH24:MI') AS created_at, \
           to_char(users.updated_at, 'YYYY-MM-DD HH24:MI') AS updated_at \
    FROM users";

/// Find a user by id, including the password hash.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("{SELECT_USER} WHERE users.id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_display_by_id(pool: &PgPool, id: i64) -> Result<Option<UserDisplay>, sqlx::Error> {
    let sql = format!("{SELECT_USER_DISPLAY} WHERE users.id = $1");
    sqlx::query_as::<_, UserDisplay>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Whether another user already uses `email` (case-insensitive).
/// `except_id` excludes the user being edited.
pub async fn email_exists(pool: &PgPool, email: &str, except_id: Option<i64>) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users \
         WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(except_id)
    .fetch_one(pool)
    .await
}

/// Insert a user. The password must already be hashed.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password)
    .fetch_one(pool)
    .await
}

/// Apply edit-form changes. Returns false when no row has that id.
pub async fn update(pool: &PgPool, id: i64, changes: &UserChanges) -> Result<bool, sqlx::Error> {
    let result = match &changes.password {
        Some(hash) => {
            sqlx::query(
                "UPDATE users SET name = $1, email = $2, password = $3, updated_at = NOW() \
                 WHERE id = $4",
            )
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(hash)
            .bind(id)
            .execute(pool)
            .await?
        }
        None => {
            sqlx::query("UPDATE users SET name = $1, email = $2, updated_at = NOW() WHERE id = $3")
                .bind(&changes.name)
                .bind(&changes.email)
                .bind(id)
                .execute(pool)
                .await?
        }
    };
    Ok(result.rows_affected() > 0)
}

/// Hard delete. Returns false when no row has that id.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Find users with search, sort and pagination.
pub async fn find_paginated(pool: &PgPool, query: &ListQuery) -> Result<Page<UserDisplay>, AdminError> {
    let (where_clause, params) = builder::search_clause(query.search.as_ref(), scopes::column, 0)
        .map_err(|e| AdminError::InvalidQuery(e.to_string()))?;
    let order = builder::order_clause(query.sort.as_ref(), scopes::column, "users.id");

    let count_sql = format!("SELECT COUNT(*) FROM users WHERE {where_clause}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for p in &params {
        count_query = count_query.bind(p);
    }
    let total = count_query.fetch_one(pool).await?;

    let n = params.len();
    let data_sql = format!(
        "{SELECT_USER_DISPLAY} WHERE {where_clause} ORDER BY {order} LIMIT ${} OFFSET ${}",
        n + 1,
        n + 2
    );
    let mut data_query = sqlx::query_as::<_, UserDisplay>(&data_sql);
    for p in &params {
        data_query = data_query.bind(p);
    }
    let users = data_query
        .bind(query.per_page)
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(users, total, query))
}
