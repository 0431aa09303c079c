use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::config::AppConfig;
use crate::errors::AdminError;
use crate::models::user::{self, NewUser};
use crate::validation;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Permission catalogue created on first start: (name, slug, description).
pub const DEFAULT_PERMISSIONS: &[(&str, &str, &str)] = &[
    ("List users", "users.list", "See the users table"),
    ("Create users", "users.create", "Add new users"),
    ("Edit users", "users.edit", "Change user names, emails and passwords"),
    ("Delete users", "users.delete", "Remove users permanently"),
    ("List permissions", "permissions.list", "See the permission catalogue"),
    ("Create permissions", "permissions.create", "Add permissions to the catalogue"),
    ("Manage roles", "roles.manage", "Assign permissions to roles"),
    ("Moderate comments", "comments.manage", "Open the comments page"),
];

pub const ADMIN_ROLE_SLUG: &str = "admin";

pub async fn init_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Idempotent seed: default permissions, an `admin` role holding all of
/// them, and the first administrator when `ADMIN_EMAIL`/`ADMIN_PASSWORD`
/// are set.
pub async fn seed(pool: &PgPool, config: &AppConfig) -> Result<(), AdminError> {
    for (name, slug, description) in DEFAULT_PERMISSIONS {
        sqlx::query(
            "INSERT INTO permissions (name, slug, description) VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(*name)
        .bind(*slug)
        .bind(*description)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        "INSERT INTO roles (name, slug, description) VALUES ('Administrator', $1, 'Full access') \
         ON CONFLICT (slug) DO NOTHING",
    )
    .bind(ADMIN_ROLE_SLUG)
    .execute(pool)
    .await?;

    let granted = sqlx::query(
        "INSERT INTO permission_role (permission_id, role_id) \
         SELECT p.id, r.id FROM permissions p CROSS JOIN roles r WHERE r.slug = $1 \
         ON CONFLICT DO NOTHING",
    )
    .bind(ADMIN_ROLE_SLUG)
    .execute(pool)
    .await?
    .rows_affected();
    if granted > 0 {
        log::info!("Granted {granted} permission(s) to the admin role");
    }

    if let (Some(email), Some(plain)) = (&config.admin_email, &config.admin_password) {
        seed_admin_user(pool, email.trim(), plain).await?;
    }
    Ok(())
}

async fn seed_admin_user(pool: &PgPool, email: &str, plain: &str) -> Result<(), AdminError> {
    if user::email_exists(pool, email, None).await? {
        log::info!("Admin user <{email}> already exists, skipping");
        return Ok(());
    }
    if !validation::is_valid_email(email) || plain.chars().count() < validation::PASSWORD_MIN {
        log::warn!("ADMIN_EMAIL/ADMIN_PASSWORD rejected, no admin user seeded");
        return Ok(());
    }
    let hash = password::hash_password(plain)?;
    let new = NewUser { name: "Administrator".to_string(), email: email.to_string(), password: hash };
    let id = user::create(pool, &new).await?;
    log::info!("Seeded admin user {id} <{email}>");
    Ok(())
}
