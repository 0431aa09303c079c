//! Shared test infrastructure.
//!
//! Everything here runs against `MemoryStore`, which mirrors the PostgreSQL
//! queries closely enough for component and handler tests. Tests that need
//! a real database live in `pg_store_test.rs` and are ignored by default.

#![allow(dead_code)]

use backoffice::models::permission::NewPermission;
use backoffice::models::user::{NewUser, UserForm};
use backoffice::store::{MemoryStore, PermissionStore, UserStore};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_PASSWORD: &str = "secret123";
/// Stand-in hash for seeded rows that never log in.
pub const SEEDED_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2VlZGVk$seeded";

// ============================================================================
// STORE SETUP
// ============================================================================

pub fn setup_store() -> MemoryStore {
    MemoryStore::new()
}

pub async fn seed_user(store: &MemoryStore, name: &str, email: &str) -> i64 {
    let new = NewUser { name: name.to_string(), email: email.to_string(), password: SEEDED_HASH.to_string() };
    store.create_user(&new).await.expect("seed user")
}

/// `count` users named `User 01`, `User 02`, ...
pub async fn seed_users(store: &MemoryStore, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 1..=count {
        ids.push(seed_user(store, &format!("User {i:02}"), &format!("user{i:02}@example.com")).await);
    }
    ids
}

pub async fn seed_permission(store: &MemoryStore, name: &str, slug: &str) -> i64 {
    let new = NewPermission { name: name.to_string(), slug: slug.to_string(), description: String::new() };
    store.create_permission(&new).await.expect("seed permission")
}

// ============================================================================
// FORMS
// ============================================================================

pub fn user_form(name: &str, email: &str, password: &str, confirmation: &str) -> UserForm {
    UserForm {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        password_confirmation: confirmation.to_string(),
        csrf_token: String::new(),
    }
}

// ============================================================================
// HTML HELPERS
// ============================================================================

/// First CSRF token rendered into a hidden form field.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let re = regex::Regex::new(r#"name="csrf_token"\s+value="([^"]+)""#).ok()?;
    re.captures(html).map(|c| c[1].to_string())
}
