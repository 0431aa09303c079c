//! Permission catalogue: search scope, creation rules and role lookups.

mod common;

use backoffice::errors::AdminError;
use backoffice::i18n::Locale;
use backoffice::models::list_query::{ListQuery, SortDir};
use backoffice::models::permission::scopes;
use backoffice::store::{PermissionStore, RoleStore};
use backoffice::validation;

use common::*;

fn search(term: &str) -> ListQuery {
    scopes::search(ListQuery::new(), term)
        .order_by("name", SortDir::Asc)
        .paginate(1, 10)
}

#[tokio::test]
async fn search_matches_name_or_slug() {
    let store = setup_store();
    seed_permission(&store, "List users", "users.list").await;
    seed_permission(&store, "Delete users", "users.delete").await;
    seed_permission(&store, "Manage roles", "roles.manage").await;

    let page = store.list_permissions(&search("roles")).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].slug, "roles.manage");

    let page = store.list_permissions(&search("USERS")).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Delete users", "List users"]);

    let page = store.list_permissions(&search(".delete")).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Delete users");
}

#[tokio::test]
async fn blank_search_lists_everything() {
    let store = setup_store();
    for i in 1..=12 {
        seed_permission(&store, &format!("Perm {i:02}"), &format!("perm.{i:02}")).await;
    }
    let page = store.list_permissions(&search("")).await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.last_page(), 2);
}

#[tokio::test]
async fn duplicate_slug_fails_validation() {
    let store = setup_store();
    seed_permission(&store, "List users", "users.list").await;

    let taken = store.slug_taken("users.list").await.unwrap();
    let errors = validation::validate_new_permission("Again", "users.list", taken, Locale::En).unwrap_err();
    assert!(errors.has("slug.unique"));

    let taken = store.slug_taken("users.export").await.unwrap();
    assert!(validation::validate_new_permission("Export users", "users.export", taken, Locale::En).is_ok());
}

#[tokio::test]
async fn slug_must_be_url_safe() {
    let errors = validation::validate_new_permission("Bad", "Users List", false, Locale::En).unwrap_err();
    assert!(errors.has("slug.format"));
    let errors = validation::validate_new_permission("", "", false, Locale::En).unwrap_err();
    assert!(errors.has("name.required"));
    assert!(errors.has("slug.required"));
}

#[tokio::test]
async fn permission_roles_lists_granting_roles() {
    let store = setup_store();
    let perm = seed_permission(&store, "List users", "users.list").await;
    let other = seed_permission(&store, "Delete users", "users.delete").await;
    let editor = store.insert_role("Editor", "editor", "");
    let admin = store.insert_role("Administrator", "admin", "");

    store.attach_permission(editor, perm).await.unwrap();
    store.attach_permission(admin, perm).await.unwrap();
    store.attach_permission(admin, other).await.unwrap();

    let roles = store.permission_roles(perm).await.unwrap();
    let slugs: Vec<_> = roles.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, ["admin", "editor"]);

    assert_eq!(store.permission_roles(other).await.unwrap().len(), 1);
    assert!(matches!(store.permission_roles(999).await, Err(AdminError::NotFound)));
}

#[tokio::test]
async fn find_missing_permission_is_not_found() {
    let store = setup_store();
    assert!(matches!(store.find_permission(1).await, Err(AdminError::NotFound)));
}
