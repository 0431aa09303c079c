//! Users table component against the in-memory store: modal lifecycle,
//! create/update/delete, search, sort and pagination.

mod common;

use backoffice::auth::password;
use backoffice::components::{ModalState, NotificationKind, UrlState, UsersTable};
use backoffice::errors::AdminError;
use backoffice::i18n::Locale;
use backoffice::models::list_query::SortDir;
use backoffice::store::UserStore;

use common::*;

// ============================================================================
// CREATE
// ============================================================================

#[tokio::test]
async fn create_adds_user_with_hashed_password() {
    let store = setup_store();
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_create_modal();
    assert!(table.modal.is_create());

    let form = user_form("Alice", "alice@example.com", TEST_PASSWORD, TEST_PASSWORD);
    let id = table.create_user(&form).await.expect("create");

    assert_eq!(store.user_count(), 1);
    let user = store.find_user(id).await.unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_ne!(user.password, TEST_PASSWORD);
    assert!(password::verify_password(TEST_PASSWORD, &user.password).unwrap());

    assert_eq!(table.modal, ModalState { fields: table.modal.fields.clone(), ..ModalState::default() });
    let notes = table.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Success);
    assert!(table.take_notifications().is_empty());
}

#[tokio::test]
async fn create_rejects_duplicate_email_ignoring_case() {
    let store = setup_store();
    seed_user(&store, "Alice", "alice@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_create_modal();

    let form = user_form("Other Alice", "ALICE@Example.com", TEST_PASSWORD, TEST_PASSWORD);
    let err = table.create_user(&form).await.unwrap_err();

    let AdminError::Validation(errors) = err else { panic!("expected validation error, got {err:?}") };
    assert!(errors.has("email.unique"));
    assert_eq!(store.user_count(), 1);
    assert!(table.modal.show_modal, "modal stays open on validation failure");
    assert_eq!(table.modal.fields.name, "Other Alice");
    assert!(table.take_notifications().is_empty());
}

#[tokio::test]
async fn create_reports_first_failure_per_field() {
    let store = setup_store();
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_create_modal();

    let form = user_form("", "", "short", "different");
    let AdminError::Validation(errors) = table.create_user(&form).await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert!(errors.has("name.required"));
    assert!(errors.has("email.required"));
    assert!(!errors.has("email.email"));
    assert!(errors.has("password.min"));
    assert!(!errors.has("password.confirmed"));
    assert_eq!(store.user_count(), 0);
}

#[tokio::test]
async fn create_requires_matching_confirmation() {
    let store = setup_store();
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_create_modal();

    let form = user_form("Bob", "bob@example.com", TEST_PASSWORD, "secret124");
    let AdminError::Validation(errors) = table.create_user(&form).await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert!(errors.has("password.confirmed"));
    assert_eq!(errors.len(), 1);
}

// ============================================================================
// UPDATE
// ============================================================================

#[tokio::test]
async fn update_with_blank_password_keeps_hash() {
    let store = setup_store();
    let id = seed_user(&store, "Alice", "alice@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_edit_modal(id).await.unwrap();
    assert!(table.modal.edit_mode);
    assert_eq!(table.modal.fields.email, "alice@example.com");

    let form = user_form("Alice Smith", "alice@example.com", "", "");
    table.update_user(&form).await.expect("update");

    let user = store.find_user(id).await.unwrap();
    assert_eq!(user.name, "Alice Smith");
    assert_eq!(user.password, SEEDED_HASH);
    assert!(!table.modal.show_modal);
    assert_eq!(table.take_notifications().len(), 1);
}

#[tokio::test]
async fn update_with_new_password_rehashes() {
    let store = setup_store();
    let id = seed_user(&store, "Alice", "alice@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_edit_modal(id).await.unwrap();

    let form = user_form("Alice", "alice@example.com", "newsecret1", "newsecret1");
    table.update_user(&form).await.expect("update");

    let user = store.find_user(id).await.unwrap();
    assert_ne!(user.password, SEEDED_HASH);
    assert_ne!(user.password, "newsecret1");
    assert!(password::verify_password("newsecret1", &user.password).unwrap());
}

#[tokio::test]
async fn update_may_keep_own_email_but_not_anothers() {
    let store = setup_store();
    let alice = seed_user(&store, "Alice", "alice@example.com").await;
    seed_user(&store, "Bob", "bob@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);

    table.open_edit_modal(alice).await.unwrap();
    table.update_user(&user_form("Alice", "Alice@Example.com", "", "")).await.expect("own email");

    table.open_edit_modal(alice).await.unwrap();
    let AdminError::Validation(errors) = table.update_user(&user_form("Alice", "bob@example.com", "", "")).await.unwrap_err()
    else {
        panic!("expected validation error");
    };
    assert!(errors.has("email.unique"));
    assert_eq!(store.find_user(alice).await.unwrap().email, "Alice@Example.com");
}

#[tokio::test]
async fn update_without_selection_is_not_found() {
    let store = setup_store();
    let mut table = UsersTable::new(&store, Locale::En);
    let err = table.update_user(&user_form("A", "a@example.com", "", "")).await.unwrap_err();
    assert!(matches!(err, AdminError::NotFound));
}

// ============================================================================
// MODAL
// ============================================================================

#[tokio::test]
async fn open_missing_user_is_not_found() {
    let store = setup_store();
    let mut table = UsersTable::new(&store, Locale::En);
    assert!(matches!(table.open_edit_modal(99).await, Err(AdminError::NotFound)));
    assert!(matches!(table.open_view_modal(99).await, Err(AdminError::NotFound)));
    assert!(!table.modal.show_modal);
}

#[tokio::test]
async fn view_modal_shows_selected_user() {
    let store = setup_store();
    let id = seed_user(&store, "Carol", "carol@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_view_modal(id).await.unwrap();

    assert!(table.modal.view_mode);
    assert!(!table.modal.edit_mode);
    let viewed = table.viewed_user().await.unwrap().expect("viewed user");
    assert_eq!(viewed.name, "Carol");

    store.delete_user(id).await.unwrap();
    assert!(table.viewed_user().await.unwrap().is_none());
}

#[tokio::test]
async fn close_modal_is_idempotent() {
    let store = setup_store();
    let id = seed_user(&store, "Dave", "dave@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_edit_modal(id).await.unwrap();

    table.close_modal();
    let once = table.modal.clone();
    table.close_modal();
    assert_eq!(table.modal, once);
    assert!(!once.show_modal);
    assert!(!once.edit_mode);
    assert!(!once.view_mode);
    assert_eq!(once.selected_user_id, None);
}

#[tokio::test]
async fn create_modal_clears_previous_fields() {
    let store = setup_store();
    let id = seed_user(&store, "Erin", "erin@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_edit_modal(id).await.unwrap();
    table.open_create_modal();
    assert!(table.modal.is_create());
    assert!(table.modal.fields.name.is_empty());
    assert_eq!(table.modal.selected_user_id, None);
}

// ============================================================================
// DELETE
// ============================================================================

#[tokio::test]
async fn delete_removes_user() {
    let store = setup_store();
    let ids = seed_users(&store, 8).await;
    assert_eq!(ids[6], 7);
    let mut table = UsersTable::new(&store, Locale::En);

    table.delete(7).await.expect("delete");
    assert!(matches!(store.find_user(7).await, Err(AdminError::NotFound)));
    assert_eq!(store.user_count(), 7);
    assert_eq!(table.take_notifications().len(), 1);

    assert!(matches!(table.delete(7).await, Err(AdminError::NotFound)));
    assert!(table.take_notifications().is_empty());
}

#[tokio::test]
async fn delete_selected_user_closes_modal() {
    let store = setup_store();
    let id = seed_user(&store, "Frank", "frank@example.com").await;
    let mut table = UsersTable::new(&store, Locale::En);
    table.open_view_modal(id).await.unwrap();
    table.delete(id).await.unwrap();
    assert!(!table.modal.show_modal);
}

// ============================================================================
// LISTING
// ============================================================================

#[tokio::test]
async fn search_matches_name_or_email_case_insensitively() {
    let store = setup_store();
    seed_user(&store, "Alice", "alice@example.com").await;
    seed_user(&store, "Bob", "bob@example.com").await;
    seed_user(&store, "Carol", "carol@sample.org").await;
    let mut table = UsersTable::new(&store, Locale::En);

    table.set_search("ali");
    let page = table.render().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Alice");

    table.set_search("SAMPLE");
    let page = table.render().await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Carol");

    table.set_search("");
    assert_eq!(table.render().await.unwrap().total, 3);
}

#[tokio::test]
async fn paginates_with_default_page_size() {
    let store = setup_store();
    seed_users(&store, 12).await;
    let mut table = UsersTable::new(&store, Locale::En);

    let page = table.render().await.unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 12);
    assert_eq!(page.last_page(), 3);

    table.go_to_page(3);
    let page = table.render().await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(!page.has_more_pages());
}

#[tokio::test]
async fn out_of_range_page_renders_empty() {
    let store = setup_store();
    seed_users(&store, 3).await;
    let mut table = UsersTable::new(&store, Locale::En);

    table.go_to_page(i64::MAX);
    let page = table.render().await.expect("render far page");
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert_eq!(page.first_item(), 0);
    assert!(!page.has_more_pages());
}

#[tokio::test]
async fn default_order_is_name_descending() {
    let store = setup_store();
    seed_users(&store, 3).await;
    let table = UsersTable::new(&store, Locale::En);
    let names: Vec<_> = table.render().await.unwrap().items.into_iter().map(|u| u.name).collect();
    assert_eq!(names, ["User 03", "User 02", "User 01"]);
}

#[tokio::test]
async fn sort_by_same_field_toggles_direction() {
    let store = setup_store();
    seed_users(&store, 3).await;
    let url = UrlState { sort_direction: SortDir::Asc, ..UrlState::default() };

    // Same starting state gives the same answer every time.
    for _ in 0..2 {
        let mut table = UsersTable::restore(&store, Locale::En, url.clone(), ModalState::default());
        assert!(table.sort_by("name"));
        assert_eq!(table.url.sort_field, "name");
        assert_eq!(table.url.sort_direction, SortDir::Desc);
    }

    let mut table = UsersTable::restore(&store, Locale::En, url, ModalState::default());
    table.sort_by("name");
    table.sort_by("name");
    assert_eq!(table.url.sort_direction, SortDir::Asc);
    let first = table.render().await.unwrap().items.remove(0);
    assert_eq!(first.name, "User 01");
}

#[tokio::test]
async fn sort_by_new_field_starts_ascending() {
    let store = setup_store();
    let mut table = UsersTable::new(&store, Locale::En);
    assert!(table.sort_by("email"));
    assert_eq!(table.url.sort_field, "email");
    assert_eq!(table.url.sort_direction, SortDir::Asc);

    assert!(!table.sort_by("password"));
    assert_eq!(table.url.sort_field, "email");
}
