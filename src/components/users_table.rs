//! Stateful users table: search, sort, pagination and the create/edit/view
//! modal, backed by any [`UserStore`].
//!
//! One instance lives for one request. The handler restores it from the
//! query string ([`UrlState`]) and the session ([`ModalState`]), calls one
//! operation, then stores the modal state back and drains the outbox.

use serde::{Deserialize, Serialize};

use super::notify::{Notification, Outbox};
use super::url_state::UrlState;
use crate::auth::password;
use crate::errors::AdminError;
use crate::i18n::{self, Locale, Notice};
use crate::models::list_query::{ListQuery, MAX_PAGE, MAX_PER_PAGE, Page, SortDir};
use crate::models::user::{NewUser, UserChanges, UserDisplay, UserForm, scopes};
use crate::store::UserStore;
use crate::validation::{self, UserInput};

/// Session key holding the serialized [`ModalState`].
pub const SESSION_KEY: &str = "users_table";

/// Base path of the users table.
pub const BASE_PATH: &str = "/admin/users";

/// Form values shown in the modal. Passwords are never written to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalState {
    pub show_modal: bool,
    pub edit_mode: bool,
    pub view_mode: bool,
    pub selected_user_id: Option<i64>,
    pub fields: FormFields,
}

impl ModalState {
    pub fn is_create(&self) -> bool {
        self.show_modal && !self.edit_mode && !self.view_mode
    }
}

pub struct UsersTable<'a, S: UserStore + ?Sized> {
    store: &'a S,
    locale: Locale,
    pub url: UrlState,
    pub modal: ModalState,
    outbox: Outbox,
}

impl<'a, S: UserStore + ?Sized> UsersTable<'a, S> {
    pub fn new(store: &'a S, locale: Locale) -> Self {
        Self::restore(store, locale, UrlState::default(), ModalState::default())
    }

    pub fn restore(store: &'a S, locale: Locale, url: UrlState, modal: ModalState) -> Self {
        Self { store, locale, url, modal, outbox: Outbox::default() }
    }

    pub fn set_search(&mut self, term: &str) {
        self.url.search = term.to_string();
        self.url.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: i64) {
        self.url.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self.url.page = 1;
    }

    pub fn go_to_page(&mut self, page: i64) {
        self.url.page = page.clamp(1, MAX_PAGE);
    }

    /// Toggle the direction when re-selecting the current field, otherwise
    /// sort ascending by the new field. Returns false for fields outside the
    /// sortable allow-list, which leave the state unchanged.
    pub fn sort_by(&mut self, field: &str) -> bool {
        if !scopes::is_sortable(field) {
            log::warn!("Rejected sort on unknown users column '{field}'");
            return false;
        }
        if self.url.sort_field == field {
            self.url.sort_direction = self.url.sort_direction.toggled();
        } else {
            self.url.sort_field = field.to_string();
            self.url.sort_direction = SortDir::Asc;
        }
        true
    }

    pub fn open_create_modal(&mut self) {
        self.modal.fields = FormFields::default();
        self.modal.selected_user_id = None;
        self.modal.show_modal = true;
        self.modal.edit_mode = false;
        self.modal.view_mode = false;
    }

    pub async fn open_edit_modal(&mut self, user_id: i64) -> Result<(), AdminError> {
        self.load_selected(user_id).await?;
        self.modal.edit_mode = true;
        self.modal.view_mode = false;
        Ok(())
    }

    pub async fn open_view_modal(&mut self, user_id: i64) -> Result<(), AdminError> {
        self.load_selected(user_id).await?;
        self.modal.edit_mode = false;
        self.modal.view_mode = true;
        Ok(())
    }

    async fn load_selected(&mut self, user_id: i64) -> Result<(), AdminError> {
        let user = self.store.find_user(user_id).await?;
        self.modal.selected_user_id = Some(user.id);
        self.modal.fields = FormFields { name: user.name, email: user.email, ..FormFields::default() };
        self.modal.show_modal = true;
        Ok(())
    }

    /// Hide the modal and forget the selection. Field values stay as they are.
    pub fn close_modal(&mut self) {
        self.modal.show_modal = false;
        self.modal.edit_mode = false;
        self.modal.view_mode = false;
        self.modal.selected_user_id = None;
    }

    pub async fn create_user(&mut self, form: &UserForm) -> Result<i64, AdminError> {
        self.fill_fields(form);
        let fields = &self.modal.fields;
        let input = UserInput {
            name: &fields.name,
            email: &fields.email,
            password: &fields.password,
            password_confirmation: &fields.password_confirmation,
        };
        let email_taken = !fields.email.is_empty() && self.store.email_taken(&fields.email, None).await?;
        validation::validate_create_user(&input, email_taken, self.locale)?;

        let hash = password::hash_password(&fields.password)?;
        let new = NewUser { name: fields.name.clone(), email: fields.email.clone(), password: hash };
        let id = self.store.create_user(&new).await?;
        log::info!("Created user {id} <{}>", new.email);

        self.notify(Notice::UserCreated);
        self.close_modal();
        Ok(id)
    }

    /// Save the edit form for the selected user. A blank password keeps the
    /// stored hash.
    pub async fn update_user(&mut self, form: &UserForm) -> Result<(), AdminError> {
        let id = self.modal.selected_user_id.ok_or(AdminError::NotFound)?;
        self.fill_fields(form);
        let fields = &self.modal.fields;
        let input = UserInput {
            name: &fields.name,
            email: &fields.email,
            password: &fields.password,
            password_confirmation: &fields.password_confirmation,
        };
        let email_taken = !fields.email.is_empty() && self.store.email_taken(&fields.email, Some(id)).await?;
        validation::validate_update_user(&input, email_taken, self.locale)?;

        let new_hash = if fields.password.is_empty() {
            None
        } else {
            Some(password::hash_password(&fields.password)?)
        };
        let password_changed = new_hash.is_some();
        let changes = UserChanges { name: fields.name.clone(), email: fields.email.clone(), password: new_hash };
        self.store.update_user(id, &changes).await?;
        log::info!("Updated user {id} (password changed: {password_changed})");

        self.notify(Notice::UserUpdated);
        self.close_modal();
        Ok(())
    }

    pub async fn delete(&mut self, user_id: i64) -> Result<(), AdminError> {
        self.store.delete_user(user_id).await?;
        log::info!("Deleted user {user_id}");
        if self.modal.selected_user_id == Some(user_id) {
            self.close_modal();
        }
        self.notify(Notice::UserDeleted);
        Ok(())
    }

    /// The list query for the current URL state.
    pub fn list_query(&self) -> ListQuery {
        scopes::search(ListQuery::new(), &self.url.search)
            .order_by(&self.url.sort_field, self.url.sort_direction)
            .paginate(self.url.page, self.url.per_page)
    }

    /// The selected user while the modal is in view mode. A row deleted in
    /// the meantime yields `None`.
    pub async fn viewed_user(&self) -> Result<Option<UserDisplay>, AdminError> {
        let (true, Some(id)) = (self.modal.view_mode, self.modal.selected_user_id) else {
            return Ok(None);
        };
        match self.store.find_user_display(id).await {
            Ok(user) => Ok(Some(user)),
            Err(AdminError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Filtered, sorted page of users for display.
    pub async fn render(&self) -> Result<Page<UserDisplay>, AdminError> {
        self.store.list_users(&self.list_query()).await
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.outbox.drain()
    }

    fn notify(&mut self, notice: Notice) {
        self.outbox.push(Notification::success(i18n::notice_message(notice, self.locale)));
    }

    fn fill_fields(&mut self, form: &UserForm) {
        self.modal.fields = FormFields {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            password_confirmation: form.password_confirmation.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn passwords_are_not_serialized() {
        let modal = ModalState {
            show_modal: true,
            fields: FormFields {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                password: "secret123".into(),
                password_confirmation: "secret123".into(),
            },
            ..ModalState::default()
        };
        let json = serde_json::to_string(&modal).unwrap();
        assert!(!json.contains("secret123"));
        let back: ModalState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fields.name, "Alice");
        assert!(back.fields.password.is_empty());
    }

    #[test]
    fn sort_by_toggles_and_resets() {
        let store = MemoryStore::new();
        let mut table = UsersTable::new(&store, Locale::En);
        table.url.sort_direction = SortDir::Asc;

        assert!(table.sort_by("name"));
        assert_eq!(table.url.sort_direction, SortDir::Desc);
        assert!(table.sort_by("email"));
        assert_eq!(table.url.sort_field, "email");
        assert_eq!(table.url.sort_direction, SortDir::Asc);

        assert!(!table.sort_by("password"));
        assert_eq!(table.url.sort_field, "email");
    }

    #[test]
    fn search_and_page_size_reset_page() {
        let store = MemoryStore::new();
        let mut table = UsersTable::new(&store, Locale::En);
        table.go_to_page(4);
        table.set_search("bob");
        assert_eq!(table.url.page, 1);
        table.go_to_page(3);
        table.set_per_page(500);
        assert_eq!(table.url.per_page, MAX_PER_PAGE);
        assert_eq!(table.url.page, 1);
    }
}
