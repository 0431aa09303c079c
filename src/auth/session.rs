//! Typed access to the values the admin screens keep in the cookie session.

use actix_session::Session;

use crate::components::users_table::{self, ModalState};
use crate::components::Notification;
use crate::errors::AppError;

const NOTIFICATIONS_KEY: &str = "notifications";

/// Queue notifications for the next rendered page.
pub fn push_notifications(session: &Session, notifications: Vec<Notification>) -> Result<(), AppError> {
    if notifications.is_empty() {
        return Ok(());
    }
    let mut pending = session
        .get::<Vec<Notification>>(NOTIFICATIONS_KEY)
        .unwrap_or(None)
        .unwrap_or_default();
    pending.extend(notifications);
    session
        .insert(NOTIFICATIONS_KEY, &pending)
        .map_err(|e| AppError::Session(format!("Failed to store notifications: {e}")))
}

/// Remove and return pending notifications.
pub fn take_notifications(session: &Session) -> Vec<Notification> {
    let pending = session
        .get::<Vec<Notification>>(NOTIFICATIONS_KEY)
        .unwrap_or(None)
        .unwrap_or_default();
    if !pending.is_empty() {
        session.remove(NOTIFICATIONS_KEY);
    }
    pending
}

/// Modal state of the users table; a missing or unreadable entry is a closed modal.
pub fn load_users_modal(session: &Session) -> ModalState {
    session
        .get::<ModalState>(users_table::SESSION_KEY)
        .unwrap_or(None)
        .unwrap_or_default()
}

pub fn store_users_modal(session: &Session, modal: &ModalState) -> Result<(), AppError> {
    session
        .insert(users_table::SESSION_KEY, modal)
        .map_err(|e| AppError::Session(format!("Failed to store modal state: {e}")))
}
