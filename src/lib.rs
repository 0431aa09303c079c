//! Back-office administration panel: users, roles and permissions.
//!
//! The binary in `main.rs` wires these modules into an actix-web server;
//! integration tests drive the same modules against the in-memory store.

pub mod auth;
pub mod components;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod store;
pub mod templates_structs;
pub mod validation;
