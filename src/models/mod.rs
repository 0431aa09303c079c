pub mod list_query;
pub mod permission;
pub mod role;
pub mod user;
