pub mod csrf;
pub mod password;
pub mod session;
