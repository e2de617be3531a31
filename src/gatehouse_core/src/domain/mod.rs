pub mod authentication_mode;
pub mod authority;
pub mod credential;
pub mod principal;
pub mod secured_operation;
pub mod session;
pub mod username;
