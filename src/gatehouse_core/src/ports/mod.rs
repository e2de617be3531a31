pub mod hooks;
pub mod logout_handler;
pub mod session_store;
pub mod verifier;
