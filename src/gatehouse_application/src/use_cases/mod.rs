pub mod authenticate;
pub mod authorize;
pub mod logout;
