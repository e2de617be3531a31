pub mod jwt_remember_me;

pub use jwt_remember_me::{JwtRememberMeServices, RememberMeClaims, RememberMeConfig, RememberMeError};
