pub mod cookie_clearing;

pub use cookie_clearing::CookieClearingLogoutHandler;
