mod authorize;
mod helpers;
mod login;
mod logout;
mod remember_me;
