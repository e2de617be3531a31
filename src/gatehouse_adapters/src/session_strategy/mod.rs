pub mod change_session_id;

pub use change_session_id::ChangeSessionIdStrategy;
