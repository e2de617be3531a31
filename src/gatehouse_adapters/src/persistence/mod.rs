pub mod in_memory_session_store;
#[cfg(feature = "redis-store")]
pub mod redis_session_store;

pub use in_memory_session_store::InMemorySessionStore;
#[cfg(feature = "redis-store")]
pub use redis_session_store::RedisSessionStore;
