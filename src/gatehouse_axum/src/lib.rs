//! Axum front-end for the gatehouse login command.
//!
//! Every route turns the incoming cookies into a
//! [`RequestContext`](gatehouse_core::RequestContext), acquires a request
//! scope from the command, runs one operation and writes whatever cookies the
//! context queued back onto the response.
//!
//! # Usage
//!
//! ```ignore
//! use gatehouse_axum::{GatehouseState, routes};
//!
//! let app = Router::new()
//!     .route("/login", post(routes::login::<InMemoryVerifier>))
//!     .route("/logout", post(routes::logout::<InMemoryVerifier>))
//!     .route("/authorize", post(routes::authorize::<InMemoryVerifier>))
//!     .route("/principal", get(routes::principal::<InMemoryVerifier>))
//!     .with_state(GatehouseState::new(command, "GATEHOUSE_SESSION"));
//! ```

pub mod adapters;
pub mod error;
pub mod routes;

pub use adapters::{GatehouseState, IncomingContext};
pub use error::{ApiError, ErrorResponse};
