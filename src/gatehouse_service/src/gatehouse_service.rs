use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{get, post},
};
use gatehouse_application::LoginCommand;
use gatehouse_axum::{GatehouseState, routes};
use gatehouse_core::Verifier;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::request_tracing::{make_span_with_request_id, on_request, on_response};

/// Origins allowed to call the service with credentials.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn parse(origins: &[String]) -> Result<Option<Self>, axum::http::header::InvalidHeaderValue> {
        if origins.is_empty() {
            return Ok(None);
        }
        let origins = origins
            .iter()
            .map(|o| HeaderValue::from_str(o))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Self(origins)))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }
}

/// The gatehouse HTTP service: login, logout, authorize and principal routes.
pub struct GatehouseService {
    router: Router,
}

impl GatehouseService {
    /// Builds the routes around a started login command.
    pub fn new<V>(command: Arc<LoginCommand<V>>, session_cookie_name: &str) -> Self
    where
        V: Verifier + 'static,
    {
        let state = GatehouseState::new(command, session_cookie_name);

        let router = Router::new()
            .route("/login", post(routes::login::<V>))
            .route("/logout", post(routes::logout::<V>))
            .route("/authorize", post(routes::authorize::<V>))
            .route("/principal", get(routes::principal::<V>))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be nested into another
    /// application.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server on `listener`.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Gatehouse listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
