//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the model dispatcher as its only handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{LimitsConfig, ServerConfig};
use crate::http::handlers::{dispatch, model_routes, BoxedHandler};
use crate::http::request::request_id;
use crate::routing::{PatternError, RouteTable};
use crate::store::RecordStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub routes: Arc<RouteTable<BoxedHandler>>,
    pub limits: LimitsConfig,
}

/// HTTP server for the model resource.
pub struct HttpServer {
    router: Router,
    store: RecordStore,
}

impl HttpServer {
    /// Create a new HTTP server serving `store`.
    pub fn new(config: ServerConfig, store: RecordStore) -> Result<Self, PatternError> {
        let state = AppState {
            store: store.clone(),
            routes: Arc::new(model_routes()?),
            limits: config.limits.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, store })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new().fallback(dispatch).with_state(state);

        if config.timeouts.request_secs > 0 {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));
        }

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = request_id(request).unwrap_or("unknown"),
                    method = %request.method(),
                    path = %request.uri().path()
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the served store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            records = self.store.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
