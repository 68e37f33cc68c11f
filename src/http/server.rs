//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the resolution handler
//! - Wire up middleware (route resolution, timeout, tracing)
//! - Bind server to listener
//! - Apply validated config reloads by swapping the route table
//! - Graceful shutdown on the lifecycle signal

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AppConfig, ConfigError};
use crate::http::middleware::resolve_route;
use crate::observability::metrics;
use crate::routing::{ResolvedRoute, Router as RouteTable};

/// Application state injected into middleware and handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current route table; replaced whole on reload.
    pub router: Arc<ArcSwap<RouteTable>>,
    pub max_form_bytes: usize,
}

impl AppState {
    pub fn new(router: RouteTable, max_form_bytes: usize) -> Self {
        Self {
            router: Arc::new(ArcSwap::from_pointee(router)),
            max_form_bytes,
        }
    }

    /// Rebuild the route table from `config` and publish it.
    ///
    /// On failure the current table stays in place.
    pub fn apply_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        match RouteTable::from_config(&config.route) {
            Ok(table) => {
                self.router.store(Arc::new(table));
                metrics::record_reload("applied");
                tracing::info!("Route table reloaded");
                Ok(())
            }
            Err(e) => {
                metrics::record_reload("rejected");
                tracing::error!(error = %e, "Keeping current route table");
                Err(e)
            }
        }
    }
}

/// HTTP server exposing route resolution.
pub struct HttpServer {
    app: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let table = RouteTable::from_config(&config.route)?;
        let state = AppState::new(table, config.server.max_form_bytes);
        let app = Self::build_app(&config, state.clone());

        Ok(Self { app, state })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(resolution_handler))
            .route("/", any(resolution_handler))
            .layer(middleware::from_fn_with_state(state, resolve_route))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// The Axum app, for serving or driving directly in tests.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, applying configs from `config_updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let _ = state.apply_config(&config);
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Reports the resolution attached by the middleware.
async fn resolution_handler(request: Request<Body>) -> Response {
    match request.extensions().get::<ResolvedRoute>() {
        Some(route) => (StatusCode::OK, Json(route.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, "No matching route found").into_response(),
    }
}
