//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Serve static assets from `public/` and license texts from
//!   `licenses/`
//! - Run until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::refresher::PublishedConfig;
use crate::http::greeting::greeting_handler;
use crate::http::health;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub published: Arc<PublishedConfig>,
}

/// HTTP server for the greeting service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server reading from the given published config.
    pub fn new(published: Arc<PublishedConfig>) -> Self {
        let state = AppState { published };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/api/greeting", get(greeting_handler))
            .route("/api/health/readiness", get(health::readiness))
            .route("/api/health/liveness", get(health::liveness))
            .with_state(state)
            .nest_service("/licenses", ServeDir::new("licenses"))
            .fallback_service(ServeDir::new("public"))
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
