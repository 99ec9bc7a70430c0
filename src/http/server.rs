//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the metrics and landing handlers
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Stop on the shutdown signal

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::collector::StatusCollector;
use crate::config::TelemetryConfig;
use crate::http::landing;
use crate::observability::metrics::{encode_text, text_content_type};

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<StatusCollector>,
    pub landing_page: Arc<str>,
}

/// HTTP server exposing the collector.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server for the given telemetry settings.
    pub fn new(config: &TelemetryConfig, collector: Arc<StatusCollector>) -> Self {
        let state = AppState {
            collector,
            landing_page: landing::render(config).into(),
        };

        let router = Router::new()
            .route(&config.metrics_path, get(metrics_handler))
            .fallback(landing_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Bind `address` and serve until shutdown.
    pub async fn bind_and_run(
        self,
        address: &str,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let listener = TcpListener::bind(address).await.map_err(ServerError::Bind)?;
        self.run(listener, shutdown).await.map_err(ServerError::Serve)
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
                tracing::info!("HTTP server received shutdown signal");
            })
            .await
    }
}

/// Handler for the metrics endpoint.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let families = state.collector.collect().await;

    match encode_text(&families) {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, text_content_type())],
            output,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Handler for every other path.
async fn landing_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page.to_string())
}
