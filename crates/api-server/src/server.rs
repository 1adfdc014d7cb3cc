//! API server: landing page routes, session JSON API and probes.

use crate::rest::{self, AppState};
use crate::{page, session_rest};
use axum::routing::{get, post};
use axum::Router;
use promo_core::config::AppConfig;
use promo_landing_page::{PageRenderer, SessionRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    registry: Arc<SessionRegistry>,
    renderer: Arc<PageRenderer>,
}

impl ApiServer {
    pub fn new(config: AppConfig, registry: Arc<SessionRegistry>) -> Self {
        let renderer = Arc::new(PageRenderer::new(config.page.clone()));
        Self {
            config,
            registry,
            renderer,
        }
    }

    /// Build the HTTP router with all routes and middleware.
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            renderer: self.renderer.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        Router::new()
            // Landing page
            .route("/", get(page::landing))
            .route("/s/:id", get(page::session_page))
            .route("/s/:id/claim", post(page::claim_form))
            // Session JSON API
            .route("/v1/sessions", post(session_rest::create_session))
            .route(
                "/v1/sessions/:id",
                get(session_rest::get_session).delete(session_rest::delete_session),
            )
            .route("/v1/sessions/:id/claim", post(session_rest::claim))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server. Returns when the shutdown signal resolves.
    pub async fn start_http(
        &self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let app = self.router();

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            info!("Metrics exporter disabled");
            return Ok(());
        }

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
