//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, CORS)
//! - Serve the bundled UI with an SPA fallback
//! - Bind server to listener and shut down gracefully

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::handlers;
use crate::http::request::UuidRequestId;
use crate::lifecycle::ShutdownSignal;
use crate::prompt::PromptBuilder;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: UpstreamClient,
    pub prompt: Arc<PromptBuilder>,
}

/// HTTP server for the compliment proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, UpstreamError> {
        let config = Arc::new(config);
        let upstream = UpstreamClient::new(config.upstream.clone())?;
        let prompt = Arc::new(PromptBuilder::new(config.prompt.sender_name.clone()));

        let state = AppState {
            config: config.clone(),
            upstream,
            prompt,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/api/generate-compliment", post(handlers::generate_compliment))
            .route("/api/health", get(handlers::health))
            .with_state(state);

        let mut router = match &config.static_assets.dir {
            Some(dir) => {
                let index = Path::new(dir).join(&config.static_assets.index_file);
                api.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
            }
            None => api,
        };

        router = router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId));

        if config.cors.enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            static_assets = self.config.static_assets.dir.as_deref().unwrap_or("-"),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
