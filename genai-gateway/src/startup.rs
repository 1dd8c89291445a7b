//! Application startup and lifecycle management.

use crate::config::GatewayConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextGenerator};
use crate::services::{TextGenerator, UploadStore};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub generator: Arc<dyn TextGenerator>,
    pub uploads: UploadStore,
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.uploads.max_bytes;
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/generate-text", post(handlers::generate_text))
        .route("/generate-from-image", post(handlers::generate_from_image))
        .route("/generate-from-document", post(handlers::generate_from_document))
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Build the application with the Gemini backend described by `config`.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let generator = GeminiTextGenerator::new(GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            model: config.gemini.model.clone(),
            api_base: config.gemini.api_base.clone(),
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        if config.gemini.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
        }

        tracing::info!(
            model = %config.gemini.model,
            "Initialized Gemini text generator"
        );

        Self::build_with_generator(config, Arc::new(generator)).await
    }

    /// Build the application around any [`TextGenerator`].
    pub async fn build_with_generator(
        config: GatewayConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, AppError> {
        let uploads = UploadStore::new(config.uploads.dir.clone())
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to initialize upload directory {}: {}",
                    config.uploads.dir.display(),
                    e
                );
                e
            })?;

        let state = AppState {
            config: config.clone(),
            generator,
            uploads,
        };

        // Port 0 binds a random port for testing.
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Gemini API server listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state.clone()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
