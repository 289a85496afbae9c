//! Glosa Server
//!
//! HTTP front end for concept extraction: accepts PDF, DOCX or TXT uploads
//! and answers with the concepts found in them.
//!
//! # Endpoints
//!
//! - `POST /api/analizar`: multipart upload in field `file`
//! - `GET /health`: backend availability

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use glosa_extractor::{Extractor, ExtractorError};
use glosa_llm::OllamaProvider;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

impl From<ExtractorError> for ServerError {
    fn from(e: ExtractorError) -> Self {
        ServerError::Server(e.to_string())
    }
}

/// Install the global tracing subscriber (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the backend and extractor, probing the backend once
///
/// An unreachable backend is not fatal: the server starts in degraded mode
/// and serves fallback extractions only.
pub async fn build_state(config: &ServerConfig) -> Result<AppState<OllamaProvider>, ServerError> {
    if !config.backend.enabled {
        warn!("Completion backend disabled, using fallback extraction only");
        return Ok(AppState {
            extractor: Arc::new(Extractor::without_backend(config.extractor.clone())?),
            backend_available: false,
        });
    }

    let mut provider = OllamaProvider::new(&config.backend.endpoint, &config.backend.model)
        .with_timeout(config.backend.timeout());
    if let Some(api_key) = config.backend.resolved_api_key() {
        provider = provider.with_api_key(api_key);
    }

    let backend_available = provider.is_available().await;
    if backend_available {
        info!("Backend reachable at {}", config.backend.endpoint);
    } else {
        warn!(
            "Backend not reachable at {}, starting in degraded mode",
            config.backend.endpoint
        );
    }

    let extractor = if backend_available {
        Extractor::new(provider, config.extractor.clone())?
    } else {
        Extractor::without_backend(config.extractor.clone())?
    };

    Ok(AppState {
        extractor: Arc::new(extractor),
        backend_available,
    })
}

/// Start the HTTP server
///
/// Initializes tracing, builds the extraction pipeline and serves until the
/// process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting Glosa server");
    info!("Bind address: {}", config.bind_addr());
    info!("Allowed origin: {}", config.allowed_origin);
    info!("Model: {}", config.backend.model);

    let state = build_state(&config).await?;
    let app = create_router(state, &config)?;

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
