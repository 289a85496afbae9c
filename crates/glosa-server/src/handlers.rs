//! HTTP request handlers for the server.
//!
//! Implements document analysis and health check endpoints using axum.

use crate::config::{ConfigError, ServerConfig};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use glosa_domain::traits::CompletionBackend;
use glosa_domain::Concept;
use glosa_extractor::{Extractor, ExtractorError};
use glosa_reader::{read_document, DocumentKind, ReaderError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

/// Multipart field holding the uploaded document
pub const UPLOAD_FIELD: &str = "file";

/// Shared application state
pub struct AppState<B> {
    /// Extraction pipeline, shared by every request
    pub extractor: Arc<Extractor<B>>,
    /// Whether the backend answered the startup probe
    pub backend_available: bool,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            backend_available: self.backend_available,
        }
    }
}

/// A concept as sent to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptDto {
    /// Concept title
    pub titulo: String,
    /// Sanitized definition
    pub definicion: String,
}

impl From<Concept> for ConceptDto {
    fn from(concept: Concept) -> Self {
        Self {
            titulo: concept.title,
            definicion: concept.definition,
        }
    }
}

/// Successful analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Extracted concepts, never empty
    pub concepts: Vec<ConceptDto>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// "ok" with a usable backend, "degraded" on the fallback path only
    pub status: String,
    /// Backend model, if one is configured
    pub model: Option<String>,
    /// Whether the backend answered the startup probe
    pub backend_available: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request carried no `file` field
    #[error("No file")]
    MissingFile,

    /// The multipart body could not be read
    #[error("Failed to read upload: {0}")]
    Upload(#[from] MultipartError),

    /// The document could not be turned into text
    #[error(transparent)]
    Reader(#[from] ReaderError),

    /// Extraction produced nothing usable
    #[error(transparent)]
    Extraction(#[from] ExtractorError),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::Upload(e) => e.status(),
            AppError::Reader(ReaderError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Reader(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Extraction(ExtractorError::EmptyText | ExtractorError::NoConcepts) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Extraction(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// POST /api/analizar - Extract concepts from an uploaded document
async fn analyze<B>(
    State(state): State<AppState<B>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: Display,
{
    let (filename, bytes) = read_upload(&mut multipart).await?;
    info!("File received: {} ({} bytes)", filename, bytes.len());

    let kind = DocumentKind::from_filename(&filename)?;

    let text = tokio::task::spawn_blocking(move || read_document(&bytes, kind))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    let result = state.extractor.extract(&text).await?;

    info!(
        "Returning {} concepts for {} (extraction {})",
        result.concepts.len(),
        filename,
        result.metadata.extraction_id
    );

    Ok(Json(AnalyzeResponse {
        concepts: result.concepts.into_iter().map(ConceptDto::from).collect(),
    }))
}

/// Find the upload field and read it whole
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok((filename, bytes.to_vec()));
    }

    warn!("Analysis request with no file");
    Err(AppError::MissingFile)
}

/// GET /health - Backend availability
async fn health_check<B>(State(state): State<AppState<B>>) -> Json<HealthCheckResponse>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: Display,
{
    let status = if state.backend_available { "ok" } else { "degraded" };

    Json(HealthCheckResponse {
        status: status.to_string(),
        model: state.extractor.model_name().map(str::to_string),
        backend_available: state.backend_available,
    })
}

/// Build the CORS layer for the configured frontend origin
fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if allowed_origin == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| ConfigError::Invalid(format!("allowed_origin: {}", e)))?;
    // Requests from other origins get no Access-Control-Allow-Origin header
    Ok(cors.allow_origin(AllowOrigin::list([origin])))
}

/// Create the axum router with all routes
pub fn create_router<B>(state: AppState<B>, config: &ServerConfig) -> Result<Router, ConfigError>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: Display,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Ok(Router::new()
        .route("/api/analizar", post(analyze::<B>))
        .route("/health", get(health_check::<B>))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(trace_layer)
        .layer(cors_layer(&config.allowed_origin)?)
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Reader(ReaderError::UnsupportedType("a.png".into())).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::Reader(ReaderError::Pdf("broken".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Extraction(ExtractorError::EmptyText).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Extraction(ExtractorError::NoConcepts).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Extraction(ExtractorError::Timeout).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AppError::MissingFile.to_string(), "No file");
        assert_eq!(
            AppError::Extraction(ExtractorError::EmptyText).to_string(),
            "Empty text extracted"
        );
        assert_eq!(
            AppError::Extraction(ExtractorError::NoConcepts).to_string(),
            "No concepts extracted from file"
        );
    }

    #[test]
    fn test_concept_dto_field_names() {
        let concept = Concept::new("Inertia", "Resistance to a change in motion").unwrap();
        let json = serde_json::to_value(ConceptDto::from(concept)).unwrap();

        assert_eq!(json["titulo"], "Inertia");
        assert_eq!(json["definicion"], "Resistance to a change in motion");
    }

    #[test]
    fn test_cors_layer() {
        assert!(cors_layer("http://localhost:3000").is_ok());
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
