use crate::config::Config;
use crate::engine::{self, VisionProvider};
use crate::error::VisionError;
use crate::providers;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Multipart field carrying the invoice image
pub const UPLOAD_FIELD: &str = "invoice";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn VisionProvider>,
    pub config: Arc<Config>,
}

/// Extracted text response
#[derive(Serialize)]
pub struct TextResponse {
    pub text: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let provider = providers::build(&config)?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        provider,
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/api/upload-invoice", post(handle_upload_invoice))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle invoice uploads
async fn handle_upload_invoice(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TextResponse>, VisionError> {
    let start = Instant::now();

    let result = match multipart {
        Ok(multipart) => recognize(state.provider.as_ref(), multipart).await,
        Err(rejection) => Err(VisionError::Transport(rejection.body_text())),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok((size, text)) => {
            tracing::info!(
                provider = state.provider.name(),
                "Text extraction completed in {}ms, upload: {} bytes, text length: {}",
                elapsed_ms,
                size,
                text.len()
            );
            Ok(Json(TextResponse { text }))
        }
        Err(err) => {
            tracing::warn!(
                provider = state.provider.name(),
                kind = err.kind(),
                "Text extraction failed after {}ms: {}",
                elapsed_ms,
                err
            );
            Err(err)
        }
    }
}

async fn recognize(
    provider: &dyn VisionProvider,
    multipart: Multipart,
) -> Result<(usize, String), VisionError> {
    let data = read_upload(multipart).await?;
    let text = engine::extract_text(provider, &data).await?;
    Ok((data.len(), text))
}

/// Pull the bytes of the first `invoice` field; other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, VisionError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| VisionError::Transport(format!("Failed to parse multipart: {}", e.body_text())))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            return field.bytes().await.map_err(|e| {
                VisionError::Transport(format!("Failed to read file data: {}", e.body_text()))
            });
        }
    }

    Err(VisionError::Transport(format!(
        "Required part '{}' is not present",
        UPLOAD_FIELD
    )))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
