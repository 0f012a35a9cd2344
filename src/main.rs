//! OCR extraction API - accepts a base64 data-URI image, returns the text
//! the OCR engine recognizes in it.

mod config;
mod error;
mod ocr;
mod pipeline;
mod scratch;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use config::Config;
use error::ExtractError;
use ocr::{tesseract::TesseractEngine, OcrEngine};
use scratch::ScratchFile;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Transport-level body ceiling. Base64 inflates the 5 MiB image ceiling by
/// 4/3, so this sits well above it and the pipeline's own size guard does
/// the judging.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    engine: Arc<dyn OcrEngine>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocr_extractor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let engine = TesseractEngine::new(&config.ocr).context("failed to initialize OCR engine")?;

    let state = AppState {
        config: config.clone(),
        engine: Arc::new(engine),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router. Cross-origin permissions apply to every `/api` route;
/// the CORS layer also answers the preflight OPTIONS request before any
/// validation runs.
fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/extract-text", post(extract_text))
        .layer(cors);

    Router::new()
        .route("/", get(home))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn home() -> &'static str {
    "OCR API is running"
}

#[derive(Serialize)]
struct ExtractResponse {
    text: String,
}

/// Extract text from a base64 data-URI image.
///
/// The body passes a strict gate sequence; each failure maps straight to a
/// terminal JSON error. The scratch PNG staged before recognition is removed
/// on every exit path when the guard drops.
async fn extract_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExtractResponse>, ExtractError> {
    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        debug!("request body is not valid JSON: {}", e);
        ExtractError::InvalidJson
    })?;

    let image_field = payload
        .get("image")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::MissingImage)?;

    let bytes = pipeline::decode_image_payload(image_field)?;
    pipeline::enforce_size_limit(&bytes)?;
    let image = pipeline::load_image(&bytes)?;
    let image = pipeline::flatten_alpha(image);

    let scratch = ScratchFile::write_png(&state.config.scratch_dir, &image).map_err(|e| {
        error!("failed to write scratch image: {}", e);
        ExtractError::OcrEngineFailure
    })?;
    debug!("staged scratch image at {}", scratch.path().display());

    let recognized = match tokio::time::timeout(
        state.config.ocr.timeout,
        state.engine.recognize(&image),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("OCR failed ({}): {}", state.engine.name(), e);
            return Err(ExtractError::OcrEngineFailure);
        }
        Err(_) => {
            error!(
                "OCR timed out after {:?} ({})",
                state.config.ocr.timeout,
                state.engine.name()
            );
            return Err(ExtractError::Timeout);
        }
    };

    let text = recognized.trim();
    if text.is_empty() {
        return Err(ExtractError::NoTextFound);
    }

    Ok(Json(ExtractResponse {
        text: text.to_string(),
    }))
}
