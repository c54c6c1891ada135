pub mod analysis;
pub mod error;
pub mod gemini;
pub mod nlp;
pub mod pdf_processor;
pub mod quiz;
pub mod reference;
pub mod server;
pub mod session;
pub mod settings;

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::gemini::GeminiClient;
use crate::reference::ReferenceStore;
use crate::server::AppState;
use crate::settings::AppSettings;

/// Bind the configured address and serve the API until the process exits.
pub async fn run(settings: AppSettings) -> AppResult<()> {
    let bind_addr = settings.bind();
    let reference_file = settings.reference_file();

    log::info!("Reference terms: {}", reference_file.display());
    log::info!("Summary model: {}", settings.model());
    if settings.gemini_api_key.is_none() {
        log::warn!("GEMINI_API_KEY not set, /analyze will fail until it is configured");
    }

    let state = AppState::new(
        ReferenceStore::new(reference_file),
        Arc::new(GeminiClient::from_settings(&settings)),
        settings.quiz_questions(),
    );
    let app = server::router(state, settings.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Io(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    log::info!("Listening on {}", bind_addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))
}
