//! HTTP API
//!
//! - POST /analyze-reference - Extract and save reference terms from PDFs
//! - POST /analyze - Summarize a PDF against the reference terms
//! - GET /generate-quiz - Build a quiz from an analyzed document
//! - POST /submit-quiz - Grade quiz answers
//! - GET /reference-terms - Current reference term set
//! - GET /health - Liveness check

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use uuid::Uuid;

use crate::analysis::DocumentAnalyzer;
use crate::error::{AppError, AppResult};
use crate::gemini::Summarizer;
use crate::pdf_processor::extract_text_or_empty;
use crate::quiz::{grade_answers, GradingResult, Question, QuizGenerator, SubmittedAnswer};
use crate::reference::ReferenceStore;
use crate::session::SessionStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const MAX_QUIZ_QUESTIONS: usize = 20;

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub analyzer: DocumentAnalyzer,
    pub quiz: QuizGenerator,
    pub references: Arc<ReferenceStore>,
    pub sessions: Arc<SessionStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub quiz_questions: usize,
}

impl AppState {
    pub fn new(
        references: ReferenceStore,
        summarizer: Arc<dyn Summarizer>,
        quiz_questions: usize,
    ) -> Self {
        Self {
            analyzer: DocumentAnalyzer::default(),
            quiz: QuizGenerator::default(),
            references: Arc::new(references),
            sessions: Arc::new(SessionStore::default()),
            summarizer,
            quiz_questions,
        }
    }
}

// ============================================================================
// Error mapping
// ============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Serialize)]
struct ReferenceResponse {
    message: &'static str,
    terms: Vec<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    summary: Vec<String>,
    matching_terms: Vec<String>,
    text_length: usize,
    session_id: Uuid,
}

#[derive(Deserialize)]
struct QuizQuery {
    session: Option<Uuid>,
    count: Option<usize>,
}

#[derive(Serialize)]
struct QuizResponse {
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct TermsResponse {
    terms: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

// ============================================================================
// Helpers
// ============================================================================

/// All multipart parts named `file`, in submission order.
async fn read_uploads(multipart: Result<Multipart, MultipartRejection>) -> AppResult<Vec<Upload>> {
    let Ok(mut multipart) = multipart else {
        return Ok(Vec::new());
    };

    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read upload: {}", e)))?;
        uploads.push(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
    Ok(uploads)
}

/// Extraction runs off the async workers; a panic inside the PDF parser
/// counts as an unreadable file.
async fn extract_upload_text(upload: Upload) -> String {
    let file_name = upload.file_name.clone();
    match tokio::task::spawn_blocking(move || {
        extract_text_or_empty(&upload.file_name, &upload.bytes)
    })
    .await
    {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Error reading PDF {}: {}", file_name, e);
            String::new()
        }
    }
}

fn join_error(context: &str, e: tokio::task::JoinError) -> AppError {
    AppError::Process(format!("{}: {}", context, e))
}

// ============================================================================
// Handlers
// ============================================================================

async fn analyze_reference_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReferenceResponse>, AppError> {
    let uploads = read_uploads(multipart).await?;
    if uploads.is_empty() {
        return Err(AppError::bad_request("No files provided"));
    }
    log::info!("Analyzing {} reference document(s)", uploads.len());

    let mut all_terms = BTreeSet::new();
    for upload in uploads.into_iter().filter(|u| !u.file_name.is_empty()) {
        let text = extract_upload_text(upload).await;
        let analyzer = state.analyzer.clone();
        let terms = tokio::task::spawn_blocking(move || analyzer.extract_key_terms(&text))
            .await
            .map_err(|e| join_error("Term extraction failed", e))?;
        all_terms.extend(terms);
    }

    state.references.save(&all_terms)?;

    Ok(Json(ReferenceResponse {
        message: "Reference documents analyzed successfully",
        terms: all_terms.into_iter().collect(),
    }))
}

async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_uploads(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::bad_request("No file provided"))?;
    if upload.file_name.is_empty() {
        return Err(AppError::bad_request("No file selected"));
    }
    log::info!("Analyzing {}", upload.file_name);

    let text = extract_upload_text(upload).await;
    let session_id = state.sessions.insert(text.clone())?;

    let reference_terms = state.references.load();
    let analyzer = state.analyzer.clone();
    let (text, matching_terms) = tokio::task::spawn_blocking(move || {
        let matching = analyzer.compare_with_reference(&text, &reference_terms);
        (text, matching)
    })
    .await
    .map_err(|e| join_error("Term extraction failed", e))?;

    let summary = state.summarizer.summarize(&text, &matching_terms).await?;

    Ok(Json(AnalyzeResponse {
        summary,
        matching_terms,
        text_length: text.chars().count(),
        session_id,
    }))
}

async fn generate_quiz_handler(
    State(state): State<AppState>,
    query: Result<Query<QuizQuery>, QueryRejection>,
) -> Result<Json<QuizResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;

    let text = match query.session {
        Some(id) => state.sessions.get(&id)?,
        None => state.sessions.latest()?,
    }
    .filter(|t| !t.is_empty())
    .ok_or_else(|| AppError::bad_request("No document has been analyzed yet"))?;

    let count = query
        .count
        .unwrap_or(state.quiz_questions)
        .clamp(1, MAX_QUIZ_QUESTIONS);
    log::info!("Generating questions from text of length: {}", text.len());

    let quiz = state.quiz.clone();
    let questions = tokio::task::spawn_blocking(move || {
        quiz.generate_questions(&text, count, &mut rand::thread_rng())
    })
    .await
    .map_err(|e| join_error("Quiz generation failed", e))?;

    log::info!("Generated questions: {}", questions.len());
    if questions.is_empty() {
        return Err(AppError::bad_request("Could not generate questions from the text"));
    }

    Ok(Json(QuizResponse {
        total_questions: questions.len(),
        questions,
    }))
}

async fn submit_quiz_handler(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<GradingResult>, AppError> {
    let Ok(Json(mut body)) = body else {
        return Err(AppError::bad_request("No answers provided"));
    };
    let answers = body
        .get_mut("answers")
        .map(serde_json::Value::take)
        .ok_or_else(|| AppError::bad_request("No answers provided"))?;
    // null is an empty submission
    let answers: Vec<SubmittedAnswer> = if answers.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(answers)
            .map_err(|e| AppError::bad_request(format!("Invalid answers: {}", e)))?
    };

    let result = grade_answers(&answers);
    log::info!("Graded quiz: {}/{}", result.score, result.total);
    Ok(Json(result))
}

async fn reference_terms_handler(State(state): State<AppState>) -> Json<TermsResponse> {
    Json(TermsResponse {
        terms: state.references.load().into_iter().collect(),
    })
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
        sessions: state.sessions.len(),
    })
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/analyze-reference", post(analyze_reference_handler))
        .route("/analyze", post(analyze_handler))
        .route("/generate-quiz", get(generate_quiz_handler))
        .route("/submit-quiz", post(submit_quiz_handler))
        .route("/reference-terms", get(reference_terms_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}
