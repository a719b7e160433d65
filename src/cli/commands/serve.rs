//! HTTP API server for integration with other systems.
//!
//! Exposes notes, flashcard and quiz generation over JSON.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::StudyError;
use crate::generator::{Flashcard, QuizQuestion, StudyGenerator};
use crate::transcript::{resolve_transcript, YoutubeTranscripts};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    generator: StudyGenerator,
    transcripts: YoutubeTranscripts,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        generator: StudyGenerator::from_settings(&settings)?,
        transcripts: YoutubeTranscripts::new(&settings.transcript),
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("StudySynth API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /");
    Output::kv("Notes", "POST /api/notes");
    Output::kv("Flashcards", "POST /api/flashcards?count=N");
    Output::kv("Quiz", "POST /api/quiz?count=N");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/api/notes", post(notes))
        .route("/api/flashcards", post(flashcards))
        .route("/api/quiz", post(quiz))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct VideoRequest {
    /// YouTube URL or video ID
    #[serde(default)]
    url: Option<String>,
    /// Inline transcript; takes precedence over `url`
    #[serde(default)]
    transcript: Option<String>,
}

#[derive(Deserialize)]
struct CountQuery {
    count: Option<i64>,
}

impl CountQuery {
    /// Requested count saturated into `u32`; the generator clamps it to its range.
    fn count(&self) -> Option<u32> {
        self.count
            .map(|count| count.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

#[derive(Serialize)]
struct NotesResponse {
    notes: String,
}

#[derive(Serialize)]
struct FlashcardsResponse {
    flashcards: Vec<Flashcard>,
}

#[derive(Serialize)]
struct QuizResponse {
    quiz: Vec<QuizQuestion>,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

fn error_response(e: StudyError) -> Response {
    warn!("Request failed: {}", e);
    bad_request(e.to_string())
}

fn bad_request(detail: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { detail })).into_response()
}

impl AppState {
    async fn transcript(&self, req: &VideoRequest) -> Result<String, StudyError> {
        resolve_transcript(
            &self.transcripts,
            req.url.as_deref(),
            req.transcript.as_deref(),
        )
        .await
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "studysynth" }))
}

async fn notes(State(state): State<Arc<AppState>>, Json(req): Json<VideoRequest>) -> Response {
    let result = async {
        let transcript = state.transcript(&req).await?;
        state.generator.generate_notes(&transcript).await
    }
    .await;

    match result {
        Ok(notes) => Json(NotesResponse { notes }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn flashcards(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CountQuery>, QueryRejection>,
    Json(req): Json<VideoRequest>,
) -> Response {
    let count = match query {
        Ok(Query(query)) => query
            .count()
            .unwrap_or_else(|| state.generator.default_flashcards()),
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let result = async {
        let transcript = state.transcript(&req).await?;
        state.generator.generate_flashcards(&transcript, count).await
    }
    .await;

    match result {
        Ok(flashcards) => Json(FlashcardsResponse { flashcards }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn quiz(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CountQuery>, QueryRejection>,
    Json(req): Json<VideoRequest>,
) -> Response {
    let count = match query {
        Ok(Query(query)) => query
            .count()
            .unwrap_or_else(|| state.generator.default_quiz()),
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let result = async {
        let transcript = state.transcript(&req).await?;
        state.generator.generate_quiz(&transcript, count).await
    }
    .await;

    match result {
        Ok(quiz) => Json(QuizResponse { quiz }).into_response(),
        Err(e) => error_response(e),
    }
}
