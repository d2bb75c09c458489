//! Axum route handlers for the generation API.
//!
//! Handlers only resolve profiles and validate input; every generated answer
//! comes back from the orchestrator, with `fallback` telling the client
//! whether it got the degraded default.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::request::{JobMatch, LearningPath};
use crate::models::profile::UserProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LearningPathResponse {
    pub learning_path: LearningPath,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub content: String,
    pub target_lang: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_content: String,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub matches: Vec<JobMatch>,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub user_id: Uuid,
    pub course_id: String,
    pub progress: Value,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub status: String,
    pub feedback: String,
    pub fallback: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/learning-path
pub async fn handle_learning_path(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> Result<Json<LearningPathResponse>, AppError> {
    let profile = load_profile(&state, request.user_id).await?;
    let generated = state.orchestrator.generate_learning_path(&profile).await;

    Ok(Json(LearningPathResponse {
        fallback: generated.is_fallback(),
        learning_path: generated.value,
    }))
}

/// POST /api/v1/translate
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if request.target_lang.trim().is_empty() {
        return Err(AppError::Validation("target_lang cannot be empty".to_string()));
    }

    let generated = state
        .orchestrator
        .translate_content(&request.content, request.target_lang.trim())
        .await;

    Ok(Json(TranslateResponse {
        fallback: generated.is_fallback(),
        translated_content: generated.value,
    }))
}

/// POST /api/v1/job-matches
pub async fn handle_job_matches(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let profile = load_profile(&state, request.user_id).await?;
    let generated = state
        .orchestrator
        .match_jobs(&profile.skills, &profile.job_preferences)
        .await;

    Ok(Json(JobMatchResponse {
        fallback: generated.is_fallback(),
        matches: generated.value,
    }))
}

/// POST /api/v1/progress
///
/// Records the progress value first, then asks for feedback in the learner's
/// language. Feedback generation cannot fail the request.
pub async fn handle_progress(
    State(state): State<AppState>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    if request.course_id.trim().is_empty() {
        return Err(AppError::Validation("course_id cannot be empty".to_string()));
    }

    let profile = state
        .profiles
        .record_progress(request.user_id, &request.course_id, request.progress.clone())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    let generated = state
        .orchestrator
        .synthesize_feedback(&profile.language, &request.course_id, &request.progress)
        .await;

    Ok(Json(ProgressResponse {
        status: "updated".to_string(),
        fallback: generated.is_fallback(),
        feedback: generated.value,
    }))
}

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<UserProfile, AppError> {
    state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}
