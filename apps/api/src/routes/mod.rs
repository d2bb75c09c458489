pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/learning-path", post(handlers::handle_learning_path))
        .route("/api/v1/translate", post(handlers::handle_translate))
        .route("/api/v1/job-matches", post(handlers::handle_job_matches))
        .route("/api/v1/progress", post(handlers::handle_progress))
        .with_state(state)
}
