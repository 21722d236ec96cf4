use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/export", get(handlers::export_log))
        .route("/api/week", get(handlers::get_week))
        .route("/api/archive", get(handlers::get_archive))
        .route("/api/exercise", post(handlers::set_exercise))
        .with_state(state)
}
