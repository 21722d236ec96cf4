use crate::errors::AppError;
use crate::export::{build_log_text, log_file_name};
use crate::models::{ArchiveEntry, ExerciseRequest, WeekResponse};
use crate::state::AppState;
use crate::storage::{persist_store, KeyValueStore, MemoryStore, CURRENT_WEEK_KEY};
use crate::tracker::{ensure_current_week, get_week_state, load_archive, set_exercise_flag};
use crate::ui::render_index;
use crate::week::{Day, WeekKey};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::Local;
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut store = state.store.lock().await;
    let week = current_week(&state, &mut store).await?;
    let week_state = get_week_state(&*store, &week);
    Ok(Html(render_index(&week, &week_state)))
}

pub async fn get_week(State(state): State<AppState>) -> Result<Json<WeekResponse>, AppError> {
    let mut store = state.store.lock().await;
    let week = current_week(&state, &mut store).await?;
    let week_state = get_week_state(&*store, &week);
    Ok(Json(WeekResponse { week, state: week_state }))
}

pub async fn get_archive(State(state): State<AppState>) -> Result<Json<Vec<ArchiveEntry>>, AppError> {
    let mut store = state.store.lock().await;
    current_week(&state, &mut store).await?;
    Ok(Json(load_archive(&*store)))
}

pub async fn set_exercise(
    State(state): State<AppState>,
    Json(payload): Json<ExerciseRequest>,
) -> Result<Json<WeekResponse>, AppError> {
    let day: Day = payload.day.parse().map_err(AppError::bad_request)?;
    let exercise = payload.exercise.trim();
    if exercise.is_empty() {
        return Err(AppError::bad_request("exercise must not be empty"));
    }

    let mut store = state.store.lock().await;
    let week = current_week(&state, &mut store).await?;
    let week_state = set_exercise_flag(&mut *store, &week, day, exercise, payload.checked)?;
    persist_store(&state.data_path, &store).await?;
    debug!("{week} {day} {exercise} -> {}", payload.checked);

    Ok(Json(WeekResponse { week, state: week_state }))
}

pub async fn export_log(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut store = state.store.lock().await;
    let week = current_week(&state, &mut store).await?;
    let text = build_log_text(&*store, &week, &Local::now());
    let disposition = format!("attachment; filename=\"{}\"", log_file_name(&week));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    ))
}

/// Runs rollover before any week state is touched and mirrors the store to
/// disk when the week pointer moved.
async fn current_week(state: &AppState, store: &mut MemoryStore) -> Result<WeekKey, AppError> {
    let before = store.get(CURRENT_WEEK_KEY);
    let week = ensure_current_week(store)?;
    if before.as_deref() != Some(week.as_str()) {
        persist_store(&state.data_path, store).await?;
    }
    Ok(week)
}
