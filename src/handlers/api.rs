use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use serde_json::{json, Value};
use tower_sessions::Session;
use crate::app::AppState;
use crate::errors::{ApiError, AppError};
use crate::models::{EntryView, RecordForm};
use crate::services::{accounting::entry_request, visibility};
use super::{current_session, run_blocking};

pub async fn api_list_entries(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<EntryView>>, ApiError> {
    let caller = current_session(&session).await?;

    let store = state.store.clone();
    let entries = run_blocking(move || visibility::visible_entries(&store, &caller)).await?;

    Ok(Json(entries))
}

pub async fn api_create_entry(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<RecordForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let caller = current_session(&session).await?;
    // Same text fields and timestamp shapes as the HTML form.
    let Json(form) = payload.map_err(|rejection| {
        AppError::Validation(format!("invalid request body: {}", rejection.body_text()))
    })?;
    let request = entry_request(form)?;

    let accounting = state.accounting.clone();
    let user_id = caller.user_id;
    let entry_id = run_blocking(move || accounting.record_entry(user_id, request)).await?;

    tracing::debug!("API created entry {} for {}", entry_id, caller.username);
    Ok((StatusCode::CREATED, Json(json!({ "id": entry_id }))))
}
