//! Note HTTP handlers.
//!
//! One handler per REST operation. Handlers are independent of the hosting
//! style: they only talk to `AppState::store`.

use crate::error::{ApiError, NoteOperation};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use log::info;
use notepad_core::{Note, NoteDraft, NoteId};
use serde::Deserialize;
use std::time::Instant;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Request body for create and update.
///
/// Missing and `null` fields are accepted here and rejected by validation,
/// so they report the same message as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct NoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteBody {
    fn into_draft(self) -> NoteDraft {
        NoteDraft::new(
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
        )
    }
}

/// Serves the single-page notes UI.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness message served at `/` and `/api`.
pub async fn api_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Notepad API is running" }))
}

/// List all notes, most recently updated first.
///
/// # Returns
/// - 200 OK with an array of notes
/// - 500 Internal Server Error if the store is unreachable
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let started_at = Instant::now();
    let notes = state
        .store
        .call(|service| service.list_notes())
        .await
        .map_err(|err| ApiError::from_store(NoteOperation::List, err))?;

    info!(
        "event=note_list module=api status=ok count={} duration_ms={}",
        notes.len(),
        started_at.elapsed().as_millis()
    );
    Ok(Json(notes))
}

/// Get one note by id.
///
/// # Returns
/// - 200 OK with the note
/// - 404 Not Found if the id is unknown or not an integer
/// - 500 Internal Server Error if the store is unreachable
pub async fn get_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&raw_id)?;
    let started_at = Instant::now();
    let note = state
        .store
        .call(move |service| service.get_note(id))
        .await
        .map_err(|err| ApiError::from_store(NoteOperation::Get, err))?;

    info!(
        "event=note_get module=api status=ok note_id={} duration_ms={}",
        id,
        started_at.elapsed().as_millis()
    );
    Ok(Json(note))
}

/// Create a note.
///
/// # Returns
/// - 201 Created with the stored note
/// - 400 Bad Request if `title` or `content` is missing or empty
/// - 500 Internal Server Error if the store is unreachable
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NoteBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload.map_err(ApiError::from_json_rejection)?;
    let draft = body.into_draft();
    let started_at = Instant::now();
    let note = state
        .store
        .call(move |service| service.create_note(&draft))
        .await
        .map_err(|err| ApiError::from_store(NoteOperation::Create, err))?;

    info!(
        "event=note_create module=api status=ok note_id={} duration_ms={}",
        note.id,
        started_at.elapsed().as_millis()
    );
    Ok((StatusCode::CREATED, Json(note)))
}

/// Replace title and content of a note.
///
/// # Returns
/// - 200 OK with the updated note
/// - 400 Bad Request if `title` or `content` is missing or empty
/// - 404 Not Found if the id is unknown
/// - 500 Internal Server Error if the store is unreachable
pub async fn update_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<NoteBody>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Json(body) = payload.map_err(ApiError::from_json_rejection)?;
    let draft = body.into_draft();
    // Invalid drafts report 400 even for ids that cannot exist.
    draft.validate()?;
    let id = parse_note_id(&raw_id)?;

    let started_at = Instant::now();
    let note = state
        .store
        .call(move |service| service.update_note(id, &draft))
        .await
        .map_err(|err| ApiError::from_store(NoteOperation::Update, err))?;

    info!(
        "event=note_update module=api status=ok note_id={} duration_ms={}",
        id,
        started_at.elapsed().as_millis()
    );
    Ok(Json(note))
}

/// Delete a note.
///
/// # Returns
/// - 204 No Content on success
/// - 404 Not Found if the id is unknown
/// - 500 Internal Server Error if the store is unreachable
pub async fn delete_note(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_note_id(&raw_id)?;
    let started_at = Instant::now();
    state
        .store
        .call(move |service| service.delete_note(id))
        .await
        .map_err(|err| ApiError::from_store(NoteOperation::Delete, err))?;

    info!(
        "event=note_delete module=api status=ok note_id={} duration_ms={}",
        id,
        started_at.elapsed().as_millis()
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Ids that are not integers can never match a stored note.
fn parse_note_id(raw: &str) -> Result<NoteId, ApiError> {
    raw.trim().parse::<NoteId>().map_err(|_| ApiError::NotFound)
}
