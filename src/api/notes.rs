//! `/api/notes` routes.

use axum::extract::{OriginalUri, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::info;

use super::extract::{location, missing_field, parse_id, ApiJson};
use super::views::NoteView;
use super::AppState;
use crate::domain::{NewNote, Note, NoteChanges};
use crate::error::AppError;

const NOTE_MISSING: &str = "note doesn't exist";

/// Note fields as they arrive in a POST or PATCH body.
///
/// Absent and `null` fields both deserialize to `None`. Unknown fields are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct NoteFields {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteFields {
    /// Validate a creation body, reporting the first missing field.
    fn into_new_note(self) -> Result<NewNote, AppError> {
        let user_id = self.user_id.ok_or_else(|| missing_field("user_id"))?;
        let title = self.title.ok_or_else(|| missing_field("title"))?;
        let content = self.content.ok_or_else(|| missing_field("content"))?;
        Ok(NewNote {
            user_id,
            title,
            content,
        })
    }

    fn into_changes(self) -> NoteChanges {
        NoteChanges {
            user_id: self.user_id,
            title: self.title,
            content: self.content,
        }
    }
}

/// Every note of one user, attached by [`load_user_notes`].
#[derive(Debug, Clone)]
pub struct UserNotes(pub Vec<Note>);

pub fn router(state: AppState) -> Router<AppState> {
    let item = Router::new()
        .route(
            "/:note_id",
            get(get_note).patch(update_note).delete(delete_note),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), load_note));

    let by_user = Router::new()
        .route("/user/:user_id", get(get_notes_by_user))
        .route_layer(middleware::from_fn_with_state(state, load_user_notes));

    Router::new()
        .route("/", get(list_notes).post(create_note))
        .merge(item)
        .merge(by_user)
}

/// Resolve `:note_id` to a stored note before the item handlers run.
pub async fn load_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let id = parse_id(&note_id)?;
    let note = state
        .repo
        .get_note(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOTE_MISSING.into()))?;

    request.extensions_mut().insert(note);
    Ok(next.run(request).await)
}

/// Resolve `:user_id` to that user's notes. A user without notes is a 404.
pub async fn load_user_notes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = parse_id(&user_id)?;
    let notes = state.repo.list_notes_by_user(user_id).await?;
    if notes.is_empty() {
        return Err(AppError::NotFound(NOTE_MISSING.into()));
    }

    request.extensions_mut().insert(UserNotes(notes));
    Ok(next.run(request).await)
}

pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<NoteView>>, AppError> {
    let notes = state.repo.list_notes().await?;
    Ok(Json(notes.iter().map(NoteView::from).collect()))
}

pub async fn create_note(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(fields): ApiJson<NoteFields>,
) -> Result<impl IntoResponse, AppError> {
    let new_note = fields.into_new_note()?;
    let note = state.repo.insert_note(&new_note).await?;
    info!(note_id = note.id, user_id = note.user_id, "note created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(uri.path(), note.id))],
        Json(NoteView::from(&note)),
    ))
}

pub async fn get_note(Extension(note): Extension<Note>) -> Json<NoteView> {
    Json(NoteView::from(&note))
}

pub async fn update_note(
    State(state): State<AppState>,
    Extension(note): Extension<Note>,
    ApiJson(fields): ApiJson<NoteFields>,
) -> Result<Json<NoteView>, AppError> {
    let changes = fields.into_changes();
    if changes.is_empty() {
        return Err(AppError::BadRequest(
            "Request body must contain either 'user_id', 'title' or 'content'".into(),
        ));
    }

    let updated = state
        .repo
        .update_note(note.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(NOTE_MISSING.into()))?;
    info!(note_id = updated.id, fields = changes.supplied(), "note updated");

    Ok(Json(NoteView::from(&updated)))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Extension(note): Extension<Note>,
) -> Result<StatusCode, AppError> {
    // Zero rows means the note went away after `load_note` saw it.
    if state.repo.delete_note(note.id).await? == 0 {
        return Err(AppError::NotFound(NOTE_MISSING.into()));
    }
    info!(note_id = note.id, "note deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_notes_by_user(
    Extension(UserNotes(notes)): Extension<UserNotes>,
) -> Json<Vec<NoteView>> {
    Json(notes.iter().map(NoteView::from).collect())
}
