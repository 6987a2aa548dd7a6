//! `/api/todos` routes.

use axum::extract::{OriginalUri, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::info;

use super::extract::{location, missing_field, parse_id, ApiJson};
use super::views::TodoView;
use super::AppState;
use crate::domain::{NewTodo, Todo, TodoChanges};
use crate::error::AppError;

const TODO_MISSING: &str = "todo doesn't exist";

#[derive(Debug, Deserialize)]
pub struct TodoFields {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoFields {
    fn into_new_todo(self) -> Result<NewTodo, AppError> {
        let title = self.title.ok_or_else(|| missing_field("title"))?;
        Ok(NewTodo {
            title,
            completed: self.completed.unwrap_or(false),
        })
    }

    fn into_changes(self) -> TodoChanges {
        TodoChanges {
            title: self.title,
            completed: self.completed,
        }
    }
}

pub fn router(state: AppState) -> Router<AppState> {
    let item = Router::new()
        .route(
            "/:todo_id",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(state, load_todo));

    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .merge(item)
}

/// Resolve `:todo_id` to a stored todo before the item handlers run.
pub async fn load_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let id = parse_id(&todo_id)?;
    let todo = state
        .repo
        .get_todo(id)
        .await?
        .ok_or_else(|| AppError::NotFound(TODO_MISSING.into()))?;

    request.extensions_mut().insert(todo);
    Ok(next.run(request).await)
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoView>>, AppError> {
    let todos = state.repo.list_todos().await?;
    Ok(Json(todos.iter().map(TodoView::from).collect()))
}

pub async fn create_todo(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(fields): ApiJson<TodoFields>,
) -> Result<impl IntoResponse, AppError> {
    let new_todo = fields.into_new_todo()?;
    let todo = state.repo.insert_todo(&new_todo).await?;
    info!(todo_id = todo.id, "todo created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(uri.path(), todo.id))],
        Json(TodoView::from(&todo)),
    ))
}

pub async fn get_todo(Extension(todo): Extension<Todo>) -> Json<TodoView> {
    Json(TodoView::from(&todo))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(todo): Extension<Todo>,
    ApiJson(fields): ApiJson<TodoFields>,
) -> Result<Json<TodoView>, AppError> {
    let changes = fields.into_changes();
    if changes.is_empty() {
        return Err(AppError::BadRequest(
            "Request body must contain either 'title' or 'completed'".into(),
        ));
    }

    let updated = state
        .repo
        .update_todo(todo.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(TODO_MISSING.into()))?;
    info!(todo_id = updated.id, completed = updated.completed, "todo updated");

    Ok(Json(TodoView::from(&updated)))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(todo): Extension<Todo>,
) -> Result<StatusCode, AppError> {
    if state.repo.delete_todo(todo.id).await? == 0 {
        return Err(AppError::NotFound(TODO_MISSING.into()));
    }
    info!(todo_id = todo.id, "todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(json: serde_json::Value) -> TodoFields {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_new_todo_requires_title() {
        match fields(serde_json::json!({"completed": true})).into_new_todo() {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Missing 'title' in request body"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_new_todo_defaults_completed() {
        let todo = fields(serde_json::json!({"title": "t"}))
            .into_new_todo()
            .unwrap();
        assert_eq!(todo, NewTodo::new("t"));
    }

    #[test]
    fn test_completed_false_is_a_change() {
        let changes = fields(serde_json::json!({"completed": false})).into_changes();
        assert_eq!(changes.completed, Some(false));
        assert!(!changes.is_empty());
        assert!(fields(serde_json::json!({"foobar": "x"}))
            .into_changes()
            .is_empty());
    }
}
