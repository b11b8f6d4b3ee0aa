use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{CreateTodo, Todo, UpdateTodo};
use crate::summarize;
use crate::AppState;

pub const DELETE_INCOMPLETE_MESSAGE: &str = "Only completed todos can be deleted.";

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.store.list().await?))
}

pub async fn create_todo(
    State(state): State<AppState>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(input) = input?;
    let todo = state.store.insert(input.validate()?).await?;
    info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = id?;
    let Json(input) = input?;
    let todo = state
        .store
        .update(id, input.validate()?)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(%id, completed = todo.completed, "todo updated");
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Path(id) = id?;
    let todo = state.store.get(id).await?.ok_or(AppError::NotFound)?;
    if !todo.completed {
        return Err(AppError::BusinessRule(DELETE_INCOMPLETE_MESSAGE.to_string()));
    }
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(%id, "todo deleted");
    Ok(Json(DeleteResponse { success: true }))
}

pub async fn summarize_todos(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = summarize::summarize(
        state.store.as_ref(),
        state.generator.as_ref(),
        state.notifier.as_ref(),
    )
    .await?;
    Ok(Json(SummaryResponse { summary }))
}
