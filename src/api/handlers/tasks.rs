//! Task API handlers

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::storage::tasks::{Task, TaskDraft, TaskPatch};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Delete task response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

/// Task id taken from the URL path
///
/// An id that is not a valid number cannot name any task, so it is
/// reported as a JSON 404 like any other unknown id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(pub u64);

impl<S> FromRequestParts<S> for TaskId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found())?;
        raw.parse().map(TaskId).map_err(|_| ApiError::not_found())
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/tasks
/// List all tasks in insertion order
pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.store.list().await)
}

/// GET /api/tasks/{id}
/// Get a single task
pub async fn get_task(
    State(state): State<AppState>,
    TaskId(id): TaskId,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.store.get(id).await?))
}

/// POST /api/tasks
/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.store.create(req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
/// Merge the provided fields over an existing task
pub async fn update_task(
    State(state): State<AppState>,
    TaskId(id): TaskId,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.store.update(id, patch).await?))
}

/// DELETE /api/tasks/{id}
/// Permanently delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    TaskId(id): TaskId,
) -> Result<Json<DeleteTaskResponse>, ApiError> {
    state.store.delete(id).await?;
    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
