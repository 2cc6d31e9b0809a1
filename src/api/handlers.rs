//! Axum handlers for task lifecycle endpoints.

use super::{
    ApiError,
    types::{CreateTaskBody, LinkTaskBody, StateResponse, TaskResponse},
};
use crate::task::{
    domain::{TaskId, TaskPatch},
    ports::TaskRepository,
    services::{CreateTaskRequest, LinkTaskRequest, TaskLifecycleService},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

type SharedService<R, C> = State<Arc<TaskLifecycleService<R, C>>>;
type ApiResult<T> = Result<T, ApiError>;

/// Parses a task identifier taken from the path or a request body.
///
/// Text that is not a UUID cannot name any task, so it is reported as not
/// found rather than as a malformed request.
fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    Uuid::parse_str(raw.trim())
        .map(TaskId::from_uuid)
        .map_err(|_| ApiError::MalformedId(raw.to_owned()))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub(super) async fn list_tasks<R, C>(
    State(service): SharedService<R, C>,
) -> ApiResult<Json<Vec<TaskResponse>>>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let tasks = service.list().await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

pub(super) async fn create_task<R, C>(
    State(service): SharedService<R, C>,
    Json(body): Json<CreateTaskBody>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let request = CreateTaskRequest::new(body.title).with_description(body.description);
    let task = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

pub(super) async fn get_task<R, C>(
    State(service): SharedService<R, C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let task = service.get(parse_task_id(&raw_id)?).await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn update_task<R, C>(
    State(service): SharedService<R, C>,
    Path(raw_id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let task = service.update(parse_task_id(&raw_id)?, patch).await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn delete_task<R, C>(
    State(service): SharedService<R, C>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    service.delete(parse_task_id(&raw_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn link_task<R, C>(
    State(service): SharedService<R, C>,
    Path(raw_id): Path<String>,
    Json(body): Json<LinkTaskBody>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let request = LinkTaskRequest::new(parse_task_id(&raw_id)?, parse_task_id(&body.child)?);
    let owner = service.link(request).await?;
    Ok(Json(TaskResponse::from(&owner)))
}

pub(super) async fn change_state<R, C>(
    State(service): SharedService<R, C>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<StateResponse>>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let task = service.advance_state(parse_task_id(&raw_id)?).await?;
    Ok(Json(StateResponse {
        state: task.state(),
    }))
}
