use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    repository::TaskRepository,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

/// Path of a single task under its project.
#[derive(Debug, Deserialize)]
pub struct TaskPath {
    pub project_id: i32,
    pub id: i32,
}

/// Retrieves the tasks of one project.
///
/// ## Query Parameters:
/// - `status` (optional): one of `todo`, `in_progress`, `done`.
/// - `priority` (optional): one of `low`, `medium`, `high`.
///
/// Unrecognised values are ignored rather than rejected.
#[get("/{project_id}/tasks")]
pub async fn list_project_tasks(
    tasks: web::Data<TaskRepository>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let found = tasks.list_for_project(path.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// Creates a task in a project.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: unknown status or priority.
/// - `404 Not Found`: the project does not exist.
/// - `422 Unprocessable Entity`: empty or over-long title.
#[post("/{project_id}/tasks")]
pub async fn create_task(
    tasks: web::Data<TaskRepository>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
    input: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let task = tasks.create(path.into_inner(), input.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

#[get("/{project_id}/tasks/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskRepository>,
    _user: AuthenticatedUser,
    path: web::Path<TaskPath>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(path.project_id, path.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to a task of the project in the path.
#[patch("/{project_id}/tasks/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskRepository>,
    _user: AuthenticatedUser,
    path: web::Path<TaskPath>,
    update: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    update.validate()?;
    let task = tasks
        .update(path.project_id, path.id, update.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task of the project in the path and returns it.
#[delete("/{project_id}/tasks/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskRepository>,
    _user: AuthenticatedUser,
    path: web::Path<TaskPath>,
) -> Result<impl Responder, AppError> {
    let task = tasks.delete(path.project_id, path.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Tasks across every project, with the same optional filters.
#[get("")]
pub async fn filter_tasks(
    tasks: web::Data<TaskRepository>,
    _user: AuthenticatedUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let found = tasks.filter(&query).await?;
    Ok(HttpResponse::Ok().json(found))
}
