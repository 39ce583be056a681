use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ProjectInput, ProjectUpdate},
    repository::ProjectRepository,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every project, ordered by id.
#[get("")]
pub async fn list_projects(
    projects: web::Data<ProjectRepository>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(projects.list().await?))
}

/// Creates a project.
///
/// ## Responses:
/// - `201 Created`: the new project.
/// - `422 Unprocessable Entity`: empty or over-long name.
#[post("")]
pub async fn create_project(
    projects: web::Data<ProjectRepository>,
    _user: AuthenticatedUser,
    input: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let project = projects.create(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[get("/{id}")]
pub async fn get_project(
    projects: web::Data<ProjectRepository>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let project = projects
        .get_by_id(id)
        .await?
        .ok_or(AppError::ProjectNotFound(id))?;
    Ok(HttpResponse::Ok().json(project))
}

/// Applies a partial update. An empty body returns the project unchanged.
#[patch("/{id}")]
pub async fn update_project(
    projects: web::Data<ProjectRepository>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
    update: web::Json<ProjectUpdate>,
) -> Result<impl Responder, AppError> {
    update.validate()?;
    let project = projects.update(path.into_inner(), update.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Deletes the project together with its tasks and returns the removed project.
#[delete("/{id}")]
pub async fn delete_project(
    projects: web::Data<ProjectRepository>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let project = projects
        .delete(id)
        .await?
        .ok_or(AppError::ProjectNotFound(id))?;
    Ok(HttpResponse::Ok().json(project))
}
