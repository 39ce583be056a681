//! Storage boundary.
//!
//! The repositories and the auth service talk to persistence only through
//! these traits. A backend is responsible for the guarantees the domain
//! layer relies on without re-checking them:
//!
//! - `users.email` is unique; a clashing insert fails with
//!   [`AppError::DuplicateEmail`](crate::error::AppError::DuplicateEmail).
//! - a task insert whose project does not exist fails with
//!   [`AppError::ProjectNotFound`](crate::error::AppError::ProjectNotFound).
//! - deleting a project deletes its tasks.
//!
//! Two backends ship with the crate: [`postgres::PgStore`] for deployments and
//! [`memory::MemoryStore`] for tests and local experiments.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    NewTask, NewUser, Project, ProjectInput, ProjectUpdate, Task, TaskChanges, User,
};
use crate::repository::filter::TaskPredicate;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Persists a new user, failing with `DuplicateEmail` on a clash.
    async fn insert_user(&self, user: NewUser) -> AppResult<User>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, input: ProjectInput) -> AppResult<Project>;

    /// All projects, ordered by id.
    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    async fn find_project(&self, id: i32) -> AppResult<Option<Project>>;

    /// Writes the supplied fields. `None` when the project vanished.
    async fn update_project(&self, id: i32, update: ProjectUpdate) -> AppResult<Option<Project>>;

    /// Removes the project and, through the cascade, its tasks.
    async fn delete_project(&self, id: i32) -> AppResult<Option<Project>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a task, failing with `ProjectNotFound` when the parent is missing.
    async fn insert_task(&self, task: NewTask) -> AppResult<Task>;

    /// Reads a task matching both ids.
    async fn find_task_in_project(&self, project_id: i32, task_id: i32) -> AppResult<Option<Task>>;

    /// Tasks matching the predicate, ordered by id.
    async fn select_tasks(&self, predicate: &TaskPredicate) -> AppResult<Vec<Task>>;

    async fn update_task_in_project(
        &self,
        project_id: i32,
        task_id: i32,
        changes: TaskChanges,
    ) -> AppResult<Option<Task>>;

    async fn delete_task_in_project(&self, project_id: i32, task_id: i32) -> AppResult<Option<Task>>;
}
