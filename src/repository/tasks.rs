use std::sync::Arc;

use log::info;

use super::filter::build_predicate;
use crate::error::{AppError, AppResult};
use crate::models::{NewTask, Task, TaskChanges, TaskInput, TaskQuery, TaskUpdate};
use crate::store::TaskStore;

/// CRUD over tasks, always scoped to a parent project.
///
/// Mutations re-read the task by both its own id and the claimed project id;
/// a task id that exists under another project is treated as absent.
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Creates a task after checking status and priority.
    ///
    /// Parent existence is left to the store's foreign key, which surfaces as
    /// `ProjectNotFound`.
    pub async fn create(&self, project_id: i32, input: TaskInput) -> AppResult<Task> {
        let task = NewTask {
            project_id,
            title: input.title,
            description: input.description,
            status: input.status.parse()?,
            priority: input.priority.parse()?,
        };

        let task = self.store.insert_task(task).await?;
        info!("Created task {} in project {}", task.id, project_id);
        Ok(task)
    }

    pub async fn get(&self, project_id: i32, task_id: i32) -> AppResult<Task> {
        self.scoped(project_id, task_id).await
    }

    /// Applies a partial update to a task of `project_id`.
    ///
    /// Any unrecognised status or priority fails the whole update before a
    /// write. An update with no fields returns the stored task unchanged.
    pub async fn update(&self, project_id: i32, task_id: i32, update: TaskUpdate) -> AppResult<Task> {
        let existing = self.scoped(project_id, task_id).await?;

        let changes = TaskChanges::from_update(update)?;
        if changes.is_empty() {
            return Ok(existing);
        }

        self.store
            .update_task_in_project(project_id, task_id, changes)
            .await?
            .ok_or(AppError::TaskNotFoundInProject { project_id })
    }

    /// Removes a task of `project_id` and returns it.
    pub async fn delete(&self, project_id: i32, task_id: i32) -> AppResult<Task> {
        self.scoped(project_id, task_id).await?;

        let removed = self
            .store
            .delete_task_in_project(project_id, task_id)
            .await?
            .ok_or(AppError::TaskNotFoundInProject { project_id })?;
        info!("Deleted task {} from project {}", task_id, project_id);
        Ok(removed)
    }

    /// Tasks of one project, narrowed by the optional filters.
    pub async fn list_for_project(&self, project_id: i32, query: &TaskQuery) -> AppResult<Vec<Task>> {
        self.store
            .select_tasks(&build_predicate(Some(project_id), query))
            .await
    }

    /// Tasks across all projects, narrowed by the optional filters.
    pub async fn filter(&self, query: &TaskQuery) -> AppResult<Vec<Task>> {
        self.store.select_tasks(&build_predicate(None, query)).await
    }

    async fn scoped(&self, project_id: i32, task_id: i32) -> AppResult<Task> {
        self.store
            .find_task_in_project(project_id, task_id)
            .await?
            .ok_or(AppError::TaskNotFoundInProject { project_id })
    }
}
