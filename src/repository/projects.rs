use std::sync::Arc;

use log::info;

use crate::error::{AppError, AppResult};
use crate::models::{Project, ProjectInput, ProjectUpdate};
use crate::store::ProjectStore;

/// CRUD over projects.
pub struct ProjectRepository {
    store: Arc<dyn ProjectStore>,
}

impl ProjectRepository {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: ProjectInput) -> AppResult<Project> {
        let project = self.store.insert_project(input).await?;
        info!("Created project {}", project.id);
        Ok(project)
    }

    pub async fn list(&self) -> AppResult<Vec<Project>> {
        self.store.list_projects().await
    }

    /// A missing project is `Ok(None)` here; the caller decides whether that is an error.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Project>> {
        self.store.find_project(id).await
    }

    /// Applies a partial update.
    ///
    /// Fails with `ProjectNotFound` for an unknown id. An update carrying no
    /// field returns the stored project without touching storage.
    pub async fn update(&self, id: i32, update: ProjectUpdate) -> AppResult<Project> {
        let existing = self
            .store
            .find_project(id)
            .await?
            .ok_or(AppError::ProjectNotFound(id))?;

        if update.is_empty() {
            return Ok(existing);
        }

        self.store
            .update_project(id, update)
            .await?
            .ok_or(AppError::ProjectNotFound(id))
    }

    /// Deletes the project; its tasks go with it through the store's cascade.
    pub async fn delete(&self, id: i32) -> AppResult<Option<Project>> {
        let removed = self.store.delete_project(id).await?;
        if removed.is_some() {
            info!("Deleted project {} and its tasks", id);
        }
        Ok(removed)
    }
}
