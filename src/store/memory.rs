//! In-memory store.
//!
//! Keeps all three tables behind one lock and enforces the same constraints
//! as the Postgres schema: unique email, task → project foreign key and the
//! cascade on project deletion. Every successful insert, update or delete
//! bumps a write counter so tests can assert that an operation never reached
//! storage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{ProjectStore, TaskStore, UserStore};
use crate::error::{AppError, AppResult};
use crate::models::{
    NewTask, NewUser, Project, ProjectInput, ProjectUpdate, Task, TaskChanges, User,
};
use crate::repository::filter::TaskPredicate;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    last_user_id: i32,
    last_project_id: i32,
    last_task_id: i32,
}

/// Shared, cloneable in-memory backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        self.record_write();
        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, input: ProjectInput) -> AppResult<Project> {
        let mut tables = self.tables.write();
        tables.last_project_id += 1;
        let project = Project {
            id: tables.last_project_id,
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        };
        tables.projects.push(project.clone());
        self.record_write();
        Ok(project)
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(self.tables.read().projects.clone())
    }

    async fn find_project(&self, id: i32) -> AppResult<Option<Project>> {
        let tables = self.tables.read();
        Ok(tables.projects.iter().find(|project| project.id == id).cloned())
    }

    async fn update_project(&self, id: i32, update: ProjectUpdate) -> AppResult<Option<Project>> {
        let mut tables = self.tables.write();
        let Some(project) = tables.projects.iter_mut().find(|project| project.id == id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = Some(description);
        }
        let updated = project.clone();
        self.record_write();
        Ok(Some(updated))
    }

    async fn delete_project(&self, id: i32) -> AppResult<Option<Project>> {
        let mut tables = self.tables.write();
        let Some(index) = tables.projects.iter().position(|project| project.id == id) else {
            return Ok(None);
        };

        let removed = tables.projects.remove(index);
        tables.tasks.retain(|task| task.project_id != id);
        self.record_write();
        Ok(Some(removed))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: NewTask) -> AppResult<Task> {
        let mut tables = self.tables.write();
        if !tables.projects.iter().any(|project| project.id == task.project_id) {
            return Err(AppError::ProjectNotFound(task.project_id));
        }

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            created_at: Utc::now(),
        };
        tables.tasks.push(task.clone());
        self.record_write();
        Ok(task)
    }

    async fn find_task_in_project(&self, project_id: i32, task_id: i32) -> AppResult<Option<Task>> {
        let tables = self.tables.read();
        Ok(tables
            .tasks
            .iter()
            .find(|task| task.id == task_id && task.project_id == project_id)
            .cloned())
    }

    async fn select_tasks(&self, predicate: &TaskPredicate) -> AppResult<Vec<Task>> {
        let tables = self.tables.read();
        Ok(tables
            .tasks
            .iter()
            .filter(|task| predicate.matches(task))
            .cloned()
            .collect())
    }

    async fn update_task_in_project(
        &self,
        project_id: i32,
        task_id: i32,
        changes: TaskChanges,
    ) -> AppResult<Option<Task>> {
        let mut tables = self.tables.write();
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id && task.project_id == project_id)
        else {
            return Ok(None);
        };

        *task = changes.apply(task);
        let updated = task.clone();
        self.record_write();
        Ok(Some(updated))
    }

    async fn delete_task_in_project(&self, project_id: i32, task_id: i32) -> AppResult<Option<Task>> {
        let mut tables = self.tables.write();
        let Some(index) = tables
            .tasks
            .iter()
            .position(|task| task.id == task_id && task.project_id == project_id)
        else {
            return Ok(None);
        };

        let removed = tables.tasks.remove(index);
        self.record_write();
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn new_task(project_id: i32, title: &str) -> NewTask {
        NewTask {
            project_id,
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
        }
    }

    #[actix_rt::test]
    async fn test_unique_email() {
        let store = MemoryStore::new();
        let user = NewUser {
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "A".to_string(),
        };

        let created = store.insert_user(user.clone()).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(matches!(
            store.insert_user(user).await,
            Err(AppError::DuplicateEmail)
        ));
        assert_eq!(store.writes(), 1);
    }

    #[actix_rt::test]
    async fn test_task_requires_existing_project() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_task(new_task(42, "orphan")).await,
            Err(AppError::ProjectNotFound(42))
        ));
        assert_eq!(store.writes(), 0);
    }

    #[actix_rt::test]
    async fn test_project_delete_cascades() {
        let store = MemoryStore::new();
        let keep = store
            .insert_project(ProjectInput {
                name: "keep".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let doomed = store
            .insert_project(ProjectInput {
                name: "doomed".to_string(),
                description: None,
            })
            .await
            .unwrap();
        store.insert_task(new_task(doomed.id, "one")).await.unwrap();
        store.insert_task(new_task(doomed.id, "two")).await.unwrap();
        let survivor = store.insert_task(new_task(keep.id, "three")).await.unwrap();

        store.delete_project(doomed.id).await.unwrap();

        let remaining = store.select_tasks(&TaskPredicate::All(vec![])).await.unwrap();
        assert_eq!(remaining, vec![survivor]);
    }
}
