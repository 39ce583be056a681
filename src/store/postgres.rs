//! PostgreSQL backend.
//!
//! Queries are built at runtime with `sqlx::QueryBuilder` so every
//! client-influenced value travels as a bound parameter. The schema lives in
//! `migrations/` and is applied by [`PgStore::migrate`].

use async_trait::async_trait;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};

use super::{ProjectStore, TaskStore, UserStore};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    NewTask, NewUser, Project, ProjectInput, ProjectUpdate, Task, TaskChanges, User,
};
use crate::repository::filter::TaskPredicate;

const USER_COLUMNS: &str = "id, email, password_hash, name, created_at";
const PROJECT_COLUMNS: &str = "id, name, description, created_at";
const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, created_at";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Connection pool wrapper implementing every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens the pool. Called once at startup.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        info!(
            "Connected to database (max {} connections)",
            config.database_max_connections
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `migrations/`.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Closes the pool. Called once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn constraint_violation(error: &sqlx::Error, code: &str) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some(code),
        _ => false,
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &TaskPredicate) {
    match predicate {
        TaskPredicate::ProjectIs(id) => {
            builder.push("project_id = ").push_bind(*id);
        }
        TaskPredicate::StatusIs(status) => {
            builder.push("status = ").push_bind(*status);
        }
        TaskPredicate::PriorityIs(priority) => {
            builder.push("priority = ").push_bind(*priority);
        }
        TaskPredicate::All(clauses) if clauses.is_empty() => {
            builder.push("TRUE");
        }
        TaskPredicate::All(clauses) => {
            builder.push("(");
            for (index, clause) in clauses.iter().enumerate() {
                if index > 0 {
                    builder.push(" AND ");
                }
                push_predicate(builder, clause);
            }
            builder.push(")");
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if constraint_violation(&e, UNIQUE_VIOLATION) {
                AppError::DuplicateEmail
            } else {
                e.into()
            }
        })
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, input: ProjectInput) -> AppResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (name, description) VALUES ($1, $2) RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(input.name)
        .bind(input.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects ORDER BY id",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn find_project(&self, id: i32) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn update_project(&self, id: i32, update: ProjectUpdate) -> AppResult<Option<Project>> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE projects SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = update.name {
                set.push("name = ").push_bind_unseparated(name);
            }
            if let Some(description) = update.description {
                set.push("description = ").push_bind_unseparated(description);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", PROJECT_COLUMNS));

        let project = builder
            .build_query_as::<Project>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn delete_project(&self, id: i32) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "DELETE FROM projects WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: NewTask) -> AppResult<Task> {
        let project_id = task.project_id;
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (project_id, title, description, status, priority) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.project_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.priority)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if constraint_violation(&e, FOREIGN_KEY_VIOLATION) {
                AppError::ProjectNotFound(project_id)
            } else {
                e.into()
            }
        })
    }

    async fn find_task_in_project(&self, project_id: i32, task_id: i32) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND project_id = $2 LIMIT 1",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn select_tasks(&self, predicate: &TaskPredicate) -> AppResult<Vec<Task>> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks WHERE ", TASK_COLUMNS));
        push_predicate(&mut builder, predicate);
        builder.push(" ORDER BY id");

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task_in_project(
        &self,
        project_id: i32,
        task_id: i32,
        changes: TaskChanges,
    ) -> AppResult<Option<Task>> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE tasks SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(title) = changes.title {
                set.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = changes.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(status) = changes.status {
                set.push("status = ").push_bind_unseparated(status);
            }
            if let Some(priority) = changes.priority {
                set.push("priority = ").push_bind_unseparated(priority);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(task_id)
            .push(" AND project_id = ")
            .push_bind(project_id)
            .push(format!(" RETURNING {}", TASK_COLUMNS));

        let task = builder
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task_in_project(&self, project_id: i32, task_id: i32) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = $1 AND project_id = $2 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    #[test]
    fn test_predicate_sql_uses_bound_parameters() {
        let predicate = TaskPredicate::All(vec![
            TaskPredicate::ProjectIs(1),
            TaskPredicate::StatusIs(TaskStatus::Done),
            TaskPredicate::PriorityIs(TaskPriority::High),
        ]);
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM tasks WHERE ");
        push_predicate(&mut builder, &predicate);

        assert_eq!(
            builder.sql(),
            "SELECT id FROM tasks WHERE (project_id = $1 AND status = $2 AND priority = $3)"
        );
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM tasks WHERE ");
        push_predicate(&mut builder, &TaskPredicate::All(vec![]));
        assert_eq!(builder.sql(), "SELECT id FROM tasks WHERE TRUE");
    }
}
