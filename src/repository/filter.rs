//! Task filter predicates.
//!
//! [`build_predicate`] turns an optional base project and the raw
//! `status` / `priority` query values into a [`TaskPredicate`] in one step.
//! Only values that parse into their closed enumeration become clauses, so
//! nothing a client sends can change the shape of the resulting query beyond
//! adding one of the two whitelisted equality checks. Unrecognised values are
//! dropped without an error.

use log::debug;

use crate::models::{Task, TaskPriority, TaskQuery, TaskStatus};

/// Boolean expression over task columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPredicate {
    ProjectIs(i32),
    StatusIs(TaskStatus),
    PriorityIs(TaskPriority),
    /// Conjunction. An empty list matches every task.
    All(Vec<TaskPredicate>),
}

impl TaskPredicate {
    /// Evaluates the predicate against an in-memory task.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskPredicate::ProjectIs(id) => task.project_id == *id,
            TaskPredicate::StatusIs(status) => task.status == *status,
            TaskPredicate::PriorityIs(priority) => task.priority == *priority,
            TaskPredicate::All(clauses) => clauses.iter().all(|clause| clause.matches(task)),
        }
    }
}

/// Builds the predicate for a task listing.
///
/// `base` constrains the listing to one project; `None` spans all projects.
pub fn build_predicate(base: Option<i32>, query: &TaskQuery) -> TaskPredicate {
    let status = whitelisted::<TaskStatus>("status", query.status.as_deref());
    let priority = whitelisted::<TaskPriority>("priority", query.priority.as_deref());

    let clauses = base
        .map(TaskPredicate::ProjectIs)
        .into_iter()
        .chain(status.map(TaskPredicate::StatusIs))
        .chain(priority.map(TaskPredicate::PriorityIs))
        .collect();

    TaskPredicate::All(clauses)
}

fn whitelisted<T: std::str::FromStr>(field: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring unrecognised {} filter value {:?}", field, raw);
            None
        }
    }
}
