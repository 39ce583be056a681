//! Project/task domain layer: referential scoping, enumeration checks and
//! filter predicates on top of the storage traits.

pub mod filter;
pub mod projects;
pub mod tasks;

pub use filter::{build_predicate, TaskPredicate};
pub use projects::ProjectRepository;
pub use tasks::TaskRepository;
