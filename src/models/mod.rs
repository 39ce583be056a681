pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput, ProjectUpdate};
pub use task::{NewTask, Task, TaskChanges, TaskInput, TaskPriority, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{NewUser, User, UserView};
