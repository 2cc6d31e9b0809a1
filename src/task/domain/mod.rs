//! Domain model for task lifecycle management.
//!
//! Tasks carry a title, description, lifecycle state, and directed links to
//! child tasks. What may be done to a task depends on its state; those rules
//! live in [`StatePolicy`] and are applied through [`TaskContext`].

mod context;
mod error;
mod ids;
mod policy;
mod task;

pub use context::TaskContext;
pub use error::{ParseTaskStateError, StatePolicyViolation, TaskDomainError};
pub use ids::{TaskId, TaskTitle};
pub use policy::StatePolicy;
pub use task::{PersistedTaskData, Task, TaskPatch, TaskState};
