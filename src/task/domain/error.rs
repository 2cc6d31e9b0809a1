//! Error types for task domain validation, parsing, and state policy.

use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("task title is {length} characters long, expected at most {max}")]
    TitleTooLong {
        /// Character count of the rejected title.
        length: usize,
        /// Largest accepted character count.
        max: usize,
    },

    /// The operation is not legal in the task's current lifecycle state.
    #[error(transparent)]
    StatePolicy(#[from] StatePolicyViolation),
}

/// Operation rejected by the policy of the task's current state.
///
/// The display strings are part of the public contract: HTTP callers receive
/// them verbatim as the error detail.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum StatePolicyViolation {
    /// Linking was attempted on a task that has not been started.
    #[error("New tasks can not be linked.")]
    NewTaskLinked,

    /// Editing was attempted on a task that is in progress.
    #[error("Tasks In Progress can not be edited.")]
    InProgressTaskEdited,

    /// Editing was attempted on a completed task.
    #[error("Done Tasks can not be edited.")]
    DoneTaskEdited,

    /// Linking was attempted on a completed task.
    #[error("Done Tasks can not be linked.")]
    DoneTaskLinked,

    /// The candidate child of a link is already done.
    #[error("In-progress task can't be linked to a done task.")]
    DoneChildLinked,

    /// The candidate child of a link is the owning task itself.
    #[error("Tasks Can not be linked to themselves.")]
    SelfLink,
}

/// Error returned while parsing task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
