//! Service layer for task creation, lookup, and state-governed mutation.

use crate::task::{
    domain::{
        StatePolicyViolation, Task, TaskContext, TaskDomainError, TaskId, TaskPatch, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
}

impl CreateTaskRequest {
    /// Creates a request with a title and an empty description.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Request payload for linking a child task to an owning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTaskRequest {
    task_id: TaskId,
    child_id: TaskId,
}

impl LinkTaskRequest {
    /// Creates a link request from the owning task to `child_id`.
    #[must_use]
    pub const fn new(task_id: TaskId, child_id: TaskId) -> Self {
        Self { task_id, child_id }
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the child task identifier.
    #[must_use]
    pub const fn child_id(&self) -> TaskId {
        self.child_id
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or state policy rejected the operation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Returns the state policy violation behind this error, if any.
    #[must_use]
    pub const fn policy_violation(&self) -> Option<StatePolicyViolation> {
        match self {
            Self::Domain(TaskDomainError::StatePolicy(violation)) => Some(*violation),
            _ => None,
        }
    }
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<StatePolicyViolation> for TaskLifecycleError {
    fn from(violation: StatePolicyViolation) -> Self {
        Self::Domain(TaskDomainError::StatePolicy(violation))
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Each operation loads the task fresh from the repository, binds a
/// [`TaskContext`] to it, applies the operation, and persists the result.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a new task in the `New` state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title is invalid or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let task = Task::new(title, request.description, &*self.clock);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Retrieves a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Lists every task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn list(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Edits a task's title and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task and
    /// [`TaskLifecycleError::Domain`] when the task's state forbids editing or
    /// the new title is invalid.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> TaskLifecycleResult<Task> {
        let mut context = TaskContext::bind(self.get(id).await?);
        context.update(patch, &*self.clock).inspect_err(|err| {
            debug!(task_id = %id, error = %err, "task update rejected");
        })?;

        let task = context.into_task();
        self.repository.update(&task).await?;
        info!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Links a child task to an owning task.
    ///
    /// A child that is not yet in progress is promoted to `InProgress`, and
    /// both tasks are persisted together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when either task does not
    /// exist and [`TaskLifecycleError::Domain`] when the link is not
    /// permitted.
    pub async fn link(&self, request: LinkTaskRequest) -> TaskLifecycleResult<Task> {
        let owner = self.get(request.task_id()).await?;
        let mut child = self.get(request.child_id()).await?;

        let mut context = TaskContext::bind(owner);
        let promoted = context.link(&mut child, &*self.clock).inspect_err(|err| {
            debug!(
                task_id = %request.task_id(),
                child_id = %request.child_id(),
                error = %err,
                "task link rejected"
            );
        })?;

        let linked_owner = context.into_task();
        self.repository.save_link(&linked_owner, &child).await?;
        info!(
            task_id = %linked_owner.id(),
            child_id = %child.id(),
            child_promoted = promoted,
            "task linked"
        );
        Ok(linked_owner)
    }

    /// Advances a task one step through its lifecycle.
    ///
    /// `New` moves to `InProgress`, `InProgress` to `Done`, and `Done` rolls
    /// back to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn advance_state(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut context = TaskContext::bind(self.get(id).await?);
        let previous = context.policy().state();
        let next = context.advance_state(&*self.clock);

        let task = context.into_task();
        self.repository.update(&task).await?;
        info!(task_id = %id, from = %previous, to = %next, "task state advanced");
        Ok(task)
    }

    /// Deletes a task and every link pointing at it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        self.repository.delete(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}
