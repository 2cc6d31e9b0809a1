//! Dispatch wrapper binding a task to the policy of its current state.

use super::{StatePolicy, Task, TaskDomainError, TaskPatch, TaskState};
use mockable::Clock;

/// A task bound to the [`StatePolicy`] of its state at bind time.
///
/// Callers invoke operations without naming the state. After
/// [`TaskContext::advance_state`] the policy is resolved again from the
/// returned state, so a following call uses the rules of the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContext {
    task: Task,
    policy: StatePolicy,
}

impl TaskContext {
    /// Binds `task` to the policy for its current state.
    #[must_use]
    pub const fn bind(task: Task) -> Self {
        let policy = StatePolicy::for_state(task.state());
        Self { task, policy }
    }

    /// Returns the bound policy.
    #[must_use]
    pub const fn policy(&self) -> StatePolicy {
        self.policy
    }

    /// Returns the bound task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Releases the bound task.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }

    /// Edits the task's title and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatePolicy`] unless the task is `New`, or
    /// a title validation error when the patch carries an invalid title.
    pub fn update(&mut self, patch: TaskPatch, clock: &impl Clock) -> Result<&Task, TaskDomainError> {
        self.policy.update(&mut self.task, patch, clock)?;
        Ok(&self.task)
    }

    /// Links `child` from the bound task.
    ///
    /// Returns `true` when the child was promoted to `InProgress` and must be
    /// persisted alongside the owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatePolicy`] when the owner is not in
    /// progress, the child is done, or the child is the owner. Neither task is
    /// modified on error.
    pub fn link(&mut self, child: &mut Task, clock: &impl Clock) -> Result<bool, TaskDomainError> {
        self.policy.link(&mut self.task, child, clock)
    }

    /// Moves the task one step through its lifecycle and rebinds the policy.
    pub fn advance_state(&mut self, clock: &impl Clock) -> TaskState {
        let next = self.policy.advance(&mut self.task, clock);
        self.policy = StatePolicy::for_state(next);
        next
    }
}
