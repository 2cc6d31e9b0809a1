//! Per-state operation rules for tasks.
//!
//! | State        | update           | link                   | advance      |
//! |--------------|------------------|------------------------|--------------|
//! | `New`        | title/description| rejected               | `InProgress` |
//! | `InProgress` | rejected         | allowed, child checked | `Done`       |
//! | `Done`       | rejected         | rejected               | `InProgress` |

use super::{StatePolicyViolation, Task, TaskDomainError, TaskId, TaskPatch, TaskState, TaskTitle};
use mockable::Clock;

/// Operation legality rules bound to one lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatePolicy {
    /// Rules for [`TaskState::New`].
    New,
    /// Rules for [`TaskState::InProgress`].
    InProgress,
    /// Rules for [`TaskState::Done`].
    Done,
}

impl StatePolicy {
    /// Resolves the policy governing `state`.
    #[must_use]
    pub const fn for_state(state: TaskState) -> Self {
        match state {
            TaskState::New => Self::New,
            TaskState::InProgress => Self::InProgress,
            TaskState::Done => Self::Done,
        }
    }

    /// Returns the state this policy governs.
    #[must_use]
    pub const fn state(self) -> TaskState {
        match self {
            Self::New => TaskState::New,
            Self::InProgress => TaskState::InProgress,
            Self::Done => TaskState::Done,
        }
    }

    /// Checks whether editing is permitted.
    ///
    /// # Errors
    ///
    /// Returns the state's edit violation for `InProgress` and `Done`.
    pub const fn check_update(self) -> Result<(), StatePolicyViolation> {
        match self {
            Self::New => Ok(()),
            Self::InProgress => Err(StatePolicyViolation::InProgressTaskEdited),
            Self::Done => Err(StatePolicyViolation::DoneTaskEdited),
        }
    }

    /// Checks whether `owner` may link to `child`.
    ///
    /// Checks run in order: owner state, child state, then self-link.
    ///
    /// # Errors
    ///
    /// Returns [`StatePolicyViolation::NewTaskLinked`] or
    /// [`StatePolicyViolation::DoneTaskLinked`] when the owner is not in
    /// progress, [`StatePolicyViolation::DoneChildLinked`] when the child is
    /// done, and [`StatePolicyViolation::SelfLink`] when `child` is `owner`.
    pub fn check_link(self, owner: TaskId, child: &Task) -> Result<(), StatePolicyViolation> {
        match self {
            Self::New => Err(StatePolicyViolation::NewTaskLinked),
            Self::Done => Err(StatePolicyViolation::DoneTaskLinked),
            Self::InProgress => {
                if child.state() == TaskState::Done {
                    return Err(StatePolicyViolation::DoneChildLinked);
                }
                if child.id() == owner {
                    return Err(StatePolicyViolation::SelfLink);
                }
                Ok(())
            }
        }
    }

    /// Returns the state reached by advancing from this policy's state.
    ///
    /// `Done` rolls back to `InProgress`; no state is terminal.
    #[must_use]
    pub const fn next_state(self) -> TaskState {
        match self {
            Self::New | Self::Done => TaskState::InProgress,
            Self::InProgress => TaskState::Done,
        }
    }

    /// Applies an edit to `task`.
    ///
    /// The state check runs before title validation, so a bad title on a
    /// locked task reports the state violation.
    pub(super) fn update(
        self,
        task: &mut Task,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_update()?;
        let TaskPatch { title, description } = patch;
        let validated_title = title.map(TaskTitle::new).transpose()?;
        task.apply_details(validated_title, description, clock);
        Ok(())
    }

    /// Links `child` from `owner`, promoting the child to `InProgress`.
    ///
    /// Returns `true` when the child's state was changed.
    pub(super) fn link(
        self,
        owner: &mut Task,
        child: &mut Task,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        self.check_link(owner.id(), child)?;
        owner.add_child(child.id(), clock);
        if child.state() == TaskState::InProgress {
            return Ok(false);
        }
        child.set_state(TaskState::InProgress, clock);
        Ok(true)
    }

    pub(super) fn advance(self, task: &mut Task, clock: &impl Clock) -> TaskState {
        let next = self.next_state();
        task.set_state(next, clock);
        next
    }
}
