//! Unit tests for the task lifecycle module.


use crate::task::domain::{PersistedTaskData, Task, TaskId, TaskState, TaskTitle};
use chrono::Utc;
use std::collections::BTreeSet;

/// Builds a task already sitting in `state`.
pub(super) fn task_in_state(state: TaskState, title: &str) -> Task {
    let now = Utc::now();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new(title).unwrap_or_else(|err| panic!("fixture title: {err}")),
        description: format!("A task that is {state}"),
        state,
        children: BTreeSet::new(),
        created_at: now,
        updated_at: now,
    })
}
