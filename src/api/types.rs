//! Request and response bodies for the task HTTP API.

use crate::task::domain::{Task, TaskId, TaskState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskBody {
    /// Task title.
    pub title: String,
    /// Task description; empty when omitted.
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /tasks/{id}/link`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkTaskBody {
    /// Identifier of the task to link as a child, as sent by the caller.
    pub child: String,
}

/// Task representation returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Identifiers of linked child tasks.
    pub children: Vec<TaskId>,
    /// Lifecycle state.
    pub state: TaskState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            children: task.children().iter().copied().collect(),
            state: task.state(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Body returned by `POST /tasks/{id}/change_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    /// State reached by the transition.
    pub state: TaskState,
}
