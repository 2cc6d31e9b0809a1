//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, LinkTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
