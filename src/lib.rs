//! Taskboard: task tracking with state-constrained editing and linking.
//!
//! Every task moves through `new -> in_progress -> done`, and a done task
//! can be reopened back to `in_progress`. What a task permits depends on its
//! current state: only new tasks may be edited, and only in-progress tasks
//! may link children. Linking a new child promotes it to in progress.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task domain, repository port, adapters and lifecycle service
//! - [`api`]: HTTP routes over the lifecycle service
//! - [`config`]: Environment-driven runtime configuration

pub mod api;
pub mod config;
pub mod task;
