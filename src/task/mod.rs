//! Task lifecycle management.
//!
//! Tasks move through `New`, `InProgress`, and `Done`, and an in-progress
//! task may link to other tasks. Which edits, links, and transitions are
//! legal depends on the task's current state. The module follows hexagonal
//! architecture:
//!
//! - Domain types and state policies in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
