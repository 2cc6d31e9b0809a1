//! Step definitions for task state policy scenarios.

mod when;
