//! Task operations - shared business logic layer
//!
//! Owns the task collection and everything derived from it, so that the
//! Web API handlers and the CLI go through the same code path.

pub mod stats;
pub mod tasks;
