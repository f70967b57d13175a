//! API handlers

pub mod quote;
pub mod stats;
pub mod tasks;
pub mod version;
pub mod weather;
