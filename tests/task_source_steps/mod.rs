//! Step definitions for task-source contract scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
