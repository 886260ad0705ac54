//! Port contracts for task-source integrations.
//!
//! Ports define the interface plugins implement and the host consumes.

pub mod source;

pub use source::{IntegrationError, IntegrationResult, TaskChangeStream, TaskSourceIntegration};
