//! Wondoner interfaces: the shared contract between task-source plugins and
//! the Wondoner task aggregator.
//!
//! This crate defines the vocabulary plugins and the host exchange: a
//! canonical task record, project labels, a two-valued status, and the
//! abstract integration contract every source plugin implements. It performs
//! no network I/O, persistence, or scheduling.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Standardized records with no infrastructure dependencies
//! - **Ports**: The plugin contract as an async trait
//! - **Adapters**: An in-memory reference implementation of the contract
//!
//! # Modules
//!
//! - [`integration`]: Task-source contract, standardized models, and registry

pub mod integration;

pub use integration::domain::{Project, StandardTask, TaskStatus};
pub use integration::ports::TaskSourceIntegration;
