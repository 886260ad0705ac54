//! Task-source integration contract for the Wondoner aggregator.
//!
//! Plugins that connect third-party task systems (Jira, GitHub, Todoist)
//! implement [`ports::TaskSourceIntegration`] and exchange data through the
//! standardized records in [`domain`]. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Host-side services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
