//! AWS-oriented adapters and pipelines for bulk account provisioning.
//!
//! This crate owns runtime integration details (AWS SDK clients, worker
//! pools, environment configuration, and the CLI binaries) on top of the
//! pure contracts in `account_factory_core`.

pub mod adapters;
pub mod batch;
pub mod bulk;
pub mod config;
pub mod creator;
pub mod input;
pub mod logging;
