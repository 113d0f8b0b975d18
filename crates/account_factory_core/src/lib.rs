//! Shared account-factory domain primitives.
//!
//! This crate owns the request/result wire contracts, field validation,
//! snapshot-backed request validation, and batch planning. It intentionally
//! excludes AWS SDK and process/runtime concerns.

pub mod batching;
pub mod contract;
pub mod fields;
pub mod validate;
