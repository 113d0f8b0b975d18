//! Environment-driven configuration for the CLI binaries.
//!
//! The guardrail control identifier, the notification topic, and the
//! organization root are deployment inputs, never defaulted.

use std::time::Duration;

use account_factory_core::contract::{DEFAULT_BATCH_SIZE, DEFAULT_VALIDATION_WORKERS};

use crate::batch::DEFAULT_BATCH_PACING;
use crate::creator::PollPolicy;

pub const TOPIC_ARN_VAR: &str = "PIPELINE_TOPIC_ARN";
pub const GUARDRAIL_CONTROL_VAR: &str = "GUARDRAIL_CONTROL_ID";
pub const ORG_ROOT_VAR: &str = "ORG_ROOT_ID";
pub const BATCH_SIZE_VAR: &str = "BATCH_SIZE";
pub const BATCH_PACING_VAR: &str = "BATCH_PACING_SECONDS";
pub const VALIDATION_WORKERS_VAR: &str = "VALIDATION_WORKERS";
pub const POLL_INITIAL_VAR: &str = "POLL_INITIAL_SECONDS";
pub const POLL_MAX_ATTEMPTS_VAR: &str = "POLL_MAX_ATTEMPTS";
pub const VALIDATE_BEFORE_CREATE_VAR: &str = "VALIDATE_BEFORE_CREATE";

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub org_root_id: String,
    pub workers: usize,
}

impl ValidatorConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            org_root_id: required(ORG_ROOT_VAR)?,
            workers: optional_usize(VALIDATION_WORKERS_VAR, DEFAULT_VALIDATION_WORKERS)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreatorConfig {
    pub topic_arn: String,
    pub guardrail_control_id: String,
    pub batch_size: usize,
    pub batch_pacing: Duration,
    pub poll: PollPolicy,
    pub validate_before_create: bool,
    /// Required only when `validate_before_create` is set.
    pub org_root_id: Option<String>,
}

impl CreatorConfig {
    pub fn from_env() -> Result<Self, String> {
        let validate_before_create = optional_flag(VALIDATE_BEFORE_CREATE_VAR);
        let org_root_id = if validate_before_create {
            Some(required(ORG_ROOT_VAR)?)
        } else {
            std::env::var(ORG_ROOT_VAR).ok()
        };

        let poll = PollPolicy {
            initial_interval: Duration::from_secs(optional_u64(
                POLL_INITIAL_VAR,
                PollPolicy::default().initial_interval.as_secs(),
            )?),
            max_interval: PollPolicy::default().max_interval,
            max_attempts: optional_usize(
                POLL_MAX_ATTEMPTS_VAR,
                PollPolicy::default().max_attempts,
            )?,
        };

        Ok(Self {
            topic_arn: required(TOPIC_ARN_VAR)?,
            guardrail_control_id: required(GUARDRAIL_CONTROL_VAR)?,
            batch_size: optional_usize(BATCH_SIZE_VAR, DEFAULT_BATCH_SIZE)?,
            batch_pacing: Duration::from_secs(optional_u64(
                BATCH_PACING_VAR,
                DEFAULT_BATCH_PACING.as_secs(),
            )?),
            poll,
            validate_before_create,
            org_root_id,
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{name} must be configured")),
    }
}

fn optional_usize(name: &str, default: usize) -> Result<usize, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| format!("{name} must be a positive integer")),
        Err(_) => Ok(default),
    }
}

fn optional_u64(name: &str, default: u64) -> Result<u64, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("{name} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}

fn optional_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
