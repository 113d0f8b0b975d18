use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BULK_REQUESTS_KEY: &str = "bulk_account_requests";
pub const ACCOUNT_REQUEST_KEY: &str = "account_request";

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_VALIDATION_WORKERS: usize = 10;

/// One element of `bulk_account_requests`, and the whole payload of the
/// single-request validation tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRequestEnvelope {
    pub account_request: AccountRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRequest {
    pub control_tower_parameters: ControlTowerParameters,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub account_tags: BTreeMap<String, String>,
}

/// Control Tower provisioning parameters. Fields default to the empty string
/// so that an absent key fails the format validators rather than the parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlTowerParameters {
    #[serde(rename = "AccountEmail", default)]
    pub account_email: String,
    #[serde(rename = "AccountName", default)]
    pub account_name: String,
    #[serde(rename = "ManagedOrganizationalUnit", default)]
    pub managed_organizational_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreationStatus {
    Pending,
    Success,
    Failed,
}

/// Outcome of one account-creation request. `request` echoes the raw input
/// envelope so downstream consumers can correlate results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreationResult {
    pub request: Value,
    pub status: CreationStatus,
    pub account_id: Option<String>,
    pub error: Option<String>,
}

impl CreationResult {
    pub fn success(request: Value, account_id: String) -> Self {
        Self {
            request,
            status: CreationStatus::Success,
            account_id: Some(account_id),
            error: None,
        }
    }

    pub fn failed(request: Value, error: impl Into<String>) -> Self {
        Self {
            request,
            status: CreationStatus::Failed,
            account_id: None,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == CreationStatus::Success
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkValidationSummary {
    pub total_requests: usize,
    pub valid_requests: usize,
    pub invalid_requests: usize,
    pub validation_results: Vec<ValidationResult>,
}

impl BulkValidationSummary {
    pub fn from_results(validation_results: Vec<ValidationResult>) -> Self {
        let valid_requests = validation_results.iter().filter(|r| r.valid).count();
        Self {
            total_requests: validation_results.len(),
            valid_requests,
            invalid_requests: validation_results.len() - valid_requests,
            validation_results,
        }
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_requests == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkCreationSummary {
    pub total_requests: usize,
    pub successful_creations: usize,
    pub failed_creations: usize,
    pub results: Vec<CreationResult>,
}

impl BulkCreationSummary {
    pub fn from_results(results: Vec<CreationResult>) -> Self {
        let successful_creations = results.iter().filter(|r| r.succeeded()).count();
        Self {
            total_requests: results.len(),
            successful_creations,
            failed_creations: results.len() - successful_creations,
            results,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_creations == 0
    }
}

/// Provider-neutral view of an asynchronous account-creation job. The AWS
/// adapters map SDK status shapes into this before any polling decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationJob {
    pub job_id: String,
    pub state: CreationJobState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationJobState {
    InProgress,
    Succeeded { account_id: String },
    Failed { reason: Option<String> },
}

impl CreationJobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Extracts the raw request list from a bulk payload. Each element stays an
/// untyped `Value` so that one malformed request is recovered at request
/// granularity instead of failing the whole run.
pub fn bulk_requests(payload: &Value) -> Result<Vec<Value>, ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError::new("Input payload must be a JSON object"));
    };

    let Some(requests) = object.get(BULK_REQUESTS_KEY) else {
        return Err(ValidationError::new(format!(
            "Missing '{BULK_REQUESTS_KEY}' in input"
        )));
    };

    let Some(items) = requests.as_array() else {
        return Err(ValidationError::new(format!(
            "'{BULK_REQUESTS_KEY}' must be a JSON array"
        )));
    };

    Ok(items.clone())
}
