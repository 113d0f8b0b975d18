//! Request validation against live organizational snapshots, plus the
//! offline structure/format path used by the single-request tool.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::contract::{
    AccountRequest, AccountRequestEnvelope, ValidationResult, ACCOUNT_REQUEST_KEY,
};
use crate::fields::{
    has_required_account_tags, has_required_custom_fields, is_valid_account_name, is_valid_email,
    is_valid_ou_path,
};

/// Read-only organizational state captured once at startup and shared across
/// all validation workers. Never refreshed mid-run, so concurrent account
/// creation elsewhere can race it; callers accept that staleness window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgSnapshot {
    pub valid_ous: BTreeSet<String>,
    pub existing_emails: BTreeSet<String>,
}

impl OrgSnapshot {
    pub fn new(
        valid_ous: impl IntoIterator<Item = String>,
        existing_emails: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            valid_ous: valid_ous.into_iter().collect(),
            existing_emails: existing_emails.into_iter().collect(),
        }
    }
}

/// Validates one request against an [`OrgSnapshot`]. Pure function of the
/// snapshot and the input; safe to share across workers.
#[derive(Debug, Clone)]
pub struct SnapshotValidator {
    snapshot: OrgSnapshot,
}

impl SnapshotValidator {
    pub fn new(snapshot: OrgSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &OrgSnapshot {
        &self.snapshot
    }

    /// Validates a raw request envelope. A structural failure (missing
    /// `account_request`, wrong nesting types) is folded into a single
    /// generic error instead of propagating.
    pub fn validate_envelope(&self, raw: &Value) -> ValidationResult {
        match serde_json::from_value::<AccountRequestEnvelope>(raw.clone()) {
            Ok(envelope) => self.validate_request(&envelope.account_request),
            Err(error) => {
                ValidationResult::invalid(vec![format!("Error during validation: {error}")])
            }
        }
    }

    pub fn validate_request(&self, request: &AccountRequest) -> ValidationResult {
        let parameters = &request.control_tower_parameters;
        let mut errors = Vec::new();

        if !is_valid_email(&parameters.account_email)
            || self
                .snapshot
                .existing_emails
                .contains(&parameters.account_email)
        {
            errors.push("Invalid or duplicate AccountEmail".to_string());
        }

        if !is_valid_account_name(&parameters.account_name) {
            errors.push("Invalid AccountName format".to_string());
        }

        if !self
            .snapshot
            .valid_ous
            .contains(&parameters.managed_organizational_unit)
        {
            errors.push("Invalid ManagedOrganizationalUnit".to_string());
        }

        if !has_required_custom_fields(&request.custom_fields) {
            errors.push("Missing required custom fields".to_string());
        }

        if !has_required_account_tags(&request.account_tags) {
            errors.push("Missing required account tags".to_string());
        }

        if errors.is_empty() {
            ValidationResult::ok()
        } else {
            ValidationResult::invalid(errors)
        }
    }
}

/// Structure and format checks only, for environments without live
/// organizational state. The OU is checked against the path pattern rather
/// than a snapshot.
pub fn validate_envelope_offline(raw: &Value) -> ValidationResult {
    let Some(envelope) = raw.as_object() else {
        return ValidationResult::invalid(vec!["Request must be a JSON object".to_string()]);
    };

    let Some(raw_request) = envelope.get(ACCOUNT_REQUEST_KEY) else {
        return ValidationResult::invalid(vec![format!(
            "Missing '{ACCOUNT_REQUEST_KEY}' in request"
        )]);
    };

    let has_parameters = matches!(
        raw_request.as_object(),
        Some(fields) if fields.contains_key("control_tower_parameters")
    );
    if !has_parameters {
        return ValidationResult::invalid(vec![
            "Missing 'control_tower_parameters' in account request".to_string(),
        ]);
    }

    let request = match serde_json::from_value::<AccountRequest>(raw_request.clone()) {
        Ok(request) => request,
        Err(error) => {
            return ValidationResult::invalid(vec![format!("Error during validation: {error}")]);
        }
    };

    let parameters = &request.control_tower_parameters;
    let mut errors = Vec::new();

    if !is_valid_email(&parameters.account_email) {
        errors.push("Invalid AccountEmail format".to_string());
    }

    if !is_valid_account_name(&parameters.account_name) {
        errors.push("Invalid AccountName format".to_string());
    }

    if !is_valid_ou_path(&parameters.managed_organizational_unit) {
        errors.push("Invalid ManagedOrganizationalUnit format".to_string());
    }

    if !has_required_custom_fields(&request.custom_fields) {
        errors.push("Missing required custom fields".to_string());
    }

    if !has_required_account_tags(&request.account_tags) {
        errors.push("Missing required account tags".to_string());
    }

    if errors.is_empty() {
        ValidationResult::ok()
    } else {
        ValidationResult::invalid(errors)
    }
}
