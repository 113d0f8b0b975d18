//! Per-request account creation: start the asynchronous job, poll it to a
//! terminal state under a bounded backoff policy, then apply the guardrail
//! control and the request's tags.

use std::thread;
use std::time::Duration;

use account_factory_core::contract::{
    AccountRequest, AccountRequestEnvelope, CreationJobState, CreationResult,
};
use serde_json::Value;

use crate::adapters::governance::GovernanceApi;
use crate::adapters::organizations::OrganizationsApi;

/// Bounded polling schedule for creation-job status checks. The interval
/// doubles after every check up to `max_interval`; exhausting `max_attempts`
/// yields a distinct gave-up failure instead of blocking forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub max_attempts: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            max_attempts: 60,
        }
    }
}

impl PollPolicy {
    /// Zero-delay policy for tests and dry runs.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            max_attempts,
        }
    }
}

pub struct AccountCreator<'a> {
    organizations: &'a dyn OrganizationsApi,
    governance: &'a dyn GovernanceApi,
    guardrail_control_id: &'a str,
    poll: PollPolicy,
}

impl<'a> AccountCreator<'a> {
    pub fn new(
        organizations: &'a dyn OrganizationsApi,
        governance: &'a dyn GovernanceApi,
        guardrail_control_id: &'a str,
        poll: PollPolicy,
    ) -> Self {
        Self {
            organizations,
            governance,
            guardrail_control_id,
            poll,
        }
    }

    /// Creates one account from a raw request envelope. Every failure mode,
    /// from a malformed envelope to a provider error at any step, folds into
    /// a `failed` result; nothing escapes to the caller.
    pub fn create_account(&self, raw_request: &Value) -> CreationResult {
        let envelope = match serde_json::from_value::<AccountRequestEnvelope>(raw_request.clone()) {
            Ok(envelope) => envelope,
            Err(error) => {
                return CreationResult::failed(
                    raw_request.clone(),
                    format!("Malformed account request: {error}"),
                );
            }
        };

        match self.run_creation(&envelope.account_request) {
            Ok(account_id) => CreationResult::success(raw_request.clone(), account_id),
            Err(error) => CreationResult::failed(raw_request.clone(), error),
        }
    }

    fn run_creation(&self, request: &AccountRequest) -> Result<String, String> {
        let parameters = &request.control_tower_parameters;
        let mut job = self
            .organizations
            .start_account_creation(&parameters.account_email, &parameters.account_name)?;

        let mut attempts = 0usize;
        let mut interval = self.poll.initial_interval;
        while !job.state.is_terminal() {
            if attempts >= self.poll.max_attempts {
                tracing::warn!(
                    job_id = %job.job_id,
                    attempts,
                    "gave up waiting for account creation job"
                );
                return Err(format!(
                    "Account creation job {} still in progress after {attempts} status checks; gave up waiting",
                    job.job_id
                ));
            }

            thread::sleep(interval);
            interval = (interval * 2).min(self.poll.max_interval);
            attempts += 1;
            job = self.organizations.creation_job_status(&job.job_id)?;
        }

        match job.state {
            CreationJobState::Succeeded { account_id } => {
                self.governance
                    .enable_control(self.guardrail_control_id, &account_id)?;
                self.organizations
                    .tag_account(&account_id, &request.account_tags)?;
                Ok(account_id)
            }
            CreationJobState::Failed { reason } => {
                Err(reason.unwrap_or_else(|| "Unknown error".to_string()))
            }
            CreationJobState::InProgress => {
                Err("Account creation did not reach a terminal state".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Mutex;

    use account_factory_core::contract::{CreationJob, CreationStatus};
    use serde_json::json;

    use super::*;

    struct ScriptedOrganizations {
        initial_job: CreationJob,
        poll_script: Mutex<VecDeque<CreationJob>>,
        status_calls: Mutex<usize>,
        tag_calls: Mutex<Vec<(String, BTreeMap<String, String>)>>,
    }

    impl ScriptedOrganizations {
        fn new(initial_job: CreationJob, poll_script: Vec<CreationJob>) -> Self {
            Self {
                initial_job,
                poll_script: Mutex::new(poll_script.into()),
                status_calls: Mutex::new(0),
                tag_calls: Mutex::new(Vec::new()),
            }
        }

        fn status_calls(&self) -> usize {
            *self.status_calls.lock().expect("poisoned mutex")
        }

        fn tag_calls(&self) -> Vec<(String, BTreeMap<String, String>)> {
            self.tag_calls.lock().expect("poisoned mutex").clone()
        }
    }

    impl OrganizationsApi for ScriptedOrganizations {
        fn start_account_creation(
            &self,
            _email: &str,
            _account_name: &str,
        ) -> Result<CreationJob, String> {
            Ok(self.initial_job.clone())
        }

        fn creation_job_status(&self, job_id: &str) -> Result<CreationJob, String> {
            *self.status_calls.lock().expect("poisoned mutex") += 1;
            let next = self.poll_script.lock().expect("poisoned mutex").pop_front();
            Ok(next.unwrap_or(CreationJob {
                job_id: job_id.to_string(),
                state: CreationJobState::InProgress,
            }))
        }

        fn list_account_emails(&self) -> Result<Vec<String>, String> {
            Ok(Vec::new())
        }

        fn list_organizational_units(&self, _parent_id: &str) -> Result<Vec<String>, String> {
            Ok(Vec::new())
        }

        fn tag_account(
            &self,
            account_id: &str,
            tags: &BTreeMap<String, String>,
        ) -> Result<(), String> {
            self.tag_calls
                .lock()
                .expect("poisoned mutex")
                .push((account_id.to_string(), tags.clone()));
            Ok(())
        }
    }

    struct RecordingGovernance {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingGovernance {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().expect("poisoned mutex").clone()
        }
    }

    impl GovernanceApi for RecordingGovernance {
        fn enable_control(
            &self,
            control_identifier: &str,
            target_identifier: &str,
        ) -> Result<(), String> {
            self.calls
                .lock()
                .expect("poisoned mutex")
                .push((control_identifier.to_string(), target_identifier.to_string()));
            Ok(())
        }
    }

    fn job(job_id: &str, state: CreationJobState) -> CreationJob {
        CreationJob {
            job_id: job_id.to_string(),
            state,
        }
    }

    fn sample_request() -> serde_json::Value {
        json!({
            "account_request": {
                "control_tower_parameters": {
                    "AccountEmail": "fresh@example.com",
                    "AccountName": "workload-prod",
                    "ManagedOrganizationalUnit": "ou-abcd-11111111"
                },
                "custom_fields": {
                    "environment": "prod",
                    "cost_center": "cc-42",
                    "project": "atlas"
                },
                "account_tags": {
                    "Environment": "prod",
                    "CostCenter": "cc-42",
                    "Project": "atlas"
                }
            }
        })
    }

    #[test]
    fn successful_job_enables_guardrail_and_applies_tags_once() {
        let organizations = ScriptedOrganizations::new(
            job("car-1", CreationJobState::InProgress),
            vec![job(
                "car-1",
                CreationJobState::Succeeded {
                    account_id: "123456789012".to_string(),
                },
            )],
        );
        let governance = RecordingGovernance::new();
        let creator = AccountCreator::new(
            &organizations,
            &governance,
            "AWS-GR_EXAMPLE_CONTROL",
            PollPolicy::immediate(5),
        );

        let result = creator.create_account(&sample_request());

        assert_eq!(result.status, CreationStatus::Success);
        assert_eq!(result.account_id.as_deref(), Some("123456789012"));
        assert_eq!(result.error, None);
        assert_eq!(
            governance.calls(),
            vec![(
                "AWS-GR_EXAMPLE_CONTROL".to_string(),
                "123456789012".to_string()
            )]
        );

        let tag_calls = organizations.tag_calls();
        assert_eq!(tag_calls.len(), 1);
        assert_eq!(tag_calls[0].0, "123456789012");
        assert_eq!(tag_calls[0].1.len(), 3);
    }

    #[test]
    fn failed_job_records_provider_reason_without_side_effects() {
        let organizations = ScriptedOrganizations::new(
            job(
                "car-2",
                CreationJobState::Failed {
                    reason: Some("EMAIL_ALREADY_EXISTS".to_string()),
                },
            ),
            Vec::new(),
        );
        let governance = RecordingGovernance::new();
        let creator = AccountCreator::new(
            &organizations,
            &governance,
            "AWS-GR_EXAMPLE_CONTROL",
            PollPolicy::immediate(5),
        );

        let result = creator.create_account(&sample_request());

        assert_eq!(result.status, CreationStatus::Failed);
        assert_eq!(result.account_id, None);
        assert_eq!(result.error.as_deref(), Some("EMAIL_ALREADY_EXISTS"));
        assert!(governance.calls().is_empty());
        assert!(organizations.tag_calls().is_empty());
    }

    #[test]
    fn missing_failure_reason_defaults_to_unknown_error() {
        let organizations = ScriptedOrganizations::new(
            job("car-3", CreationJobState::Failed { reason: None }),
            Vec::new(),
        );
        let governance = RecordingGovernance::new();
        let creator = AccountCreator::new(
            &organizations,
            &governance,
            "AWS-GR_EXAMPLE_CONTROL",
            PollPolicy::immediate(5),
        );

        let result = creator.create_account(&sample_request());
        assert_eq!(result.error.as_deref(), Some("Unknown error"));
    }

    #[test]
    fn polls_until_the_job_turns_terminal() {
        let organizations = ScriptedOrganizations::new(
            job("car-4", CreationJobState::InProgress),
            vec![
                job("car-4", CreationJobState::InProgress),
                job("car-4", CreationJobState::InProgress),
                job(
                    "car-4",
                    CreationJobState::Succeeded {
                        account_id: "210987654321".to_string(),
                    },
                ),
            ],
        );
        let governance = RecordingGovernance::new();
        let creator = AccountCreator::new(
            &organizations,
            &governance,
            "AWS-GR_EXAMPLE_CONTROL",
            PollPolicy::immediate(10),
        );

        let result = creator.create_account(&sample_request());

        assert_eq!(result.status, CreationStatus::Success);
        assert_eq!(organizations.status_calls(), 3);
    }

    #[test]
    fn exhausted_poll_budget_yields_a_gave_up_failure() {
        let organizations =
            ScriptedOrganizations::new(job("car-5", CreationJobState::InProgress), Vec::new());
        let governance = RecordingGovernance::new();
        let creator = AccountCreator::new(
            &organizations,
            &governance,
            "AWS-GR_EXAMPLE_CONTROL",
            PollPolicy::immediate(4),
        );

        let result = creator.create_account(&sample_request());

        assert_eq!(result.status, CreationStatus::Failed);
        let error = result.error.expect("gave-up failure should carry an error");
        assert!(error.contains("gave up waiting"), "unexpected error: {error}");
        assert_eq!(organizations.status_calls(), 4);
        assert!(governance.calls().is_empty());
    }

    #[test]
    fn malformed_envelope_fails_without_remote_calls() {
        let organizations =
            ScriptedOrganizations::new(job("car-6", CreationJobState::InProgress), Vec::new());
        let governance = RecordingGovernance::new();
        let creator = AccountCreator::new(
            &organizations,
            &governance,
            "AWS-GR_EXAMPLE_CONTROL",
            PollPolicy::immediate(5),
        );

        let raw = json!({"unexpected": true});
        let result = creator.create_account(&raw);

        assert_eq!(result.status, CreationStatus::Failed);
        assert!(result
            .error
            .expect("malformed request should carry an error")
            .starts_with("Malformed account request:"));
        assert_eq!(result.request, raw);
        assert_eq!(organizations.status_calls(), 0);
    }
}
