//! Organization-management adapter: account creation, job status, paginated
//! listings, and resource tagging.

use std::collections::BTreeMap;

use account_factory_core::contract::{CreationJob, CreationJobState};
use aws_sdk_organizations::types::{
    CreateAccountState, CreateAccountStatus, IamUserAccessToBilling, Tag,
};
use tokio::runtime::Handle;

pub const ORGANIZATION_ACCESS_ROLE: &str = "OrganizationAccountAccessRole";

pub trait OrganizationsApi: Send + Sync {
    fn start_account_creation(
        &self,
        email: &str,
        account_name: &str,
    ) -> Result<CreationJob, String>;

    fn creation_job_status(&self, job_id: &str) -> Result<CreationJob, String>;

    fn list_account_emails(&self) -> Result<Vec<String>, String>;

    fn list_organizational_units(&self, parent_id: &str) -> Result<Vec<String>, String>;

    fn tag_account(
        &self,
        account_id: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), String>;
}

/// AWS Organizations implementation. Holds a handle to the process runtime
/// and bridges the SDK's async surface behind the sync trait; worker-pool
/// threads are never tokio workers, so `block_on` is safe here.
pub struct AwsOrganizations {
    client: aws_sdk_organizations::Client,
    handle: Handle,
}

impl AwsOrganizations {
    pub fn new(client: aws_sdk_organizations::Client, handle: Handle) -> Self {
        Self { client, handle }
    }
}

impl OrganizationsApi for AwsOrganizations {
    fn start_account_creation(
        &self,
        email: &str,
        account_name: &str,
    ) -> Result<CreationJob, String> {
        self.handle.block_on(async {
            let response = self
                .client
                .create_account()
                .email(email)
                .account_name(account_name)
                .role_name(ORGANIZATION_ACCESS_ROLE)
                .iam_user_access_to_billing(IamUserAccessToBilling::Allow)
                .send()
                .await
                .map_err(|error| format!("failed to start account creation: {error}"))?;

            let status = response
                .create_account_status()
                .ok_or_else(|| "create_account response carried no status".to_string())?;
            creation_job_from_status(status)
        })
    }

    fn creation_job_status(&self, job_id: &str) -> Result<CreationJob, String> {
        self.handle.block_on(async {
            let response = self
                .client
                .describe_create_account_status()
                .create_account_request_id(job_id)
                .send()
                .await
                .map_err(|error| format!("failed to describe creation status: {error}"))?;

            let status = response
                .create_account_status()
                .ok_or_else(|| "describe_create_account_status carried no status".to_string())?;
            creation_job_from_status(status)
        })
    }

    fn list_account_emails(&self) -> Result<Vec<String>, String> {
        self.handle.block_on(async {
            let mut emails = Vec::new();
            let mut pages = self.client.list_accounts().into_paginator().send();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|error| format!("failed to list accounts: {error}"))?;
                emails.extend(
                    page.accounts()
                        .iter()
                        .filter_map(|account| account.email().map(str::to_string)),
                );
            }
            Ok(emails)
        })
    }

    fn list_organizational_units(&self, parent_id: &str) -> Result<Vec<String>, String> {
        self.handle.block_on(async {
            let mut unit_ids = Vec::new();
            let mut pages = self
                .client
                .list_organizational_units_for_parent()
                .parent_id(parent_id)
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page
                    .map_err(|error| format!("failed to list organizational units: {error}"))?;
                unit_ids.extend(
                    page.organizational_units()
                        .iter()
                        .filter_map(|unit| unit.id().map(str::to_string)),
                );
            }
            Ok(unit_ids)
        })
    }

    fn tag_account(
        &self,
        account_id: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), String> {
        self.handle.block_on(async {
            let mut sdk_tags = Vec::with_capacity(tags.len());
            for (key, value) in tags {
                let tag = Tag::builder()
                    .key(key)
                    .value(value)
                    .build()
                    .map_err(|error| format!("invalid tag '{key}': {error}"))?;
                sdk_tags.push(tag);
            }

            self.client
                .tag_resource()
                .resource_id(account_id)
                .set_tags(Some(sdk_tags))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to tag account {account_id}: {error}"))
        })
    }
}

fn creation_job_from_status(status: &CreateAccountStatus) -> Result<CreationJob, String> {
    let job_id = status
        .id()
        .ok_or_else(|| "creation status carried no request id".to_string())?
        .to_string();

    let state = match status.state() {
        Some(CreateAccountState::InProgress) => CreationJobState::InProgress,
        Some(CreateAccountState::Succeeded) => match status.account_id() {
            Some(account_id) => CreationJobState::Succeeded {
                account_id: account_id.to_string(),
            },
            None => CreationJobState::Failed {
                reason: Some("creation succeeded but no account id was returned".to_string()),
            },
        },
        _ => CreationJobState::Failed {
            reason: status
                .failure_reason()
                .map(|reason| reason.as_str().to_string()),
        },
    };

    Ok(CreationJob { job_id, state })
}
