//! Governance-control adapter: enabling a named guardrail on an account.

use tokio::runtime::Handle;

pub trait GovernanceApi: Send + Sync {
    fn enable_control(
        &self,
        control_identifier: &str,
        target_identifier: &str,
    ) -> Result<(), String>;
}

pub struct AwsControlTower {
    client: aws_sdk_controltower::Client,
    handle: Handle,
}

impl AwsControlTower {
    pub fn new(client: aws_sdk_controltower::Client, handle: Handle) -> Self {
        Self { client, handle }
    }
}

impl GovernanceApi for AwsControlTower {
    fn enable_control(
        &self,
        control_identifier: &str,
        target_identifier: &str,
    ) -> Result<(), String> {
        self.handle.block_on(async {
            self.client
                .enable_control()
                .control_identifier(control_identifier)
                .target_identifier(target_identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    format!("failed to enable control on {target_identifier}: {error}")
                })
        })
    }
}
