//! Creates accounts in bulk from stdin: fixed-size batches on a worker
//! pool, one notification per batch, pacing between batches.

use std::process::ExitCode;

use account_factory_aws::adapters::governance::AwsControlTower;
use account_factory_aws::adapters::notify::SnsNotifier;
use account_factory_aws::adapters::organizations::AwsOrganizations;
use account_factory_aws::batch::BatchProcessor;
use account_factory_aws::bulk::load_snapshot;
use account_factory_aws::config::CreatorConfig;
use account_factory_aws::creator::AccountCreator;
use account_factory_aws::input::read_payload;
use account_factory_aws::logging::init_tracing;
use account_factory_core::contract::bulk_requests;
use account_factory_core::validate::SnapshotValidator;
use aws_config::BehaviorVersion;

fn main() -> ExitCode {
    init_tracing();

    let payload = match read_payload(std::io::stdin().lock()) {
        Ok(payload) => payload,
        Err(message) => {
            println!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let requests = match bulk_requests(&payload) {
        Ok(requests) => requests,
        Err(error) => {
            println!("Error: {}", error.message());
            return ExitCode::FAILURE;
        }
    };

    let config = match CreatorConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            println!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => {
            println!("Error: failed to start async runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let aws_config = runtime.block_on(aws_config::load_defaults(BehaviorVersion::latest()));
    let handle = runtime.handle().clone();
    let organizations = AwsOrganizations::new(
        aws_sdk_organizations::Client::new(&aws_config),
        handle.clone(),
    );
    let governance = AwsControlTower::new(
        aws_sdk_controltower::Client::new(&aws_config),
        handle.clone(),
    );
    let notifier = SnsNotifier::new(
        aws_sdk_sns::Client::new(&aws_config),
        config.topic_arn.clone(),
        handle,
    );

    let creator = AccountCreator::new(
        &organizations,
        &governance,
        &config.guardrail_control_id,
        config.poll,
    );
    let mut processor = BatchProcessor::new(
        creator,
        &notifier,
        config.batch_size,
        config.batch_pacing,
    );

    if config.validate_before_create {
        // CreatorConfig::from_env guarantees the root id when the gate is on.
        let Some(org_root_id) = config.org_root_id.as_deref() else {
            println!("Error: {} must be configured", account_factory_aws::config::ORG_ROOT_VAR);
            return ExitCode::FAILURE;
        };
        let snapshot = load_snapshot(&organizations, org_root_id);
        processor = processor.with_validation_gate(SnapshotValidator::new(snapshot));
    }

    let summary = match processor.process(&requests) {
        Ok(summary) => summary,
        Err(message) => {
            println!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("summary should serialize")
    );

    if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
