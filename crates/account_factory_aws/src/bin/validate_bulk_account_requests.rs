//! Validates a list of account requests from stdin against live
//! organizational state (valid OUs under the configured root, existing
//! account emails) on a bounded worker pool.

use std::process::ExitCode;

use account_factory_aws::adapters::organizations::AwsOrganizations;
use account_factory_aws::bulk::{load_snapshot, validate_bulk_requests};
use account_factory_aws::config::ValidatorConfig;
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

    let config = match ValidatorConfig::from_env() {
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
    let organizations = AwsOrganizations::new(
        aws_sdk_organizations::Client::new(&aws_config),
        runtime.handle().clone(),
    );

    let snapshot = load_snapshot(&organizations, &config.org_root_id);
    let validator = SnapshotValidator::new(snapshot);

    let summary = match validate_bulk_requests(&validator, &requests, config.workers) {
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

    if summary.all_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
