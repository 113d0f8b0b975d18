//! Validates a single account request from stdin: structure and field
//! formats only, no live organizational lookups.

use std::process::ExitCode;

use account_factory_aws::input::read_payload;
use account_factory_aws::logging::init_tracing;
use account_factory_core::validate::validate_envelope_offline;

fn main() -> ExitCode {
    init_tracing();

    let payload = match read_payload(std::io::stdin().lock()) {
        Ok(payload) => payload,
        Err(message) => {
            println!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let result = validate_envelope_offline(&payload);
    for error in &result.errors {
        println!("Error: {error}");
    }

    if result.valid {
        println!("Account request is valid");
        ExitCode::SUCCESS
    } else {
        println!("Account request is invalid");
        ExitCode::FAILURE
    }
}
