use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the account-factory workspace",
    long_about = "A unified CLI for running CI checks and generating sample\n\
                  payloads for the account-factory tooling."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Print a sample bulk payload for piping into the tools
    SamplePayload {
        /// Number of account requests to generate
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test account_factory_core");
    run_cargo(&["test", "-p", "account_factory_core"]);

    step("Test account_factory_aws");
    run_cargo(&["test", "-p", "account_factory_aws"]);
}

fn sample_payload(count: usize) {
    let requests: Vec<serde_json::Value> = (0..count)
        .map(|index| {
            json!({
                "account_request": {
                    "control_tower_parameters": {
                        "AccountEmail": format!("workload{index}@example.com"),
                        "AccountName": format!("workload-{index:03}"),
                        "ManagedOrganizationalUnit": "ou-abcd-11111111"
                    },
                    "custom_fields": {
                        "environment": "sandbox",
                        "cost_center": "cc-0000",
                        "project": "account-factory"
                    },
                    "account_tags": {
                        "Environment": "sandbox",
                        "CostCenter": "cc-0000",
                        "Project": "account-factory"
                    }
                }
            })
        })
        .collect();

    let payload = json!({ "bulk_account_requests": requests });
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).expect("payload should serialize")
    );
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
        },
        Commands::SamplePayload { count } => sample_payload(count),
    }
}
