//! Batch processor: chunk creation requests, fan each chunk out on a worker
//! pool, publish one notification per batch, and pace between batches to
//! respect provider rate limits.

use std::thread;
use std::time::Duration;

use account_factory_core::batching::compute_batch_plan;
use account_factory_core::contract::{BulkCreationSummary, CreationResult};
use account_factory_core::validate::SnapshotValidator;
use rayon::prelude::*;
use serde_json::{json, Value};

use crate::adapters::notify::Notifier;
use crate::creator::AccountCreator;

pub const DEFAULT_BATCH_PACING: Duration = Duration::from_secs(30);

pub struct BatchProcessor<'a> {
    creator: AccountCreator<'a>,
    notifier: &'a dyn Notifier,
    batch_size: usize,
    batch_pacing: Duration,
    validation_gate: Option<SnapshotValidator>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        creator: AccountCreator<'a>,
        notifier: &'a dyn Notifier,
        batch_size: usize,
        batch_pacing: Duration,
    ) -> Self {
        Self {
            creator,
            notifier,
            batch_size,
            batch_pacing,
            validation_gate: None,
        }
    }

    /// Requests failing snapshot validation become `failed` results without
    /// any remote creation call.
    pub fn with_validation_gate(mut self, validator: SnapshotValidator) -> Self {
        self.validation_gate = Some(validator);
        self
    }

    /// Processes every request and returns the cumulative summary. Results
    /// keep input order; accounts created in earlier batches are never
    /// rolled back when a later batch fails.
    pub fn process(&self, requests: &[Value]) -> Result<BulkCreationSummary, String> {
        let plan = compute_batch_plan(requests.len(), self.batch_size)
            .map_err(|error| error.message().to_string())?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.batch_size.max(1))
            .build()
            .map_err(|error| format!("failed to build creation worker pool: {error}"))?;

        let total_batches = plan.len();
        let mut results = Vec::with_capacity(requests.len());
        for assignment in plan {
            if assignment.batch_id > 0 {
                thread::sleep(self.batch_pacing);
            }

            tracing::info!(
                batch = assignment.batch_id + 1,
                total_batches,
                size = assignment.len(),
                "dispatching creation batch"
            );

            let chunk = &requests[assignment.start_index..assignment.end_index_exclusive];
            let batch_results: Vec<CreationResult> =
                pool.install(|| chunk.par_iter().map(|raw| self.create_one(raw)).collect());

            self.publish_batch_notification(&batch_results);
            results.extend(batch_results);
        }

        Ok(BulkCreationSummary::from_results(results))
    }

    fn create_one(&self, raw_request: &Value) -> CreationResult {
        if let Some(validator) = &self.validation_gate {
            let validation = validator.validate_envelope(raw_request);
            if !validation.valid {
                return CreationResult::failed(
                    raw_request.clone(),
                    format!("Request failed validation: {}", validation.errors.join("; ")),
                );
            }
        }

        self.creator.create_account(raw_request)
    }

    fn publish_batch_notification(&self, batch_results: &[CreationResult]) {
        let success_count = batch_results.iter().filter(|r| r.succeeded()).count();
        let message = json!({
            "batch_results": batch_results,
            "summary": {
                "total": batch_results.len(),
                "success": success_count,
                "failed": batch_results.len() - success_count,
            }
        });
        let subject = format!(
            "Batch Account Creation Results: {success_count}/{} Success",
            batch_results.len()
        );

        // A failed publish must not take the batch down with it.
        if let Err(error) = self.notifier.publish(&subject, &message.to_string()) {
            tracing::warn!(%error, "failed to publish batch notification");
        }
    }
}
