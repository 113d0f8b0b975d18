//! Snapshot loading and the fixed-width parallel bulk validator.

use account_factory_core::contract::BulkValidationSummary;
use account_factory_core::validate::{OrgSnapshot, SnapshotValidator};
use rayon::prelude::*;
use serde_json::Value;

use crate::adapters::organizations::OrganizationsApi;

/// Fetches the two read-only organizational snapshots (valid OU ids under
/// the configured root, existing account emails) once at startup. A listing
/// failure degrades to an empty snapshot: every OU check then fails and the
/// duplicate-email check passes vacuously.
pub fn load_snapshot(organizations: &dyn OrganizationsApi, org_root_id: &str) -> OrgSnapshot {
    let valid_ous = match organizations.list_organizational_units(org_root_id) {
        Ok(unit_ids) => unit_ids,
        Err(error) => {
            tracing::warn!(%error, "failed to list organizational units; using empty OU set");
            Vec::new()
        }
    };

    let existing_emails = match organizations.list_account_emails() {
        Ok(emails) => emails,
        Err(error) => {
            tracing::warn!(%error, "failed to list account emails; using empty email set");
            Vec::new()
        }
    };

    OrgSnapshot::new(valid_ous, existing_emails)
}

/// Validates every raw request on a bounded worker pool. `par_iter` collects
/// results position-for-position with the input regardless of completion
/// order, and a malformed element only fails its own slot.
pub fn validate_bulk_requests(
    validator: &SnapshotValidator,
    requests: &[Value],
    workers: usize,
) -> Result<BulkValidationSummary, String> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|error| format!("failed to build validation worker pool: {error}"))?;

    let results = pool.install(|| {
        requests
            .par_iter()
            .map(|raw| validator.validate_envelope(raw))
            .collect()
    });

    Ok(BulkValidationSummary::from_results(results))
}
