//! Contiguous batch planning for bulk account creation.

use crate::contract::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAssignment {
    pub batch_id: usize,
    pub start_index: usize,
    pub end_index_exclusive: usize,
}

impl BatchAssignment {
    pub fn len(&self) -> usize {
        self.end_index_exclusive - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index_exclusive
    }
}

/// Splits `total_requests` into contiguous chunks of at most `batch_size`.
/// The final batch carries the remainder.
pub fn compute_batch_plan(
    total_requests: usize,
    batch_size: usize,
) -> Result<Vec<BatchAssignment>, ValidationError> {
    if batch_size == 0 {
        return Err(ValidationError::new(
            "batch_size must be a positive integer",
        ));
    }

    let batch_count = total_requests.div_ceil(batch_size);
    let mut assignments = Vec::with_capacity(batch_count);
    let mut cursor = 0usize;

    for batch_id in 0..batch_count {
        let start_index = cursor;
        let end_index_exclusive = (cursor + batch_size).min(total_requests);
        assignments.push(BatchAssignment {
            batch_id,
            start_index,
            end_index_exclusive,
        });
        cursor = end_index_exclusive;
    }

    validate_assignments(total_requests, &assignments)?;
    Ok(assignments)
}

fn validate_assignments(
    total_requests: usize,
    assignments: &[BatchAssignment],
) -> Result<(), ValidationError> {
    if total_requests == 0 {
        return if assignments.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new("No batches expected for empty input"))
        };
    }

    if assignments.is_empty()
        || assignments[0].start_index != 0
        || assignments[assignments.len() - 1].end_index_exclusive != total_requests
    {
        return Err(ValidationError::new(
            "Batch boundaries do not cover the full request list",
        ));
    }

    for idx in 1..assignments.len() {
        if assignments[idx - 1].end_index_exclusive != assignments[idx].start_index {
            return Err(ValidationError::new(
                "Batch boundaries overlap or leave gaps",
            ));
        }
    }

    Ok(())
}
