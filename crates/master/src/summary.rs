use crate::model::{MasterSummary, OutcomeStatus, RecordOutcome};

/// Compute summary statistics from per-record outcomes.
pub fn compute_summary(outcomes: &[RecordOutcome]) -> MasterSummary {
    let mut summary = MasterSummary {
        total_records: outcomes.len(),
        ..MasterSummary::default()
    };

    for outcome in outcomes {
        match outcome.status {
            OutcomeStatus::Reconciled => summary.reconciled += 1,
            OutcomeStatus::Failed => summary.failed += 1,
        }

        let Some(ref record) = outcome.record else {
            continue;
        };
        for lot in &record.lots {
            if lot.robust_estimated_price.is_some() {
                summary.lots_priced += 1;
            } else {
                summary.lots_unpriced += 1;
            }

            // Only the first winning bid is reconciled per lot
            if let Some(bid) = lot.bids.iter().find(|b| b.is_winning == Some(true)) {
                if bid.robust_price.is_some() {
                    summary.winning_bids_priced += 1;
                } else {
                    summary.winning_bids_unpriced += 1;
                }
            }
        }
    }

    summary
}
