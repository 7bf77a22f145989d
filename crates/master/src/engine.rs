use rayon::prelude::*;

use crate::config::MasterConfig;
use crate::error::MasterError;
use crate::model::{
    MasterGroup, MasterInput, MasterMeta, MasterResult, OutcomeStatus, RecordOutcome,
};
use crate::plugin::{MasterContext, MasterPipeline};
use crate::summary::compute_summary;

/// Parse a batch document: `{ "groups": [ { "source_records": [...], "master": {...} } ] }`.
pub fn load_input_json(input: &str) -> Result<MasterInput, MasterError> {
    serde_json::from_str(input).map_err(|e| MasterError::InputParse(e.to_string()))
}

/// Run the configured pipeline over every group of the batch.
///
/// Groups are reconciled in parallel; outcomes keep input order. A group that
/// fails is reported in its outcome and does not affect the others.
pub fn run(config: &MasterConfig, input: MasterInput) -> Result<MasterResult, MasterError> {
    config.validate()?;

    let pipeline = MasterPipeline::from_config(&config.pipeline);
    let ctx = MasterContext { config };
    log::info!(
        "master run '{}': {} group(s), plugins {:?}",
        config.name,
        input.groups.len(),
        pipeline.kinds()
    );

    let records: Vec<RecordOutcome> = input
        .groups
        .into_par_iter()
        .map(|group| reconcile_group(&pipeline, &ctx, group))
        .collect();

    let summary = compute_summary(&records);
    log::info!(
        "master run '{}': {} reconciled, {} failed",
        config.name,
        summary.reconciled,
        summary.failed
    );

    Ok(MasterResult {
        meta: MasterMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            plugins: pipeline.kinds(),
        },
        summary,
        records,
    })
}

/// Run the pipeline over a single group.
pub fn reconcile_group(
    pipeline: &MasterPipeline,
    ctx: &MasterContext<'_>,
    group: MasterGroup,
) -> RecordOutcome {
    let record_id = group.master.display_id().to_string();
    match pipeline.run(&group.source_records, group.master, ctx) {
        Ok(record) => RecordOutcome {
            record_id,
            status: OutcomeStatus::Reconciled,
            record: Some(record),
            error: None,
        },
        Err(e) => {
            log::warn!("master record '{record_id}' rejected: {e}");
            RecordOutcome {
                record_id,
                status: OutcomeStatus::Failed,
                record: None,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_malformed_json() {
        let err = load_input_json("{\"groups\": [").unwrap_err();
        assert!(matches!(err, MasterError::InputParse(_)));
    }

    #[test]
    fn load_empty_document() {
        let input = load_input_json("{}").unwrap();
        assert!(input.groups.is_empty());
    }

    #[test]
    fn run_rejects_invalid_config() {
        let mut config = MasterConfig::default();
        config.pipeline.plugins.clear();
        let err = run(&config, MasterInput::default()).unwrap_err();
        assert!(matches!(err, MasterError::ConfigValidation(_)));
    }

    #[test]
    fn run_empty_batch() {
        let result = run(&MasterConfig::default(), MasterInput::default()).unwrap();
        assert_eq!(result.summary.total_records, 0);
        assert_eq!(result.meta.config_name, "default");
        assert_eq!(result.meta.plugins.len(), 2);
    }
}
