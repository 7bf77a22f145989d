use serde::{Deserialize, Serialize};
use tenderfuse_core::{MasterRecord, SourceRecord};

use crate::config::PluginKind;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Source records already resolved to one real-world entity, plus the master
/// skeleton whose lots/bids carry structured references into them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterGroup {
    #[serde(default)]
    pub source_records: Vec<SourceRecord>,
    pub master: MasterRecord,
}

/// A batch of entity groups.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MasterInput {
    #[serde(default)]
    pub groups: Vec<MasterGroup>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Reconciled,
    Failed,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reconciled => write!(f, "reconciled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of running the pipeline over one group. A failed record carries
/// the error and no record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub record_id: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MasterRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterSummary {
    pub total_records: usize,
    pub reconciled: usize,
    pub failed: usize,
    pub lots_priced: usize,
    pub lots_unpriced: usize,
    pub winning_bids_priced: usize,
    pub winning_bids_unpriced: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasterMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub plugins: Vec<PluginKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasterResult {
    pub meta: MasterMeta,
    pub summary: MasterSummary,
    pub records: Vec<RecordOutcome>,
}
