//! `tenderfuse-master` — master-record field reconciliation engine.
//!
//! Pure engine crate: receives source records grouped per entity together
//! with a master skeleton, returns the master records with reconciled fields.
//! No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod groups;
pub mod model;
pub mod plugin;
pub mod robust;
pub mod stats;
pub mod summary;

pub use config::{MasterConfig, PriceConfig};
pub use engine::{load_input_json, run};
pub use error::MasterError;
pub use model::{MasterGroup, MasterInput, MasterResult, OutcomeStatus, RecordOutcome};
pub use plugin::{MasterContext, MasterPipeline, MasterPlugin};
