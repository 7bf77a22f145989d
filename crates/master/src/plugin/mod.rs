//! Master plugin pipeline.
//!
//! Each plugin owns one concern of the master record. The pipeline hands the
//! record from plugin to plugin by value; a plugin error aborts the record.

mod framework_agreement;
mod robust_price;

pub use framework_agreement::FrameworkAgreementPlugin;
pub use robust_price::RobustPricePlugin;

use tenderfuse_core::{MasterRecord, SourceIndex, SourceRecord};

use crate::config::{MasterConfig, PipelineConfig, PluginKind};
use crate::error::MasterError;

/// Read-only state shared by all plugins of one run.
#[derive(Debug, Clone, Copy)]
pub struct MasterContext<'a> {
    pub config: &'a MasterConfig,
}

pub trait MasterPlugin: Send + Sync {
    fn kind(&self) -> PluginKind;

    /// Reconcile this plugin's fields of `record` from `sources`.
    fn reconcile(
        &self,
        sources: &SourceIndex<'_>,
        record: MasterRecord,
        ctx: &MasterContext<'_>,
    ) -> Result<MasterRecord, MasterError>;
}

impl PluginKind {
    pub fn build(self) -> Box<dyn MasterPlugin> {
        match self {
            Self::FrameworkAgreement => Box::new(FrameworkAgreementPlugin),
            Self::RobustPrice => Box::new(RobustPricePlugin),
        }
    }
}

/// Fixed, ordered composition of plugins.
pub struct MasterPipeline {
    plugins: Vec<Box<dyn MasterPlugin>>,
}

impl MasterPipeline {
    pub fn new(plugins: Vec<Box<dyn MasterPlugin>>) -> Self {
        Self { plugins }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.plugins.iter().map(|kind| kind.build()).collect())
    }

    pub fn kinds(&self) -> Vec<PluginKind> {
        self.plugins.iter().map(|p| p.kind()).collect()
    }

    /// Run every plugin in order over `record`.
    pub fn run(
        &self,
        sources: &[SourceRecord],
        record: MasterRecord,
        ctx: &MasterContext<'_>,
    ) -> Result<MasterRecord, MasterError> {
        let index = SourceIndex::new(sources);
        self.plugins
            .iter()
            .try_fold(record, |record, plugin| plugin.reconcile(&index, record, ctx))
    }
}
