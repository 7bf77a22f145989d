use tenderfuse_core::{MasterRecord, SourceIndex};

use super::{MasterContext, MasterPlugin};
use crate::config::PluginKind;
use crate::error::MasterError;
use crate::stats::mode;

/// Fills the master framework-agreement flag with the flag most source
/// records report. A flag already present on the master is left alone.
pub struct FrameworkAgreementPlugin;

impl MasterPlugin for FrameworkAgreementPlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::FrameworkAgreement
    }

    fn reconcile(
        &self,
        sources: &SourceIndex<'_>,
        mut record: MasterRecord,
        _ctx: &MasterContext<'_>,
    ) -> Result<MasterRecord, MasterError> {
        if record.is_framework_agreement.is_none() {
            record.is_framework_agreement =
                mode(sources.records().iter().filter_map(|r| r.is_framework_agreement));
        }
        Ok(record)
    }
}
