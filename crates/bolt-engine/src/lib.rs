pub mod config;
pub mod params;
pub mod sequencer;
pub mod types;

use bolt_ops::KernelBundle;
use tracing::instrument;

pub use config::{ConfigError, EngineConfig};
pub use params::BoltParameters;
pub use sequencer::PipelineContext;
pub use types::{BuildError, BuildMode, BuildReport, PipelineState, StageOutcome, StageRecord};

/// Builds hex-head bolts in a host document.
///
/// Holds configuration only; every call creates a fresh component and its
/// own [`PipelineContext`].
#[derive(Debug, Clone, Default)]
pub struct BoltGenerator {
    config: EngineConfig,
}

impl BoltGenerator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the bolt for real.
    #[instrument(skip_all, fields(name = %params.name))]
    pub fn execute(
        &self,
        kb: &mut dyn KernelBundle,
        params: &BoltParameters,
    ) -> Result<BuildReport, BuildError> {
        sequencer::run(kb, params, &self.config, BuildMode::Commit)
    }

    /// Build the bolt for preview. Same pipeline, recorded as a preview.
    #[instrument(skip_all, fields(name = %params.name))]
    pub fn preview(
        &self,
        kb: &mut dyn KernelBundle,
        params: &BoltParameters,
    ) -> Result<BuildReport, BuildError> {
        sequencer::run(kb, params, &self.config, BuildMode::Preview)
    }
}
