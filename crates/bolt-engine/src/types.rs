use std::fmt;

use bolt_kernel::{ComponentHandle, KernelSolidHandle};
use bolt_ops::{OpError, SelectError};
use bolt_types::ThreadSpec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineState {
    HeadSketch,
    HeadExtrude,
    BodySketch,
    BodyExtrudeJoin,
    Chamfer,
    Fillet,
    TipCutSketch,
    TipCutNear,
    TipCutFar,
    Thread,
    Done,
}

impl PipelineState {
    /// Every working state, excluding `Done`.
    pub const SEQUENCE: [PipelineState; 10] = [
        PipelineState::HeadSketch,
        PipelineState::HeadExtrude,
        PipelineState::BodySketch,
        PipelineState::BodyExtrudeJoin,
        PipelineState::Chamfer,
        PipelineState::Fillet,
        PipelineState::TipCutSketch,
        PipelineState::TipCutNear,
        PipelineState::TipCutFar,
        PipelineState::Thread,
    ];

    /// The state that follows this one. `Done` is terminal.
    pub fn next(self) -> PipelineState {
        match self {
            PipelineState::HeadSketch => PipelineState::HeadExtrude,
            PipelineState::HeadExtrude => PipelineState::BodySketch,
            PipelineState::BodySketch => PipelineState::BodyExtrudeJoin,
            PipelineState::BodyExtrudeJoin => PipelineState::Chamfer,
            PipelineState::Chamfer => PipelineState::Fillet,
            PipelineState::Fillet => PipelineState::TipCutSketch,
            PipelineState::TipCutSketch => PipelineState::TipCutNear,
            PipelineState::TipCutNear => PipelineState::TipCutFar,
            PipelineState::TipCutFar => PipelineState::Thread,
            PipelineState::Thread | PipelineState::Done => PipelineState::Done,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Whether a run is a preview or the final commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildMode {
    Preview,
    Commit,
}

/// What happened in one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StageOutcome {
    Completed,
    Skipped { reason: String },
}

/// Record of one executed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub state: PipelineState,
    pub outcome: StageOutcome,
    /// Time spent in kernel calls during this state, in milliseconds.
    pub kernel_time_ms: f64,
    /// Faces the state's body operation added to the bolt.
    pub faces_created: usize,
    /// Faces the state's body operation consumed.
    pub faces_deleted: usize,
}

/// Summary of a finished pipeline run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub invocation_id: Uuid,
    pub mode: BuildMode,
    /// Component holding the bolt. Runtime-only.
    pub component: ComponentHandle,
    /// The bolt body. Runtime-only.
    pub body: KernelSolidHandle,
    pub body_name: String,
    /// One record per working state, in order.
    pub stages: Vec<StageRecord>,
    /// The thread applied to the shank, if any.
    pub thread: Option<ThreadSpec>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn stage(&self, state: PipelineState) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.state == state)
    }

    pub fn skipped_states(&self) -> Vec<PipelineState> {
        self.stages
            .iter()
            .filter(|s| matches!(s.outcome, StageOutcome::Skipped { .. }))
            .map(|s| s.state)
            .collect()
    }

    pub fn total_kernel_time_ms(&self) -> f64 {
        self.stages.iter().map(|s| s.kernel_time_ms).sum()
    }
}

/// Errors that abort bolt construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("parameter {field} out of range: {reason}")]
    ParameterOutOfRange { field: String, reason: String },

    #[error("host failed to create geometry at {state}: {reason}")]
    HostCreationFailure { state: PipelineState, reason: String },

    #[error("topology mismatch at {state} ({rule}): {detail}")]
    TopologyMismatch {
        state: PipelineState,
        rule: String,
        detail: String,
    },

    #[error("host rejected the feature at {state}: {reason}")]
    FeatureRejected { state: PipelineState, reason: String },
}

impl BuildError {
    /// The state the pipeline aborted at; `None` for validation failures.
    pub fn state(&self) -> Option<PipelineState> {
        match self {
            BuildError::ParameterOutOfRange { .. } => None,
            BuildError::HostCreationFailure { state, .. }
            | BuildError::TopologyMismatch { state, .. }
            | BuildError::FeatureRejected { state, .. } => Some(*state),
        }
    }

    /// Classify an operation failure at `state`.
    pub fn from_op(state: PipelineState, err: OpError) -> Self {
        match err {
            OpError::Kernel(e) if e.is_rejection() => BuildError::FeatureRejected {
                state,
                reason: e.to_string(),
            },
            OpError::Kernel(e) => BuildError::HostCreationFailure {
                state,
                reason: e.to_string(),
            },
            OpError::NoProfiles => BuildError::HostCreationFailure {
                state,
                reason: "sketch produced no closed profiles".to_string(),
            },
            OpError::InvalidParameter { reason } => BuildError::FeatureRejected { state, reason },
        }
    }

    pub fn from_select(state: PipelineState, err: SelectError) -> Self {
        let SelectError::TopologyMismatch { rule, detail } = err;
        BuildError::TopologyMismatch {
            state,
            rule: rule.to_string(),
            detail,
        }
    }
}
