use bolt_engine::{BuildMode, BuildReport, StageRecord};
use bolt_types::ThreadSpec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inputs::InputValue;

/// One evaluated dialog field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEntry {
    pub id: String,
    pub value: InputValue,
}

impl InputEntry {
    pub fn new(id: impl Into<String>, value: InputValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Requests from the host's command dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandRequest {
    /// The user confirmed the dialog.
    Execute { inputs: Vec<InputEntry> },
    /// The dialog asks for a live preview.
    Preview { inputs: Vec<InputEntry> },
}

/// Serializable view of a [`BuildReport`], without host handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub invocation_id: Uuid,
    pub mode: BuildMode,
    pub body_name: String,
    pub stages: Vec<StageRecord>,
    pub thread: Option<ThreadSpec>,
    pub warnings: Vec<String>,
    pub kernel_time_ms: f64,
}

impl From<&BuildReport> for ReportSummary {
    fn from(report: &BuildReport) -> Self {
        Self {
            invocation_id: report.invocation_id,
            mode: report.mode,
            body_name: report.body_name.clone(),
            stages: report.stages.clone(),
            thread: report.thread.clone(),
            warnings: report.warnings.clone(),
            kernel_time_ms: report.total_kernel_time_ms(),
        }
    }
}

/// Responses sent back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandResponse {
    BoltCreated { summary: ReportSummary },
    PreviewReady { summary: ReportSummary },
    /// Any failure, as one message for the host to show.
    Failed { message: String },
}
