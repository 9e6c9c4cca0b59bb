//! Harness error type and the [`BoltHarness`] builder.

use bolt_command::{
    dispatch, CommandRequest, CommandResponse, CommandSession, InputEntry, InputValue,
    ReportSummary,
};
use bolt_engine::{BoltGenerator, BuildReport, EngineConfig};
use bolt_kernel::{MockKernel, MockOp};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("dispatch error: {message}")]
    DispatchError { message: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("input error: {0}")]
    Input(String),

    #[error("engine error: {0}")]
    Engine(String),
}

// ── BoltHarness ─────────────────────────────────────────────────────────────

/// Fluent builder around a [`CommandSession`] and a [`MockKernel`].
///
/// Inputs are given by dialog id; anything not set keeps its default.
pub struct BoltHarness {
    session: CommandSession,
    kernel: MockKernel,
    inputs: Vec<InputEntry>,
}

impl BoltHarness {
    /// Harness over a fresh mock kernel with the default configuration.
    pub fn mock() -> Self {
        Self::with_kernel(MockKernel::new())
    }

    pub fn with_kernel(kernel: MockKernel) -> Self {
        Self {
            session: CommandSession::default(),
            kernel,
            inputs: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.session = CommandSession::new(config);
        self
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    pub fn name(mut self, name: &str) -> Self {
        self.push("boltName", InputValue::Text { value: name.into() });
        self
    }

    /// Set a length field, in centimetres.
    pub fn length(mut self, id: &str, value: f64) -> Self {
        self.push(id, InputValue::Length { value });
        self
    }

    /// Set the cut angle, given in degrees.
    pub fn cut_angle_deg(mut self, degrees: f64) -> Self {
        self.push(
            "cutAngle",
            InputValue::Angle {
                value: degrees.to_radians(),
            },
        );
        self
    }

    /// Make the next call of `op` on the kernel fail.
    pub fn fail_next(mut self, op: MockOp, reason: &str) -> Self {
        self.kernel.fail_next(op, reason);
        self
    }

    fn push(&mut self, id: &str, value: InputValue) {
        self.inputs.retain(|e| e.id != id);
        self.inputs.push(InputEntry::new(id, value));
    }

    pub fn inputs(&self) -> &[InputEntry] {
        &self.inputs
    }

    // ── Runs ────────────────────────────────────────────────────────────

    /// Send an `Execute` request through dispatch.
    pub fn execute(&mut self) -> Result<ReportSummary, HarnessError> {
        let request = CommandRequest::Execute {
            inputs: self.inputs.clone(),
        };
        match dispatch(&mut self.session, request, &mut self.kernel) {
            CommandResponse::BoltCreated { summary } => Ok(summary),
            other => Err(unexpected("BoltCreated", other)),
        }
    }

    /// Send a `Preview` request through dispatch.
    pub fn preview(&mut self) -> Result<ReportSummary, HarnessError> {
        let request = CommandRequest::Preview {
            inputs: self.inputs.clone(),
        };
        match dispatch(&mut self.session, request, &mut self.kernel) {
            CommandResponse::PreviewReady { summary } => Ok(summary),
            other => Err(unexpected("PreviewReady", other)),
        }
    }

    /// Send an `Execute` request that is expected to fail; returns the message.
    pub fn execute_expecting_failure(&mut self) -> Result<String, HarnessError> {
        let request = CommandRequest::Execute {
            inputs: self.inputs.clone(),
        };
        match dispatch(&mut self.session, request, &mut self.kernel) {
            CommandResponse::Failed { message } => Ok(message),
            other => Err(unexpected("Failed", other)),
        }
    }

    /// Run the generator directly, keeping the host handles for topology checks.
    pub fn build(&mut self) -> Result<BuildReport, HarnessError> {
        let params = bolt_command::parameters_from_inputs(&self.inputs)
            .map_err(|e| HarnessError::Input(e.to_string()))?;
        let generator: &BoltGenerator = self.session.generator();
        generator
            .execute(&mut self.kernel, &params)
            .map_err(|e| HarnessError::Engine(e.to_string()))
    }

    pub fn kernel(&self) -> &MockKernel {
        &self.kernel
    }

    pub fn session(&self) -> &CommandSession {
        &self.session
    }
}

fn unexpected(expected: &str, got: CommandResponse) -> HarnessError {
    let message = match got {
        CommandResponse::Failed { message } => message,
        other => format!("{:?}", other),
    };
    HarnessError::DispatchError {
        message: format!("expected {}, got: {}", expected, message),
    }
}
