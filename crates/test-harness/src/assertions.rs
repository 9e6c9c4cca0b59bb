//! Assertion helpers with diagnostic output.
//!
//! Every failure names the calling context and the expected vs actual value.

use bolt_command::ReportSummary;
use bolt_engine::{PipelineState, StageOutcome};
use bolt_kernel::{KernelIntrospect, KernelSolidHandle, MockKernel, SurfaceType, TopoKind};

use crate::helpers::HarnessError;

fn fail(ctx: &str, detail: String) -> HarnessError {
    HarnessError::AssertionFailed {
        detail: format!("[{}] {}", ctx, detail),
    }
}

/// Assert every state ran to completion.
pub fn assert_all_completed(summary: &ReportSummary, ctx: &str) -> Result<(), HarnessError> {
    let skipped: Vec<String> = summary
        .stages
        .iter()
        .filter_map(|s| match &s.outcome {
            StageOutcome::Completed => None,
            StageOutcome::Skipped { reason } => Some(format!("{} ({})", s.state, reason)),
        })
        .collect();
    if summary.stages.len() != PipelineState::SEQUENCE.len() {
        return Err(fail(
            ctx,
            format!(
                "expected {} stages, got {}",
                PipelineState::SEQUENCE.len(),
                summary.stages.len()
            ),
        ));
    }
    if skipped.is_empty() {
        Ok(())
    } else {
        Err(fail(ctx, format!("skipped stages: {}", skipped.join(", "))))
    }
}

/// Assert exactly `expected` were skipped, in pipeline order.
pub fn assert_skipped(
    summary: &ReportSummary,
    expected: &[PipelineState],
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual: Vec<PipelineState> = summary
        .stages
        .iter()
        .filter(|s| matches!(s.outcome, StageOutcome::Skipped { .. }))
        .map(|s| s.state)
        .collect();
    if actual == expected {
        Ok(())
    } else {
        Err(fail(
            ctx,
            format!("expected skipped {:?}, got {:?}", expected, actual),
        ))
    }
}

/// Assert the recorded thread designation.
pub fn assert_thread(
    summary: &ReportSummary,
    designation: &str,
    ctx: &str,
) -> Result<(), HarnessError> {
    match &summary.thread {
        Some(spec) if spec.designation == designation => Ok(()),
        Some(spec) => Err(fail(
            ctx,
            format!("expected thread {}, got {}", designation, spec.designation),
        )),
        None => Err(fail(ctx, format!("expected thread {}, got none", designation))),
    }
}

/// Assert the host-side body name.
pub fn assert_body_named(
    kernel: &MockKernel,
    body: &KernelSolidHandle,
    name: &str,
    ctx: &str,
) -> Result<(), HarnessError> {
    match kernel.body_name(body) {
        Some(actual) if actual == name => Ok(()),
        other => Err(fail(ctx, format!("expected body name {:?}, got {:?}", name, other))),
    }
}

/// Assert how many faces of `body` have the given surface type.
pub fn assert_surface_count(
    kernel: &MockKernel,
    body: &KernelSolidHandle,
    surface: SurfaceType,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let count = kernel
        .list_faces(body)
        .into_iter()
        .filter(|&f| kernel.compute_signature(f, TopoKind::Face).surface_type == Some(surface))
        .count();
    if count == expected {
        Ok(())
    } else {
        Err(fail(
            ctx,
            format!("expected {} {:?} faces, got {}", expected, surface, count),
        ))
    }
}

/// Assert the number of threaded faces on `body`.
pub fn assert_threaded_faces(
    kernel: &MockKernel,
    body: &KernelSolidHandle,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let count = kernel.threaded_faces(body).len();
    if count == expected {
        Ok(())
    } else {
        Err(fail(
            ctx,
            format!("expected {} threaded faces, got {}", expected, count),
        ))
    }
}

/// Assert a failure message mentions `needle`.
pub fn assert_message_contains(message: &str, needle: &str, ctx: &str) -> Result<(), HarnessError> {
    if message.contains(needle) {
        Ok(())
    } else {
        Err(fail(ctx, format!("expected {:?} in message {:?}", needle, message)))
    }
}
