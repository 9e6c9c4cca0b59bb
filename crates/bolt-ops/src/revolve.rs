use std::time::Instant;

use bolt_kernel::{Axis, FaceGroup, FeatureOperation, KernelId, KernelSolidHandle};
use bolt_types::Role;
use tracing::{debug, instrument};

use crate::diff::{self, elapsed_ms};
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Execute a revolve of one profile about `axis`.
///
/// `target` is the body expected to be modified; only cut revolves are
/// used by the bolt, so a baseline body always exists.
#[instrument(skip(kb, target))]
pub fn execute_revolve(
    kb: &mut dyn KernelBundle,
    target: &KernelSolidHandle,
    profile: KernelId,
    axis: Axis,
    angle: f64,
    operation: FeatureOperation,
) -> Result<OpResult, OpError> {
    if !angle.is_finite() || angle <= 0.0 || angle > std::f64::consts::TAU + 1e-9 {
        return Err(OpError::InvalidParameter {
            reason: format!("revolve angle must be in (0, 2pi], got {}", angle),
        });
    }

    let before = diff::snapshot(kb.as_introspect(), target);

    let start = Instant::now();
    let output = kb.revolve(profile, axis, angle, operation)?;
    let kernel_time_ms = elapsed_ms(start);

    let roles = kb
        .feature_faces(&output.feature, FaceGroup::Side)
        .into_iter()
        .enumerate()
        .map(|(index, face)| (face, Role::RevolveCutFace { index }))
        .collect();
    debug!(kernel_time_ms, "revolve complete");
    Ok(diff::assemble(kb.as_introspect(), output, &before, roles, kernel_time_ms))
}
