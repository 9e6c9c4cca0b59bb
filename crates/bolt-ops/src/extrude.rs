use std::time::Instant;

use bolt_kernel::{
    ExtentDirection, FaceGroup, FeatureOperation, FeatureResult, KernelId, KernelIntrospect,
    KernelSolidHandle,
};
use bolt_types::Role;
use tracing::{debug, instrument};

use crate::diff::{self, elapsed_ms, TopoSnapshot};
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Execute an extrude of one profile.
///
/// For `Join` and `Cut`, `target` is the body being modified; its topology
/// before the call is the baseline for provenance.
#[instrument(skip(kb, target))]
pub fn execute_extrude(
    kb: &mut dyn KernelBundle,
    profile: KernelId,
    distance: f64,
    direction: ExtentDirection,
    operation: FeatureOperation,
    target: Option<&KernelSolidHandle>,
) -> Result<OpResult, OpError> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("extrude distance must be positive, got {}", distance),
        });
    }

    let before = match target {
        Some(body) => diff::snapshot(kb.as_introspect(), body),
        None => TopoSnapshot::empty(),
    };

    let start = Instant::now();
    let output = kb.extrude(profile, distance, direction, operation)?;
    let kernel_time_ms = elapsed_ms(start);

    let roles = assign_extrude_roles(kb.as_introspect(), &output);
    debug!(kernel_time_ms, roles = roles.len(), "extrude complete");
    Ok(diff::assemble(kb.as_introspect(), output, &before, roles, kernel_time_ms))
}

/// Far cap is EndCapPositive, the cap on the sketch plane EndCapNegative,
/// swept faces SideFace in profile order.
fn assign_extrude_roles(
    introspect: &dyn KernelIntrospect,
    output: &FeatureResult,
) -> Vec<(KernelId, Role)> {
    let mut assignments = Vec::new();
    for face in introspect.feature_faces(&output.feature, FaceGroup::End) {
        assignments.push((face, Role::EndCapPositive));
    }
    for face in introspect.feature_faces(&output.feature, FaceGroup::Start) {
        assignments.push((face, Role::EndCapNegative));
    }
    for (index, face) in introspect
        .feature_faces(&output.feature, FaceGroup::Side)
        .into_iter()
        .enumerate()
    {
        assignments.push((face, Role::SideFace { index }));
    }
    assignments
}
