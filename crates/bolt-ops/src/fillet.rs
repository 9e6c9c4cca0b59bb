use std::time::Instant;

use bolt_kernel::{FaceGroup, KernelId, KernelSolidHandle};
use bolt_types::Role;
use tracing::{debug, instrument};

use crate::diff::{self, elapsed_ms};
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Execute a constant-radius fillet on edges of `solid`.
#[instrument(skip(kb, solid, edges), fields(edges = edges.len()))]
pub fn execute_fillet(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    edges: &[KernelId],
    radius: f64,
) -> Result<OpResult, OpError> {
    if radius <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: "fillet radius must be positive".to_string(),
        });
    }

    let before = diff::snapshot(kb.as_introspect(), solid);

    let start = Instant::now();
    let output = kb.fillet_edges(edges, radius)?;
    let kernel_time_ms = elapsed_ms(start);

    let roles = kb
        .feature_faces(&output.feature, FaceGroup::Side)
        .into_iter()
        .enumerate()
        .map(|(index, face)| (face, Role::FilletFace { index }))
        .collect();
    debug!(kernel_time_ms, "fillet complete");
    Ok(diff::assemble(kb.as_introspect(), output, &before, roles, kernel_time_ms))
}
