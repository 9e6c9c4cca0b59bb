use std::time::Instant;

use bolt_kernel::{KernelId, KernelSolidHandle};
use bolt_types::{Role, ThreadSpec};
use tracing::{debug, instrument};

use crate::diff::{self, elapsed_ms};
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Attach `spec` to a cylindrical face of `solid`.
#[instrument(skip(kb, solid, spec), fields(designation = %spec.designation))]
pub fn execute_thread(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    face: KernelId,
    spec: &ThreadSpec,
) -> Result<OpResult, OpError> {
    if kb.as_introspect().face_body(face).as_ref() != Some(solid) {
        return Err(OpError::InvalidParameter {
            reason: format!("face {:?} is not on the threaded body", face),
        });
    }
    let before = diff::snapshot(kb.as_introspect(), solid);

    let start = Instant::now();
    let output = kb.apply_thread(face, spec)?;
    let kernel_time_ms = elapsed_ms(start);

    debug!(kernel_time_ms, "thread applied");
    Ok(diff::assemble(
        kb.as_introspect(),
        output,
        &before,
        vec![(face, Role::ThreadedFace)],
        kernel_time_ms,
    ))
}
