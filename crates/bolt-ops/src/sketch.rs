use std::time::Instant;

use bolt_kernel::{ComponentHandle, SketchPlane};
use bolt_types::SketchCurve;
use tracing::{debug, instrument};

use crate::diff::elapsed_ms;
use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError, SketchResult};

/// Build a sketch on `plane` from model-space curves and return its profiles.
///
/// Points are projected into the sketch frame through the host, so callers
/// never deal with a plane's axis conventions.
#[instrument(skip(kb, component, curves), fields(curves = curves.len()))]
pub fn execute_sketch(
    kb: &mut dyn KernelBundle,
    component: &ComponentHandle,
    plane: SketchPlane,
    curves: &[SketchCurve],
) -> Result<SketchResult, OpError> {
    let timer = Instant::now();
    let sketch = kb.create_sketch(component, plane)?;

    for curve in curves {
        match curve {
            SketchCurve::Line { start, end } => {
                let a = kb.model_to_sketch(&sketch, *start)?;
                let b = kb.model_to_sketch(&sketch, *end)?;
                kb.add_line(&sketch, a, b)?;
            }
            SketchCurve::Circle { center, radius } => {
                let c = kb.model_to_sketch(&sketch, *center)?;
                kb.add_circle(&sketch, c, *radius)?;
            }
        }
    }

    let profiles = kb.sketch_profiles(&sketch)?;
    let kernel_time_ms = elapsed_ms(timer);
    debug!(profiles = profiles.len(), kernel_time_ms, "sketch built");
    if profiles.is_empty() {
        return Err(OpError::NoProfiles);
    }

    Ok(SketchResult {
        sketch,
        profiles,
        diagnostics: Diagnostics {
            warnings: Vec::new(),
            kernel_time_ms,
        },
    })
}
