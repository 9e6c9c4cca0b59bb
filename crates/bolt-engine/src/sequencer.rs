//! The bolt construction state machine.
//!
//! Every state runs in order. A state either completes, records a skip
//! (zero-size blends, zero cut angle, no thread available), or aborts the
//! whole run. Nothing is rolled back on abort: whatever the host already
//! committed stays in the document.

use bolt_kernel::{
    Axis, ComponentHandle, ExtentDirection, FeatureOperation, KernelSolidHandle, SketchPlane,
};
use bolt_ops::geometry::{hex_vertices, revolve_cut_profile, CutSide};
use bolt_ops::{
    execute_chamfer, execute_extrude, execute_fillet, execute_revolve, execute_sketch,
    execute_thread, recommend, select, KernelBundle, OpResult, SketchResult, ThreadRecommendation,
};
use bolt_types::{Point3, SketchCurve, ThreadSpec, TopoKind};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::params::BoltParameters;
use crate::types::{BuildError, BuildMode, BuildReport, PipelineState, StageOutcome, StageRecord};

/// Per-invocation state, threaded through every pipeline state and dropped
/// when the run ends.
pub struct PipelineContext {
    pub invocation_id: Uuid,
    pub mode: BuildMode,
    pub component: Option<ComponentHandle>,
    pub head_sketch: Option<SketchResult>,
    pub head: Option<OpResult>,
    pub body_sketch: Option<SketchResult>,
    pub body: Option<OpResult>,
    pub chamfer: Option<OpResult>,
    pub fillet: Option<OpResult>,
    pub tip_sketch: Option<SketchResult>,
    pub tip_near: Option<OpResult>,
    pub tip_far: Option<OpResult>,
    pub thread: Option<OpResult>,
    pub thread_spec: Option<ThreadSpec>,
    pub stages: Vec<StageRecord>,
    pub warnings: Vec<String>,
}

impl PipelineContext {
    pub fn new(mode: BuildMode) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            mode,
            component: None,
            head_sketch: None,
            head: None,
            body_sketch: None,
            body: None,
            chamfer: None,
            fillet: None,
            tip_sketch: None,
            tip_near: None,
            tip_far: None,
            thread: None,
            thread_spec: None,
            stages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The bolt body, once the head exists.
    pub fn body_handle(&self) -> Option<&KernelSolidHandle> {
        self.head.as_ref().map(|h| &h.output.body)
    }
}

/// What one state did.
struct StepOutput {
    outcome: StageOutcome,
    kernel_time_ms: f64,
    faces_created: usize,
    faces_deleted: usize,
}

type Step = Result<StepOutput, BuildError>;

/// A state that made no body changes of its own (sketches, `Done`).
fn completed(kernel_time_ms: f64) -> Step {
    Ok(StepOutput {
        outcome: StageOutcome::Completed,
        kernel_time_ms,
        faces_created: 0,
        faces_deleted: 0,
    })
}

/// A state that ran one body operation; records its face provenance.
fn completed_op(result: &OpResult) -> Step {
    let provenance = &result.provenance;
    Ok(StepOutput {
        outcome: StageOutcome::Completed,
        kernel_time_ms: result.diagnostics.kernel_time_ms,
        faces_created: provenance.created_of(TopoKind::Face).count(),
        faces_deleted: provenance
            .deleted
            .iter()
            .filter(|r| r.kind == TopoKind::Face)
            .count(),
    })
}

fn skipped(state: PipelineState, ctx: &mut PipelineContext, reason: impl Into<String>) -> Step {
    let reason = reason.into();
    warn!(%state, %reason, "state skipped");
    ctx.warnings.push(format!("{}: {}", state, reason));
    Ok(StepOutput {
        outcome: StageOutcome::Skipped { reason },
        kernel_time_ms: 0.0,
        faces_created: 0,
        faces_deleted: 0,
    })
}

/// Output of an earlier state. Absent only if the state order was broken.
fn require<'a, T>(slot: &'a Option<T>, state: PipelineState, what: &str) -> Result<&'a T, BuildError> {
    slot.as_ref().ok_or_else(|| BuildError::HostCreationFailure {
        state,
        reason: format!("{} is not available", what),
    })
}

/// Validate the parameters, then run every state in order.
pub fn run(
    kb: &mut dyn KernelBundle,
    params: &BoltParameters,
    config: &EngineConfig,
    mode: BuildMode,
) -> Result<BuildReport, BuildError> {
    params.validate()?;

    let mut ctx = PipelineContext::new(mode);
    let span = info_span!("bolt_pipeline", invocation = %ctx.invocation_id, ?mode, name = %params.name);
    let _guard = span.enter();

    let mut state = PipelineState::HeadSketch;
    while state != PipelineState::Done {
        info!(%state, "entering state");
        let output = match step(kb, &mut ctx, params, config, state) {
            Ok(output) => output,
            Err(e) => {
                warn!(%state, error = %e, "pipeline aborted");
                return Err(e);
            }
        };
        ctx.stages.push(StageRecord {
            state,
            outcome: output.outcome,
            kernel_time_ms: output.kernel_time_ms,
            faces_created: output.faces_created,
            faces_deleted: output.faces_deleted,
        });
        state = state.next();
    }

    let component = require(&ctx.component, PipelineState::Done, "component")?.clone();
    let body = require(&ctx.head, PipelineState::Done, "head body")?.output.body.clone();
    let body_name = kb.body_name(&body).unwrap_or_else(|| params.name.clone());
    info!(%body_name, stages = ctx.stages.len(), "bolt complete");

    Ok(BuildReport {
        invocation_id: ctx.invocation_id,
        mode,
        component,
        body,
        body_name,
        stages: ctx.stages,
        thread: ctx.thread_spec,
        warnings: ctx.warnings,
    })
}

fn step(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    config: &EngineConfig,
    state: PipelineState,
) -> Step {
    match state {
        PipelineState::HeadSketch => head_sketch(kb, ctx, params, state),
        PipelineState::HeadExtrude => head_extrude(kb, ctx, params, state),
        PipelineState::BodySketch => body_sketch(kb, ctx, params, state),
        PipelineState::BodyExtrudeJoin => body_extrude_join(kb, ctx, params, state),
        PipelineState::Chamfer => chamfer(kb, ctx, params, config, state),
        PipelineState::Fillet => fillet(kb, ctx, params, config, state),
        PipelineState::TipCutSketch => tip_cut_sketch(kb, ctx, params, config, state),
        PipelineState::TipCutNear => tip_cut(kb, ctx, config, state, 0),
        PipelineState::TipCutFar => tip_cut(kb, ctx, config, state, 1),
        PipelineState::Thread => thread(kb, ctx, params, config, state),
        PipelineState::Done => completed(0.0),
    }
}

fn lines(edges: &[(Point3, Point3)]) -> Vec<SketchCurve> {
    edges
        .iter()
        .map(|(start, end)| SketchCurve::Line {
            start: *start,
            end: *end,
        })
        .collect()
}

fn head_sketch(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    state: PipelineState,
) -> Step {
    let component = kb
        .create_component()
        .map_err(|e| BuildError::HostCreationFailure {
            state,
            reason: e.to_string(),
        })?;
    let curves = lines(&hex_vertices(params.head_diameter).edges());
    let sketch = execute_sketch(kb, &component, SketchPlane::XY, &curves)
        .map_err(|e| BuildError::from_op(state, e))?;
    let ms = sketch.diagnostics.kernel_time_ms;
    ctx.component = Some(component);
    ctx.head_sketch = Some(sketch);
    completed(ms)
}

fn head_extrude(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    state: PipelineState,
) -> Step {
    let profile = require(&ctx.head_sketch, state, "head sketch")?.profiles[0];
    let head = execute_extrude(
        kb,
        profile,
        params.head_height,
        ExtentDirection::Positive,
        FeatureOperation::NewBody,
        None,
    )
    .map_err(|e| BuildError::from_op(state, e))?;
    kb.set_body_name(&head.output.body, &params.name)
        .map_err(|e| BuildError::HostCreationFailure {
            state,
            reason: e.to_string(),
        })?;
    let done = completed_op(&head);
    ctx.head = Some(head);
    done
}

fn body_sketch(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    state: PipelineState,
) -> Step {
    let component = require(&ctx.component, state, "component")?;
    let circle = [SketchCurve::Circle {
        center: [0.0, 0.0, 0.0],
        radius: params.body_radius(),
    }];
    let sketch = execute_sketch(kb, component, SketchPlane::XY, &circle)
        .map_err(|e| BuildError::from_op(state, e))?;
    let ms = sketch.diagnostics.kernel_time_ms;
    ctx.body_sketch = Some(sketch);
    completed(ms)
}

fn body_extrude_join(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    state: PipelineState,
) -> Step {
    let profile = require(&ctx.body_sketch, state, "body sketch")?.profiles[0];
    let head_body = require(&ctx.head, state, "head body")?.output.body.clone();
    let body = execute_extrude(
        kb,
        profile,
        params.body_length,
        ExtentDirection::Negative,
        FeatureOperation::Join,
        Some(&head_body),
    )
    .map_err(|e| BuildError::from_op(state, e))?;
    if body.output.body != head_body {
        return Err(BuildError::TopologyMismatch {
            state,
            rule: "join into head body".to_string(),
            detail: "the shank was not merged into the head body".to_string(),
        });
    }
    let done = completed_op(&body);
    ctx.body = Some(body);
    done
}

fn chamfer(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    config: &EngineConfig,
    state: PipelineState,
) -> Step {
    if params.chamfer_distance <= config.tolerance {
        return skipped(state, ctx, "chamfer distance is zero");
    }
    let body = require(&ctx.body, state, "body extrude")?;
    let solid = body.output.body.clone();
    let edges = select::far_end_face_edges(kb.as_introspect(), &body.output.feature)
        .map_err(|e| BuildError::from_select(state, e))?;
    let result = execute_chamfer(kb, &solid, &edges, params.chamfer_distance)
        .map_err(|e| BuildError::from_op(state, e))?;
    let done = completed_op(&result);
    ctx.chamfer = Some(result);
    done
}

fn fillet(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    config: &EngineConfig,
    state: PipelineState,
) -> Step {
    if params.fillet_radius <= config.tolerance {
        return skipped(state, ctx, "fillet radius is zero");
    }
    let head = require(&ctx.head, state, "head extrude")?;
    let solid = head.output.body.clone();
    let introspect = kb.as_introspect();
    let joint = select::start_face(introspect, &head.output.feature)
        .map_err(|e| BuildError::from_select(state, e))?;
    let ring = select::single_edge_loop(introspect, joint)
        .map_err(|e| BuildError::from_select(state, e))?;
    let edges = introspect.loop_edges(ring);
    let result = execute_fillet(kb, &solid, &edges, params.fillet_radius)
        .map_err(|e| BuildError::from_op(state, e))?;
    let done = completed_op(&result);
    ctx.fillet = Some(result);
    done
}

fn tip_cut_sketch(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    config: &EngineConfig,
    state: PipelineState,
) -> Step {
    if params.cut_angle <= config.tolerance {
        return skipped(state, ctx, "cut angle is zero");
    }
    let near = revolve_cut_profile(params.head_radius(), 0.0, params.cut_angle, CutSide::Near);
    let far = revolve_cut_profile(
        params.head_radius(),
        params.head_height,
        params.cut_angle,
        CutSide::Far,
    );
    if near.is_degenerate(config.tolerance) || far.is_degenerate(config.tolerance) {
        return skipped(
            state,
            ctx,
            format!(
                "cut angle {:.4} degrees gives a bevel profile of area {:e}",
                params.cut_angle.to_degrees(),
                near.area()
            ),
        );
    }
    let component = require(&ctx.component, state, "component")?;
    let mut curves = lines(&near.edges());
    curves.extend(lines(&far.edges()));

    let sketch = execute_sketch(kb, component, SketchPlane::XZ, &curves)
        .map_err(|e| BuildError::from_op(state, e))?;
    if sketch.profiles.len() != 2 {
        return Err(BuildError::TopologyMismatch {
            state,
            rule: "two revolve-cut profiles".to_string(),
            detail: format!("sketch produced {} profiles", sketch.profiles.len()),
        });
    }
    let ms = sketch.diagnostics.kernel_time_ms;
    ctx.tip_sketch = Some(sketch);
    completed(ms)
}

/// Revolve profile `index` of the tip-cut sketch as a cut through the head.
fn tip_cut(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    config: &EngineConfig,
    state: PipelineState,
    index: usize,
) -> Step {
    let Some(sketch) = ctx.tip_sketch.as_ref() else {
        return skipped(state, ctx, "no bevel profile to revolve");
    };
    let profile = sketch.profiles[index];
    let solid = require(&ctx.head, state, "head body")?.output.body.clone();
    let result = execute_revolve(
        kb,
        &solid,
        profile,
        Axis::Z,
        config.revolve_angle,
        FeatureOperation::Cut,
    )
    .map_err(|e| BuildError::from_op(state, e))?;
    let done = completed_op(&result);
    if index == 0 {
        ctx.tip_near = Some(result);
    } else {
        ctx.tip_far = Some(result);
    }
    done
}

fn thread(
    kb: &mut dyn KernelBundle,
    ctx: &mut PipelineContext,
    params: &BoltParameters,
    config: &EngineConfig,
    state: PipelineState,
) -> Step {
    if !config.apply_threads {
        return skipped(state, ctx, "threads disabled by configuration");
    }
    let spec = match recommend(kb.as_thread_query(), params.body_diameter, &config.thread_request()) {
        ThreadRecommendation::Found(spec) => spec,
        ThreadRecommendation::NotFound => {
            return skipped(
                state,
                ctx,
                format!("no thread recommended for diameter {}", params.body_diameter),
            );
        }
    };

    let body = require(&ctx.body, state, "body extrude")?;
    let solid = body.output.body.clone();
    let face = select::lateral_face(kb.as_introspect(), &body.output.feature)
        .map_err(|e| BuildError::from_select(state, e))?;
    let result =
        execute_thread(kb, &solid, face, &spec).map_err(|e| BuildError::from_op(state, e))?;
    info!(designation = %spec.designation, "thread applied");
    let done = completed_op(&result);
    ctx.thread = Some(result);
    ctx.thread_spec = Some(spec);
    done
}
