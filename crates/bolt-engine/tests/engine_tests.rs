use std::f64::consts::FRAC_PI_2;

use bolt_engine::{
    BoltGenerator, BoltParameters, BuildError, BuildMode, ConfigError, EngineConfig,
    PipelineState, StageOutcome,
};
use bolt_kernel::{
    Axis, ComponentHandle, ExtentDirection, FaceGroup, FeatureHandle, FeatureOperation,
    FeatureResult, Kernel, KernelError, KernelId, KernelIntrospect, KernelSolidHandle, MockKernel,
    MockOp, Point3, SketchHandle, SketchPlane, ThreadQuery, ThreadSpec, ThreadTable, TopoKind,
    TopoSignature,
};
use bolt_ops::{select, OpError};

fn generator() -> BoltGenerator {
    BoltGenerator::default()
}

// ── End-to-end scenarios ───────────────────────────────────────────────────

#[test]
fn default_bolt_runs_every_state() {
    let mut kernel = MockKernel::new();
    let report = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap();

    let states: Vec<PipelineState> = report.stages.iter().map(|s| s.state).collect();
    assert_eq!(states, PipelineState::SEQUENCE.to_vec());
    assert!(report
        .stages
        .iter()
        .all(|s| s.outcome == StageOutcome::Completed));

    assert_eq!(report.mode, BuildMode::Commit);
    assert_eq!(report.body_name, "Bolt");
    assert_eq!(kernel.body_count(), 1);
    assert_eq!(kernel.component_bodies(&report.component), vec![report.body.clone()]);

    let thread = report.thread.as_ref().unwrap();
    assert_eq!(thread.designation, "M5x0.8");
    assert_eq!(kernel.threaded_faces(&report.body).len(), 1);
    assert!(report.warnings.is_empty());
}

#[test]
fn body_not_narrower_than_head_fails_before_any_kernel_call() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        body_diameter: 0.75,
        ..BoltParameters::default()
    };
    let err = generator().execute(&mut kernel, &params).unwrap_err();

    assert!(matches!(
        &err,
        BuildError::ParameterOutOfRange { field, .. } if field == "bodyDiameter"
    ));
    assert_eq!(err.state(), None);
    assert!(kernel.calls().is_empty());
}

#[test]
fn shank_wider_than_head_flats_fails_validation() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        body_diameter: 0.7,
        ..BoltParameters::default()
    };
    let err = generator().execute(&mut kernel, &params).unwrap_err();

    match &err {
        BuildError::ParameterOutOfRange { field, reason } => {
            assert_eq!(field, "bodyDiameter");
            assert!(reason.contains("flats"));
        }
        other => panic!("expected ParameterOutOfRange, got {other:?}"),
    }
    assert!(kernel.calls().is_empty());
}

#[test]
fn stages_record_face_provenance() {
    let mut kernel = MockKernel::new();
    let report = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap();
    let created = |state| report.stage(state).unwrap().faces_created;

    assert_eq!(created(PipelineState::HeadSketch), 0);
    assert_eq!(created(PipelineState::HeadExtrude), 8);
    // Shank side and tip; its start cap merges into the head.
    assert_eq!(created(PipelineState::BodyExtrudeJoin), 2);
    assert_eq!(created(PipelineState::Chamfer), 1);
    assert_eq!(created(PipelineState::Fillet), 1);
    assert_eq!(created(PipelineState::TipCutNear), 1);
    assert_eq!(created(PipelineState::TipCutFar), 1);
    assert!(report.stages.iter().all(|s| s.faces_deleted == 0));
}

#[test]
fn oversized_fillet_is_rejected_after_chamfer_was_committed() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        fillet_radius: 0.2,
        ..BoltParameters::default()
    };
    let err = generator().execute(&mut kernel, &params).unwrap_err();

    assert!(matches!(err, BuildError::FeatureRejected { state: PipelineState::Fillet, .. }));
    assert!(err.to_string().contains("Fillet"));

    // Nothing is rolled back: the body and its chamfer stay in the document.
    assert_eq!(kernel.body_count(), 1);
    assert!(kernel.calls().contains(&MockOp::Chamfer));
    assert_eq!(kernel.calls().last(), Some(&MockOp::Fillet));
    assert!(!kernel.calls().contains(&MockOp::Revolve));
}

#[test]
fn oversized_chamfer_is_rejected() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        chamfer_distance: 0.3,
        ..BoltParameters::default()
    };
    let err = generator().execute(&mut kernel, &params).unwrap_err();
    assert_eq!(err.state(), Some(PipelineState::Chamfer));
    assert!(matches!(err, BuildError::FeatureRejected { .. }));
}

#[test]
fn preview_runs_the_same_pipeline() {
    let mut kernel = MockKernel::new();
    let report = generator()
        .preview(&mut kernel, &BoltParameters::default())
        .unwrap();
    assert_eq!(report.mode, BuildMode::Preview);
    assert_eq!(report.stages.len(), 10);
}

#[test]
fn each_run_gets_its_own_component_and_invocation_id() {
    let mut kernel = MockKernel::new();
    let gen = generator();
    let first = gen.execute(&mut kernel, &BoltParameters::default()).unwrap();
    let second = gen.execute(&mut kernel, &BoltParameters::default()).unwrap();

    assert_ne!(first.invocation_id, second.invocation_id);
    assert_ne!(first.component, second.component);
    assert_eq!(kernel.body_count(), 2);
}

// ── Skip policies ──────────────────────────────────────────────────────────

#[test]
fn zero_cut_angle_skips_tip_cuts() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        cut_angle: 0.0,
        ..BoltParameters::default()
    };
    let report = generator().execute(&mut kernel, &params).unwrap();

    assert_eq!(
        report.skipped_states(),
        vec![
            PipelineState::TipCutSketch,
            PipelineState::TipCutNear,
            PipelineState::TipCutFar
        ]
    );
    assert!(!kernel.calls().contains(&MockOp::Revolve));
    assert_eq!(report.stages.len(), 10);
}

#[test]
fn hairline_cut_angle_skips_tip_cuts_instead_of_failing() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        cut_angle: 0.001f64.to_radians(),
        ..BoltParameters::default()
    };
    let report = generator().execute(&mut kernel, &params).unwrap();

    assert_eq!(
        report.skipped_states(),
        vec![
            PipelineState::TipCutSketch,
            PipelineState::TipCutNear,
            PipelineState::TipCutFar
        ]
    );
    assert!(!kernel.calls().contains(&MockOp::Revolve));

    let params = BoltParameters {
        cut_angle: 0.01f64.to_radians(),
        ..BoltParameters::default()
    };
    let report = generator().execute(&mut kernel, &params).unwrap();
    assert!(report.skipped_states().is_empty());
}

#[test]
fn zero_blends_skip_chamfer_and_fillet() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        chamfer_distance: 0.0,
        fillet_radius: 0.0,
        ..BoltParameters::default()
    };
    let report = generator().execute(&mut kernel, &params).unwrap();

    assert_eq!(
        report.skipped_states(),
        vec![PipelineState::Chamfer, PipelineState::Fillet]
    );
    assert!(!kernel.calls().contains(&MockOp::Chamfer));
    assert!(!kernel.calls().contains(&MockOp::Fillet));
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn missing_thread_size_is_skipped_not_failed() {
    let mut kernel = MockKernel::new();
    let params = BoltParameters {
        body_diameter: 0.37,
        ..BoltParameters::default()
    };
    let report = generator().execute(&mut kernel, &params).unwrap();

    assert!(report.thread.is_none());
    match &report.stage(PipelineState::Thread).unwrap().outcome {
        StageOutcome::Skipped { reason } => assert!(reason.contains("0.37")),
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(!kernel.calls().contains(&MockOp::ApplyThread));
}

#[test]
fn empty_thread_table_still_builds_the_bolt() {
    let mut kernel = MockKernel::with_thread_table(ThreadTable::empty());
    let report = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap();
    assert_eq!(report.skipped_states(), vec![PipelineState::Thread]);
}

#[test]
fn threads_can_be_disabled_by_config() {
    let mut kernel = MockKernel::new();
    let gen = BoltGenerator::new(EngineConfig::without_threads());
    let report = gen.execute(&mut kernel, &BoltParameters::default()).unwrap();
    assert_eq!(report.skipped_states(), vec![PipelineState::Thread]);
    assert!(kernel.threaded_faces(&report.body).is_empty());
}

// ── Host failures ──────────────────────────────────────────────────────────

#[test]
fn component_creation_failure_aborts_at_head_sketch() {
    let mut kernel = MockKernel::new();
    kernel.fail_next(MockOp::CreateComponent, "no active design");
    let err = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::HostCreationFailure {
            state: PipelineState::HeadSketch,
            reason: "component creation failed: no active design".to_string(),
        }
    );
}

#[test]
fn extrude_failure_is_host_creation_failure() {
    let mut kernel = MockKernel::new();
    kernel.fail_next(MockOp::Extrude, "out of memory");
    let err = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::HostCreationFailure { state: PipelineState::HeadExtrude, .. }
    ));
}

#[test]
fn body_naming_failure_aborts_at_head_extrude() {
    let mut kernel = MockKernel::new();
    kernel.fail_next(MockOp::SetBodyName, "name locked");
    let err = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap_err();
    assert_eq!(err.state(), Some(PipelineState::HeadExtrude));
}

#[test]
fn revolve_rejection_aborts_at_near_cut() {
    let mut kernel = MockKernel::new();
    kernel.fail_next(MockOp::Revolve, "self-intersecting result");
    let err = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::FeatureRejected { state: PipelineState::TipCutNear, .. }
    ));
}

#[test]
fn thread_rejection_is_fatal() {
    let mut kernel = MockKernel::new();
    kernel.fail_next(MockOp::ApplyThread, "thread data unavailable");
    let err = generator()
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap_err();
    assert_eq!(err.state(), Some(PipelineState::Thread));
}

// ── Host topology that does not match the rules ─────────────────────────

/// How [`Distorted`] misreports the mock's topology.
#[derive(Clone, Copy)]
enum Distortion {
    /// Faces report only their outer loop.
    HideInnerLoops,
    /// Sketches report at most one profile.
    MergeProfiles,
}

/// MockKernel behind a host adapter that misreports some topology.
struct Distorted {
    inner: MockKernel,
    distortion: Distortion,
}

impl Distorted {
    fn new(distortion: Distortion) -> Self {
        Self {
            inner: MockKernel::new(),
            distortion,
        }
    }
}

impl Kernel for Distorted {
    fn create_component(&mut self) -> Result<ComponentHandle, KernelError> {
        self.inner.create_component()
    }
    fn create_sketch(
        &mut self,
        component: &ComponentHandle,
        plane: SketchPlane,
    ) -> Result<SketchHandle, KernelError> {
        self.inner.create_sketch(component, plane)
    }
    fn add_line(&mut self, sketch: &SketchHandle, start: Point3, end: Point3) -> Result<(), KernelError> {
        self.inner.add_line(sketch, start, end)
    }
    fn add_circle(&mut self, sketch: &SketchHandle, center: Point3, radius: f64) -> Result<(), KernelError> {
        self.inner.add_circle(sketch, center, radius)
    }
    fn sketch_profiles(&mut self, sketch: &SketchHandle) -> Result<Vec<KernelId>, KernelError> {
        let mut profiles = self.inner.sketch_profiles(sketch)?;
        if let Distortion::MergeProfiles = self.distortion {
            profiles.truncate(1);
        }
        Ok(profiles)
    }
    fn model_to_sketch(&self, sketch: &SketchHandle, point: Point3) -> Result<Point3, KernelError> {
        self.inner.model_to_sketch(sketch, point)
    }
    fn extrude(
        &mut self,
        profile: KernelId,
        distance: f64,
        direction: ExtentDirection,
        operation: FeatureOperation,
    ) -> Result<FeatureResult, KernelError> {
        self.inner.extrude(profile, distance, direction, operation)
    }
    fn revolve(
        &mut self,
        profile: KernelId,
        axis: Axis,
        angle: f64,
        operation: FeatureOperation,
    ) -> Result<FeatureResult, KernelError> {
        self.inner.revolve(profile, axis, angle, operation)
    }
    fn chamfer_edges(&mut self, edges: &[KernelId], distance: f64) -> Result<FeatureResult, KernelError> {
        self.inner.chamfer_edges(edges, distance)
    }
    fn fillet_edges(&mut self, edges: &[KernelId], radius: f64) -> Result<FeatureResult, KernelError> {
        self.inner.fillet_edges(edges, radius)
    }
    fn set_body_name(&mut self, body: &KernelSolidHandle, name: &str) -> Result<(), KernelError> {
        self.inner.set_body_name(body, name)
    }
    fn apply_thread(&mut self, face: KernelId, spec: &ThreadSpec) -> Result<FeatureResult, KernelError> {
        self.inner.apply_thread(face, spec)
    }
}

impl KernelIntrospect for Distorted {
    fn feature_faces(&self, feature: &FeatureHandle, group: FaceGroup) -> Vec<KernelId> {
        self.inner.feature_faces(feature, group)
    }
    fn face_loops(&self, face: KernelId) -> Vec<KernelId> {
        let mut loops = self.inner.face_loops(face);
        if let Distortion::HideInnerLoops = self.distortion {
            loops.truncate(1);
        }
        loops
    }
    fn loop_edges(&self, loop_id: KernelId) -> Vec<KernelId> {
        self.inner.loop_edges(loop_id)
    }
    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        self.inner.face_edges(face)
    }
    fn face_body(&self, face: KernelId) -> Option<KernelSolidHandle> {
        self.inner.face_body(face)
    }
    fn list_faces(&self, body: &KernelSolidHandle) -> Vec<KernelId> {
        self.inner.list_faces(body)
    }
    fn list_edges(&self, body: &KernelSolidHandle) -> Vec<KernelId> {
        self.inner.list_edges(body)
    }
    fn component_bodies(&self, component: &ComponentHandle) -> Vec<KernelSolidHandle> {
        self.inner.component_bodies(component)
    }
    fn body_name(&self, body: &KernelSolidHandle) -> Option<String> {
        self.inner.body_name(body)
    }
    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        self.inner.compute_signature(entity, kind)
    }
}

impl ThreadQuery for Distorted {
    fn default_thread_type(&self) -> String {
        self.inner.default_thread_type()
    }
    fn recommend_thread(&self, diameter: f64, is_internal: bool, thread_type: &str) -> Option<ThreadSpec> {
        self.inner.recommend_thread(diameter, is_internal, thread_type)
    }
}

#[test]
fn missing_joint_loop_is_topology_mismatch_at_fillet() {
    let mut host = Distorted::new(Distortion::HideInnerLoops);
    let err = generator()
        .execute(&mut host, &BoltParameters::default())
        .unwrap_err();

    match &err {
        BuildError::TopologyMismatch { state, rule, .. } => {
            assert_eq!(*state, PipelineState::Fillet);
            assert_eq!(rule, select::SINGLE_EDGE_LOOP);
        }
        other => panic!("expected TopologyMismatch, got {other:?}"),
    }
    // The chamfer before it stays; no fillet was attempted.
    assert!(host.inner.calls().contains(&MockOp::Chamfer));
    assert!(!host.inner.calls().contains(&MockOp::Fillet));
    assert_eq!(host.inner.body_count(), 1);
}

#[test]
fn single_bevel_profile_is_topology_mismatch_at_tip_cut_sketch() {
    let mut host = Distorted::new(Distortion::MergeProfiles);
    let err = generator()
        .execute(&mut host, &BoltParameters::default())
        .unwrap_err();

    assert_eq!(err.state(), Some(PipelineState::TipCutSketch));
    assert!(matches!(err, BuildError::TopologyMismatch { .. }));
    assert!(err.to_string().contains("1 profiles"));
    assert!(!host.inner.calls().contains(&MockOp::Revolve));
}

#[test]
fn kernel_errors_are_classified_by_kind() {
    let state = PipelineState::BodyExtrudeJoin;
    let overhang = OpError::Kernel(KernelError::ExtrudeFailed {
        reason: "joined profile overhangs target face".into(),
    });
    assert!(matches!(
        BuildError::from_op(state, overhang),
        BuildError::FeatureRejected { .. }
    ));
    let no_body = OpError::Kernel(KernelError::BodyFailed {
        reason: "no active design".into(),
    });
    assert!(matches!(
        BuildError::from_op(state, no_body),
        BuildError::HostCreationFailure { .. }
    ));
}

// ── Parameters ─────────────────────────────────────────────────────────────

#[test]
fn default_parameters_are_valid() {
    let params = BoltParameters::default();
    params.validate().unwrap();
    approx::assert_relative_eq!(params.cut_angle, 30f64.to_radians());
}

#[test]
fn parameter_bounds() {
    let base = BoltParameters::default();
    let cases: Vec<(&str, BoltParameters)> = vec![
        ("name", BoltParameters { name: "  ".into(), ..base.clone() }),
        ("headDiameter", BoltParameters { head_diameter: 0.0, ..base.clone() }),
        ("headHeight", BoltParameters { head_height: -1.0, ..base.clone() }),
        ("bodyLength", BoltParameters { body_length: f64::NAN, ..base.clone() }),
        ("chamferDistance", BoltParameters { chamfer_distance: -0.01, ..base.clone() }),
        ("filletRadius", BoltParameters { fillet_radius: f64::INFINITY, ..base.clone() }),
        ("cutAngle", BoltParameters { cut_angle: FRAC_PI_2, ..base.clone() }),
        ("cutAngle", BoltParameters { cut_angle: -0.1, ..base.clone() }),
    ];
    for (expected, params) in cases {
        match params.validate() {
            Err(BuildError::ParameterOutOfRange { field, .. }) => {
                assert_eq!(field, expected)
            }
            other => panic!("{expected}: expected ParameterOutOfRange, got {other:?}"),
        }
    }
}

#[test]
fn parameters_deserialize_with_defaults() {
    let params: BoltParameters =
        serde_json::from_str(r#"{"name": "M6 Bolt", "bodyDiameter": 0.6}"#).unwrap();
    assert_eq!(params.name, "M6 Bolt");
    assert_eq!(params.body_diameter, 0.6);
    assert_eq!(params.head_height, 0.3125);
}

// ── Config ─────────────────────────────────────────────────────────────────

#[test]
fn config_from_json_fills_defaults() {
    let config = EngineConfig::from_json(r#"{"internal_thread": true}"#).unwrap();
    assert!(config.internal_thread);
    assert!(config.apply_threads);
    approx::assert_relative_eq!(config.revolve_angle, std::f64::consts::TAU);
    assert!(config.thread_request().is_internal);
}

#[test]
fn config_rejects_bad_revolve_angle() {
    let err = EngineConfig::from_json(r#"{"revolve_angle": 0.0}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "revolve_angle", .. }));
    assert!(matches!(
        EngineConfig::from_json("not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn unknown_thread_family_skips_thread() {
    let mut kernel = MockKernel::new();
    let config = EngineConfig {
        thread_type: Some("ANSI Unified Screw Threads".into()),
        ..EngineConfig::default()
    };
    let report = BoltGenerator::new(config)
        .execute(&mut kernel, &BoltParameters::default())
        .unwrap();
    assert!(report.thread.is_none());
}
