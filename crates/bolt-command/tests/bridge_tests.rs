use bolt_command::*;
use bolt_engine::{EngineConfig, PipelineState, StageOutcome};
use bolt_kernel::{MockKernel, MockOp};

// ── Helper functions ─────────────────────────────────────────────────────

fn length(id: &str, value: f64) -> InputEntry {
    InputEntry::new(id, InputValue::Length { value })
}

fn default_inputs() -> Vec<InputEntry> {
    command_inputs()
        .into_iter()
        .map(|def| InputEntry::new(def.id, def.default))
        .collect()
}

fn summary_of(response: &CommandResponse) -> &ReportSummary {
    match response {
        CommandResponse::BoltCreated { summary } | CommandResponse::PreviewReady { summary } => {
            summary
        }
        CommandResponse::Failed { message } => panic!("unexpected failure: {message}"),
    }
}

// ── Input definitions ────────────────────────────────────────────────────

#[test]
fn dialog_lists_eight_fields_in_order() {
    let ids: Vec<String> = command_inputs().into_iter().map(|d| d.id).collect();
    assert_eq!(
        ids,
        vec![
            "boltName",
            "headDiameter",
            "bodyDiameter",
            "headHeight",
            "bodyLength",
            "cutAngle",
            "chamferDistance",
            "filletRadius",
        ]
    );
}

#[test]
fn field_kinds_and_units() {
    let defs = command_inputs();
    assert_eq!(defs[0].kind, InputKind::String);
    assert_eq!(defs[0].unit, None);
    assert_eq!(defs[1].kind, InputKind::Length);
    assert_eq!(defs[1].unit.as_deref(), Some("cm"));
    assert_eq!(defs[5].kind, InputKind::Angle);
    assert_eq!(defs[5].unit.as_deref(), Some("deg"));
    assert_eq!(defs[0].label, "Bolt Name");
}

#[test]
fn default_inputs_give_default_parameters() {
    let params = parameters_from_inputs(&default_inputs()).unwrap();
    assert_eq!(params, bolt_engine::BoltParameters::default());
}

#[test]
fn inputs_overlay_defaults_and_ignore_unknown_ids() {
    let params = parameters_from_inputs(&[
        InputEntry::new("boltName", InputValue::Text { value: "M6".into() }),
        length("bodyDiameter", 0.6),
        length("washerThickness", 0.1),
    ])
    .unwrap();
    assert_eq!(params.name, "M6");
    assert_eq!(params.body_diameter, 0.6);
    assert_eq!(params.head_diameter, 0.75);
}

#[test]
fn wrong_value_kind_is_rejected() {
    let err = parameters_from_inputs(&[InputEntry::new(
        "cutAngle",
        InputValue::Length { value: 0.5 },
    )])
    .unwrap_err();
    match err {
        BridgeError::Input { id, .. } => assert_eq!(id, "cutAngle"),
        other => panic!("expected input error, got {other:?}"),
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────────

#[test]
fn execute_creates_a_named_threaded_bolt() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::default();
    let response = dispatch(
        &mut session,
        CommandRequest::Execute {
            inputs: default_inputs(),
        },
        &mut kernel,
    );

    assert!(matches!(response, CommandResponse::BoltCreated { .. }));
    let summary = summary_of(&response);
    assert_eq!(summary.body_name, "Bolt");
    assert_eq!(summary.stages.len(), 10);
    assert_eq!(summary.thread.as_ref().unwrap().designation, "M5x0.8");
    assert_eq!(session.last_response(), Some(&response));
    assert_eq!(kernel.body_count(), 1);
}

#[test]
fn preview_reports_preview_ready() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::default();
    let response = dispatch(
        &mut session,
        CommandRequest::Preview {
            inputs: default_inputs(),
        },
        &mut kernel,
    );
    assert!(matches!(response, CommandResponse::PreviewReady { .. }));
    assert_eq!(summary_of(&response).mode, bolt_engine::BuildMode::Preview);
}

#[test]
fn invalid_parameters_become_one_failure_message() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::default();
    let response = dispatch(
        &mut session,
        CommandRequest::Execute {
            inputs: vec![length("bodyDiameter", 1.0)],
        },
        &mut kernel,
    );
    match response {
        CommandResponse::Failed { message } => assert!(message.contains("bodyDiameter")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(kernel.calls().is_empty());
}

#[test]
fn host_failure_is_reported_not_panicked() {
    let mut kernel = MockKernel::new();
    kernel.fail_next(MockOp::CreateComponent, "no active design");
    let mut session = CommandSession::default();
    let response = dispatch(
        &mut session,
        CommandRequest::Execute {
            inputs: default_inputs(),
        },
        &mut kernel,
    );
    match response {
        CommandResponse::Failed { message } => {
            assert!(message.contains("no active design"));
            assert!(message.contains("HeadSketch"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn partial_body_survives_a_rejected_fillet() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::default();
    let response = dispatch(
        &mut session,
        CommandRequest::Execute {
            inputs: vec![length("filletRadius", 0.2)],
        },
        &mut kernel,
    );
    assert!(matches!(response, CommandResponse::Failed { .. }));
    assert_eq!(kernel.body_count(), 1);
}

#[test]
fn config_without_threads_skips_thread_stage() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::new(EngineConfig::without_threads());
    let response = dispatch(
        &mut session,
        CommandRequest::Execute {
            inputs: default_inputs(),
        },
        &mut kernel,
    );
    let summary = summary_of(&response);
    let thread_stage = summary
        .stages
        .iter()
        .find(|s| s.state == PipelineState::Thread)
        .unwrap();
    assert!(matches!(thread_stage.outcome, StageOutcome::Skipped { .. }));
    assert!(summary.thread.is_none());
}

// ── JSON round trip ──────────────────────────────────────────────────────

#[test]
fn json_request_produces_json_response() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::default();
    let request = r#"{
        "type": "Execute",
        "inputs": [
            {"id": "boltName", "value": {"type": "Text", "value": "Hex M5"}},
            {"id": "bodyLength", "value": {"type": "Length", "value": 3.0}}
        ]
    }"#;
    let json = dispatch_json(&mut session, request, &mut kernel);
    let response: CommandResponse = serde_json::from_str(&json).unwrap();

    let summary = summary_of(&response);
    assert_eq!(summary.body_name, "Hex M5");
    assert_eq!(kernel.body_count(), 1);
    assert!(kernel.calls().contains(&MockOp::SetBodyName));
}

#[test]
fn malformed_json_is_a_failed_response() {
    let mut kernel = MockKernel::new();
    let mut session = CommandSession::default();
    let json = dispatch_json(&mut session, "{\"type\": \"Explode\"}", &mut kernel);
    let response: CommandResponse = serde_json::from_str(&json).unwrap();
    match response {
        CommandResponse::Failed { message } => assert!(message.starts_with("serialization error")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(matches!(session.last_response(), Some(CommandResponse::Failed { .. })));
}
