use bolt_ops::KernelBundle;
use tracing::{info, warn};

use crate::inputs::parameters_from_inputs;
use crate::messages::{CommandRequest, CommandResponse, ReportSummary};
use crate::session::{BridgeError, CommandSession};

/// Handle a dialog request and return a response.
///
/// Never panics: every failure becomes a single `Failed` response.
pub fn dispatch(
    session: &mut CommandSession,
    request: CommandRequest,
    kb: &mut dyn KernelBundle,
) -> CommandResponse {
    let response = match handle_request(session, request, kb) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "bolt command failed");
            CommandResponse::Failed {
                message: e.to_string(),
            }
        }
    };
    session.record(&response);
    response
}

/// JSON in, JSON out. Malformed requests produce a `Failed` response.
pub fn dispatch_json(session: &mut CommandSession, json: &str, kb: &mut dyn KernelBundle) -> String {
    let response = match serde_json::from_str::<CommandRequest>(json) {
        Ok(request) => dispatch(session, request, kb),
        Err(e) => {
            let err = BridgeError::Serialization {
                reason: e.to_string(),
            };
            let response = CommandResponse::Failed {
                message: err.to_string(),
            };
            session.record(&response);
            response
        }
    };
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"type":"Failed","message":"serialization error: {}"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

fn handle_request(
    session: &mut CommandSession,
    request: CommandRequest,
    kb: &mut dyn KernelBundle,
) -> Result<CommandResponse, BridgeError> {
    match request {
        CommandRequest::Execute { inputs } => {
            let params = parameters_from_inputs(&inputs)?;
            let report = session.generator().execute(kb, &params)?;
            info!(body = %report.body_name, "bolt created");
            Ok(CommandResponse::BoltCreated {
                summary: ReportSummary::from(&report),
            })
        }
        CommandRequest::Preview { inputs } => {
            let params = parameters_from_inputs(&inputs)?;
            let report = session.generator().preview(kb, &params)?;
            Ok(CommandResponse::PreviewReady {
                summary: ReportSummary::from(&report),
            })
        }
    }
}
