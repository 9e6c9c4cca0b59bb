pub mod dispatch;
pub mod inputs;
pub mod messages;
pub mod session;

pub use dispatch::{dispatch, dispatch_json};
pub use inputs::{command_inputs, parameters_from_inputs, InputDefinition, InputKind, InputValue};
pub use messages::{CommandRequest, CommandResponse, InputEntry, ReportSummary};
pub use session::{BridgeError, CommandSession};
