use bolt_engine::{BoltGenerator, BuildError, EngineConfig};

use crate::messages::CommandResponse;

/// Errors while handling a command request.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("input {id}: {reason}")]
    Input { id: String, reason: String },

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

/// State of one open bolt command. Created when the dialog opens and
/// dropped when it closes.
pub struct CommandSession {
    generator: BoltGenerator,
    last_response: Option<CommandResponse>,
}

impl CommandSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            generator: BoltGenerator::new(config),
            last_response: None,
        }
    }

    pub fn generator(&self) -> &BoltGenerator {
        &self.generator
    }

    /// The response to the most recent request, if any.
    pub fn last_response(&self) -> Option<&CommandResponse> {
        self.last_response.as_ref()
    }

    pub(crate) fn record(&mut self, response: &CommandResponse) {
        self.last_response = Some(response.clone());
    }
}

impl Default for CommandSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
