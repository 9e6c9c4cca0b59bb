//! Engine configuration.

use std::f64::consts::TAU;

use bolt_ops::ThreadRequest;
use serde::{Deserialize, Serialize};

/// Errors from loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Knobs for the bolt pipeline that are not part of the bolt's dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sweep of each bevel revolve, in radians.
    pub revolve_angle: f64,
    /// Run the thread state at all.
    pub apply_threads: bool,
    /// Ask for an internal (tapped) thread instead of an external one.
    pub internal_thread: bool,
    /// Thread family; `None` uses the host's default.
    pub thread_type: Option<String>,
    /// Blend sizes, cut angles and bevel profile areas at or below this
    /// count as zero.
    pub tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            revolve_angle: TAU,
            apply_threads: true,
            internal_thread: false,
            thread_type: None,
            tolerance: 1e-7,
        }
    }
}

impl EngineConfig {
    /// Config that never touches the thread table.
    pub fn without_threads() -> Self {
        Self {
            apply_threads: false,
            ..Self::default()
        }
    }

    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.revolve_angle > 0.0 && self.revolve_angle <= TAU) {
            return Err(ConfigError::Invalid {
                field: "revolve_angle",
                reason: format!("must be in (0, 2pi], got {}", self.revolve_angle),
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "tolerance",
                reason: format!("must be a non-negative number, got {}", self.tolerance),
            });
        }
        Ok(())
    }

    pub fn thread_request(&self) -> ThreadRequest {
        ThreadRequest {
            is_internal: self.internal_thread,
            thread_type: self.thread_type.clone(),
        }
    }
}
