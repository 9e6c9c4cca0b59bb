use serde::{Deserialize, Serialize};

/// A thread definition as returned by the host's thread table.
/// Passed through to the thread-creation call unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSpec {
    /// Thread family, e.g. "ISO Metric profile".
    pub thread_type: String,
    /// Size designation, e.g. "M5x0.8".
    pub designation: String,
    /// Tolerance class, e.g. "6g".
    pub class: String,
    /// Nominal major diameter, in base length units.
    pub nominal_diameter: f64,
    /// Thread pitch, in base length units.
    pub pitch: f64,
    pub is_internal: bool,
}
