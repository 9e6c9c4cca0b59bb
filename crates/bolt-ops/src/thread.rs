use bolt_kernel::ThreadQuery;
use bolt_types::ThreadSpec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What kind of thread to ask the host for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadRequest {
    pub is_internal: bool,
    /// Thread family; `None` uses the host's default.
    pub thread_type: Option<String>,
}

/// Outcome of a thread-table lookup. `NotFound` is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ThreadRecommendation {
    Found(ThreadSpec),
    NotFound,
}

impl ThreadRecommendation {
    pub fn is_found(&self) -> bool {
        matches!(self, ThreadRecommendation::Found(_))
    }

    pub fn spec(&self) -> Option<&ThreadSpec> {
        match self {
            ThreadRecommendation::Found(spec) => Some(spec),
            ThreadRecommendation::NotFound => None,
        }
    }
}

/// Ask the host's thread table for a thread fitting `diameter`.
pub fn recommend(query: &dyn ThreadQuery, diameter: f64, request: &ThreadRequest) -> ThreadRecommendation {
    let thread_type = request
        .thread_type
        .clone()
        .unwrap_or_else(|| query.default_thread_type());
    match query.recommend_thread(diameter, request.is_internal, &thread_type) {
        Some(spec) => {
            debug!(diameter, designation = %spec.designation, "thread recommended");
            ThreadRecommendation::Found(spec)
        }
        None => {
            debug!(diameter, %thread_type, "no thread recommendation");
            ThreadRecommendation::NotFound
        }
    }
}
