use bolt_kernel::{FeatureResult, KernelError, KernelId, SketchHandle};
use bolt_types::{Role, TopoKind, TopoSignature};

/// Complete result of a modeling operation.
#[derive(Debug, Clone)]
pub struct OpResult {
    /// The feature and the body it produced or modified. Runtime-only.
    pub output: FeatureResult,
    /// What the operation did to the body's topology.
    pub provenance: Provenance,
    pub diagnostics: Diagnostics,
}

/// Result of building a sketch.
#[derive(Debug, Clone)]
pub struct SketchResult {
    pub sketch: SketchHandle,
    /// Closed profiles, in drawing order.
    pub profiles: Vec<KernelId>,
    pub diagnostics: Diagnostics,
}

/// Provenance tracking: what happened to topology during an operation.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    /// Entities that exist in the result but not in the input.
    pub created: Vec<EntityRecord>,
    /// Entities that existed in the input but not in the result.
    pub deleted: Vec<EntityRecord>,
    /// Semantic role assignments for faces the operation produced.
    pub role_assignments: Vec<(KernelId, Role)>,
}

impl Provenance {
    /// Created entities of one kind.
    pub fn created_of(&self, kind: TopoKind) -> impl Iterator<Item = &EntityRecord> {
        self.created.iter().filter(move |r| r.kind == kind)
    }

    /// The first face carrying `role`, if any.
    pub fn face_with_role(&self, role: &Role) -> Option<KernelId> {
        self.role_assignments
            .iter()
            .find(|(_, r)| r == role)
            .map(|(id, _)| *id)
    }
}

/// Record of a topological entity with its kernel ID and signature.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// The kernel-internal ID. Runtime-only.
    pub kernel_id: KernelId,
    pub kind: TopoKind,
    pub signature: TopoSignature,
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    /// Time spent inside kernel calls, in milliseconds.
    pub kernel_time_ms: f64,
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("sketch produced no closed profiles")]
    NoProfiles,

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}
