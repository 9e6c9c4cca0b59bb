use serde::{Deserialize, Serialize};

// Re-export shared types from bolt-types
pub use bolt_types::{Axis, Point3, SketchCurve, SketchPlane, SurfaceType, ThreadSpec, TopoKind, TopoSignature};

/// Opaque handle to a component in the host document.
/// NEVER persisted. Valid only while the host document is open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentHandle(pub(crate) u64);

/// Opaque handle to a sketch owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SketchHandle(pub(crate) u64);

/// Opaque handle to a solid body owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

/// Opaque handle to a modeling feature (extrude, revolve, chamfer, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureHandle(pub(crate) u64);

macro_rules! handle_id {
    ($($t:ty),*) => {
        $(impl $t {
            pub(crate) fn id(&self) -> u64 {
                self.0
            }
        })*
    };
}

handle_id!(ComponentHandle, SketchHandle, KernelSolidHandle, FeatureHandle);

/// Transient kernel-internal entity identifier (profile, face, loop, edge).
/// Stable within a single host session. NEVER persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelId(pub u64);

/// How a new extrude/revolve combines with existing bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureOperation {
    NewBody,
    Join,
    Cut,
}

/// Extrude direction relative to the profile's sketch normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExtentDirection {
    Positive,
    Negative,
}

impl ExtentDirection {
    pub fn sign(&self) -> f64 {
        match self {
            ExtentDirection::Positive => 1.0,
            ExtentDirection::Negative => -1.0,
        }
    }
}

/// Which group of a feature's faces to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceGroup {
    /// Faces lying on the feature's start profile.
    Start,
    /// Faces at the far end of the feature.
    End,
    /// Lateral faces swept by the feature.
    Side,
}

/// What a modeling call hands back: the feature and the body it produced or modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureResult {
    pub feature: FeatureHandle,
    pub body: KernelSolidHandle,
}

/// Errors from host-kernel calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("component creation failed: {reason}")]
    ComponentFailed { reason: String },

    #[error("sketch operation failed: {reason}")]
    SketchFailed { reason: String },

    #[error("profile not found: {id:?}")]
    ProfileNotFound { id: KernelId },

    #[error("body creation failed: {reason}")]
    BodyFailed { reason: String },

    #[error("extrude failed: {reason}")]
    ExtrudeFailed { reason: String },

    #[error("revolve failed: {reason}")]
    RevolveFailed { reason: String },

    #[error("chamfer failed: {reason}")]
    ChamferFailed { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("thread failed: {reason}")]
    ThreadFailed { reason: String },

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("stale handle: {kind} {id}")]
    StaleHandle { kind: &'static str, id: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

impl KernelError {
    /// True when the host refused an operation because the requested geometry
    /// is infeasible, as opposed to failing to create an entity at all.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            KernelError::ExtrudeFailed { .. }
                | KernelError::RevolveFailed { .. }
                | KernelError::ChamferFailed { .. }
                | KernelError::FilletFailed { .. }
                | KernelError::ThreadFailed { .. }
        )
    }
}
