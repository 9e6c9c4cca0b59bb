use serde::{Deserialize, Serialize};

/// Semantic role assigned to faces by modeling operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Role {
    /// The cap on the far end of an extrusion.
    EndCapPositive,
    /// The cap lying on the extrusion's sketch plane.
    EndCapNegative,
    /// A lateral face swept from one profile curve.
    SideFace { index: usize },
    /// A face created by a chamfer operation.
    ChamferFace { index: usize },
    /// A face created by a fillet operation.
    FilletFace { index: usize },
    /// A surface left behind by a revolve cut.
    RevolveCutFace { index: usize },
    /// A face carrying a thread annotation.
    ThreadedFace,
}
