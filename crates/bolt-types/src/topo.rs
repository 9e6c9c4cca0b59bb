use serde::{Deserialize, Serialize};

/// The kind of topological entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Vertex,
    Edge,
    Loop,
    Face,
    Body,
}

/// Underlying surface (for faces) or curve family (for edges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceType {
    Planar,
    Cylindrical,
    Conical,
    Toroidal,
    Linear,
    Circular,
}

/// Geometric signature of a topological entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopoSignature {
    /// Surface type for faces, curve type for edges.
    pub surface_type: Option<SurfaceType>,
    /// Surface area (for faces).
    pub area: Option<f64>,
    /// Centroid position [x, y, z].
    pub centroid: Option<[f64; 3]>,
    /// Outward-pointing normal (planar faces only).
    pub normal: Option<[f64; 3]>,
    /// Radius of circular edges and cylindrical faces.
    pub radius: Option<f64>,
    /// Edge length (for edges).
    pub length: Option<f64>,
}

impl TopoSignature {
    pub fn empty() -> Self {
        Self {
            surface_type: None,
            area: None,
            centroid: None,
            normal: None,
            radius: None,
            length: None,
        }
    }
}
