use serde::{Deserialize, Serialize};

/// A point or vector in model space (or sketch space, where noted).
pub type Point3 = [f64; 3];

/// Construction plane a sketch is placed on.
///
/// The plane frames follow the host convention: the XZ plane's sketch Y axis
/// points along model -Z, so its normal is model +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SketchPlane {
    XY,
    XZ,
}

impl SketchPlane {
    pub fn origin(&self) -> Point3 {
        [0.0, 0.0, 0.0]
    }

    pub fn x_axis(&self) -> Point3 {
        [1.0, 0.0, 0.0]
    }

    pub fn y_axis(&self) -> Point3 {
        match self {
            SketchPlane::XY => [0.0, 1.0, 0.0],
            SketchPlane::XZ => [0.0, 0.0, -1.0],
        }
    }

    pub fn normal(&self) -> Point3 {
        match self {
            SketchPlane::XY => [0.0, 0.0, 1.0],
            SketchPlane::XZ => [0.0, 1.0, 0.0],
        }
    }

    /// Express a model-space point in this plane's frame.
    /// The third component is the signed distance from the plane.
    pub fn model_to_sketch(&self, p: Point3) -> Point3 {
        let o = self.origin();
        let d = [p[0] - o[0], p[1] - o[1], p[2] - o[2]];
        [dot(d, self.x_axis()), dot(d, self.y_axis()), dot(d, self.normal())]
    }

    /// Inverse of [`SketchPlane::model_to_sketch`].
    pub fn sketch_to_model(&self, s: Point3) -> Point3 {
        let o = self.origin();
        let (x, y, n) = (self.x_axis(), self.y_axis(), self.normal());
        [
            o[0] + s[0] * x[0] + s[1] * y[0] + s[2] * n[0],
            o[1] + s[0] * x[1] + s[1] * y[1] + s[2] * n[1],
            o[2] + s[0] * x[2] + s[1] * y[2] + s[2] * n[2],
        ]
    }
}

/// A curve drawn into a sketch. Coordinates are in sketch space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SketchCurve {
    Line { start: Point3, end: Point3 },
    Circle { center: Point3, radius: f64 },
}

/// Axis of revolution in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub origin: Point3,
    pub direction: Point3,
}

impl Axis {
    /// The component's Z construction axis, the bolt's central axis.
    pub const Z: Axis = Axis {
        origin: [0.0, 0.0, 0.0],
        direction: [0.0, 0.0, 1.0],
    };
}

fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
