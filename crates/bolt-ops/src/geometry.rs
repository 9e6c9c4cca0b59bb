//! Sketch geometry for the bolt: the hex head outline and the two
//! triangular silhouettes revolved to bevel the head.
//!
//! Pure functions. All points are in model space with the bolt axis on Z
//! and the head occupying `0 <= z <= head_height`.

use std::f64::consts::PI;

use bolt_types::Point3;
use serde::{Deserialize, Serialize};

/// Six hexagon vertices in the XY plane, counter-clockwise from +X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexOutline {
    pub vertices: [Point3; 6],
}

impl HexOutline {
    /// The six sides as `(start, end)` pairs; the last side closes back to vertex 0.
    pub fn edges(&self) -> [(Point3, Point3); 6] {
        std::array::from_fn(|i| (self.vertices[i], self.vertices[(i + 1) % 6]))
    }

    /// Distance from the center to the middle of each side.
    pub fn inradius(&self) -> f64 {
        let [x, y, _] = self.vertices[0];
        (x * x + y * y).sqrt() * (PI / 6.0).cos()
    }
}

/// Vertices at radius `diameter / 2` and angles `i * pi / 3`.
pub fn hex_vertices(diameter: f64) -> HexOutline {
    let r = diameter / 2.0;
    HexOutline {
        vertices: std::array::from_fn(|i| {
            let angle = i as f64 * PI / 3.0;
            [r * angle.cos(), r * angle.sin(), 0.0]
        }),
    }
}

/// Which end of the head a bevel cut sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CutSide {
    /// The head face on the sketch plane, where the shank joins.
    Near,
    /// The free top face of the head, at `z = head_height`.
    Far,
}

/// Closed triangle in the XZ half-plane `x >= 0`, revolved about Z to cut
/// away the head's corners.
///
/// `points[0]` lies on the hex flats, `points[1]` on the hex corner radius,
/// `points[2]` is the apex above (Near) or below (Far) `points[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevolveCutProfile {
    pub side: CutSide,
    pub points: [Point3; 3],
}

impl RevolveCutProfile {
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        std::array::from_fn(|i| (self.points[i], self.points[(i + 1) % 3]))
    }

    /// Axial distance between the apex and the base line.
    pub fn apex_offset(&self) -> f64 {
        (self.points[2][2] - self.points[1][2]).abs()
    }

    /// Area of the triangle in the XZ plane.
    pub fn area(&self) -> f64 {
        let base = (self.points[1][0] - self.points[0][0]).abs();
        0.5 * base * self.apex_offset()
    }

    /// True when the triangle is too thin to form a closed profile: its
    /// area is at or below `tolerance`.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.area() <= tolerance
    }
}

/// Bevel silhouette for one end of the head.
///
/// The base runs from the flats radius `head_radius * cos(pi/6)` to the corner
/// radius `head_radius` at height `z_base`. The apex rises from the corner by
/// `(head_radius - flats) * tan(cut_angle)` into the head: upwards for the
/// near face, downwards for the far face.
///
/// In the XZ sketch frame, where model Z maps to sketch -Y, the apex offset
/// therefore reads as `-` for the near cut and `+` for the far cut.
pub fn revolve_cut_profile(
    head_radius: f64,
    z_base: f64,
    cut_angle: f64,
    side: CutSide,
) -> RevolveCutProfile {
    let p1x = head_radius * (PI / 6.0).cos();
    let p2x = head_radius;
    let depth = (p2x - p1x) * cut_angle.tan();
    let apex_z = match side {
        CutSide::Near => z_base + depth,
        CutSide::Far => z_base - depth,
    };
    RevolveCutProfile {
        side,
        points: [[p1x, 0.0, z_base], [p2x, 0.0, z_base], [p2x, 0.0, apex_z]],
    }
}
