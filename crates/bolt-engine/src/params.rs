use std::f64::consts::FRAC_PI_2;

use bolt_ops::geometry::hex_vertices;
use serde::{Deserialize, Serialize};

use crate::types::BuildError;

/// Dimensions of one bolt. Lengths are in the host's base length unit,
/// the cut angle in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoltParameters {
    pub name: String,
    /// Across-corners diameter of the hex head.
    pub head_diameter: f64,
    pub body_diameter: f64,
    pub head_height: f64,
    pub body_length: f64,
    /// Bevel angle of the head corners. Zero disables the bevel.
    pub cut_angle: f64,
    /// Chamfer on the shank tip. Zero disables it.
    pub chamfer_distance: f64,
    /// Fillet where the shank meets the head. Zero disables it.
    pub fillet_radius: f64,
}

impl Default for BoltParameters {
    fn default() -> Self {
        Self {
            name: "Bolt".to_string(),
            head_diameter: 0.75,
            body_diameter: 0.5,
            head_height: 0.3125,
            body_length: 2.0,
            cut_angle: 30f64.to_radians(),
            chamfer_distance: 0.03845,
            fillet_radius: 0.02994,
        }
    }
}

impl BoltParameters {
    /// Check basic bounds. Runs before any kernel call.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.name.trim().is_empty() {
            return Err(out_of_range("name", "must not be empty"));
        }

        let lengths = [
            ("headDiameter", self.head_diameter),
            ("bodyDiameter", self.body_diameter),
            ("headHeight", self.head_height),
            ("bodyLength", self.body_length),
        ];
        let blends = [
            ("chamferDistance", self.chamfer_distance),
            ("filletRadius", self.fillet_radius),
        ];

        for (field, value) in lengths.iter().chain(&blends).chain(&[("cutAngle", self.cut_angle)]) {
            if !value.is_finite() {
                return Err(out_of_range(field, format!("must be finite, got {}", value)));
            }
        }
        for (field, value) in lengths {
            if value <= 0.0 {
                return Err(out_of_range(field, format!("must be positive, got {}", value)));
            }
        }
        for (field, value) in blends {
            if value < 0.0 {
                return Err(out_of_range(field, format!("must not be negative, got {}", value)));
            }
        }
        if self.body_diameter >= self.head_diameter {
            return Err(out_of_range(
                "bodyDiameter",
                format!(
                    "must be smaller than headDiameter ({} >= {})",
                    self.body_diameter, self.head_diameter
                ),
            ));
        }
        let flats = 2.0 * hex_vertices(self.head_diameter).inradius();
        if self.body_diameter >= flats {
            return Err(out_of_range(
                "bodyDiameter",
                format!(
                    "must be smaller than the head's width across flats ({} >= {:.5})",
                    self.body_diameter, flats
                ),
            ));
        }
        if !(0.0..FRAC_PI_2).contains(&self.cut_angle) {
            return Err(out_of_range(
                "cutAngle",
                format!("must be in [0, 90) degrees, got {:.4} degrees", self.cut_angle.to_degrees()),
            ));
        }
        Ok(())
    }

    pub fn head_radius(&self) -> f64 {
        self.head_diameter / 2.0
    }

    pub fn body_radius(&self) -> f64 {
        self.body_diameter / 2.0
    }
}

fn out_of_range(field: &str, reason: impl Into<String>) -> BuildError {
    BuildError::ParameterOutOfRange {
        field: field.to_string(),
        reason: reason.into(),
    }
}
