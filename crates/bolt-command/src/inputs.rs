//! The command's input fields and their mapping onto [`BoltParameters`].

use bolt_engine::BoltParameters;
use serde::{Deserialize, Serialize};

use crate::messages::InputEntry;
use crate::session::BridgeError;

/// Value kind of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputKind {
    String,
    Length,
    Angle,
}

/// An already-evaluated input value. Lengths are in the base length unit,
/// angles in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputValue {
    Text { value: String },
    Length { value: f64 },
    Angle { value: f64 },
}

impl InputValue {
    pub fn kind(&self) -> InputKind {
        match self {
            InputValue::Text { .. } => InputKind::String,
            InputValue::Length { .. } => InputKind::Length,
            InputValue::Angle { .. } => InputKind::Angle,
        }
    }
}

/// One field of the command dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub id: String,
    pub label: String,
    pub kind: InputKind,
    /// Display unit the host evaluates typed expressions against.
    pub unit: Option<String>,
    pub default: InputValue,
}

fn definition(id: &str, label: &str, default: InputValue) -> InputDefinition {
    let unit = match default.kind() {
        InputKind::String => None,
        InputKind::Length => Some("cm".to_string()),
        InputKind::Angle => Some("deg".to_string()),
    };
    InputDefinition {
        id: id.to_string(),
        label: label.to_string(),
        kind: default.kind(),
        unit,
        default,
    }
}

/// The eight dialog fields, in display order, with the default bolt's values.
pub fn command_inputs() -> Vec<InputDefinition> {
    let d = BoltParameters::default();
    let length = |value| InputValue::Length { value };
    vec![
        definition("boltName", "Bolt Name", InputValue::Text { value: d.name.clone() }),
        definition("headDiameter", "Head Diameter", length(d.head_diameter)),
        definition("bodyDiameter", "Body Diameter", length(d.body_diameter)),
        definition("headHeight", "Head Height", length(d.head_height)),
        definition("bodyLength", "Body Length", length(d.body_length)),
        definition("cutAngle", "Cut Angle", InputValue::Angle { value: d.cut_angle }),
        definition("chamferDistance", "Chamfer Distance", length(d.chamfer_distance)),
        definition("filletRadius", "Fillet Radius", length(d.fillet_radius)),
    ]
}

/// Overlay evaluated inputs on the default parameters.
///
/// Unknown ids are ignored. A value whose kind does not match its field is
/// an error. The result is not validated here.
pub fn parameters_from_inputs(inputs: &[InputEntry]) -> Result<BoltParameters, BridgeError> {
    let mut params = BoltParameters::default();

    for entry in inputs {
        let mismatch = |expected: InputKind| BridgeError::Input {
            id: entry.id.clone(),
            reason: format!("expected a {:?} value, got {:?}", expected, entry.value.kind()),
        };

        let slot = match entry.id.as_str() {
            "boltName" => {
                match &entry.value {
                    InputValue::Text { value } => params.name = value.clone(),
                    _ => return Err(mismatch(InputKind::String)),
                }
                continue;
            }
            "cutAngle" => {
                match entry.value {
                    InputValue::Angle { value } => params.cut_angle = value,
                    _ => return Err(mismatch(InputKind::Angle)),
                }
                continue;
            }
            "headDiameter" => &mut params.head_diameter,
            "bodyDiameter" => &mut params.body_diameter,
            "headHeight" => &mut params.head_height,
            "bodyLength" => &mut params.body_length,
            "chamferDistance" => &mut params.chamfer_distance,
            "filletRadius" => &mut params.fillet_radius,
            _ => continue,
        };
        match entry.value {
            InputValue::Length { value } => *slot = value,
            _ => return Err(mismatch(InputKind::Length)),
        }
    }
    Ok(params)
}
