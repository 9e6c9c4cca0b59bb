//! Topology selection rules.
//!
//! Each rule names exactly one entity pattern and fails with
//! [`SelectError::TopologyMismatch`] when the pattern is absent. There is
//! no fallback matching.

use bolt_kernel::{FaceGroup, FeatureHandle, KernelId, KernelIntrospect};
use bolt_types::{SurfaceType, TopoKind};
use tracing::debug;

pub const FAR_END_FACE: &str = "far end-face of an extrusion";
pub const SINGLE_EDGE_LOOP: &str = "single-edge loop of a face";
pub const LATERAL_FACE: &str = "lateral face of a cylindrical extrusion";
pub const START_FACE: &str = "start face of an extrusion";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
    #[error("topology mismatch ({rule}): {detail}")]
    TopologyMismatch { rule: &'static str, detail: String },
}

impl SelectError {
    fn mismatch(rule: &'static str, detail: impl Into<String>) -> Self {
        SelectError::TopologyMismatch {
            rule,
            detail: detail.into(),
        }
    }
}

/// First candidate satisfying `predicate`, in candidate order.
pub fn find_first<T: Copy>(candidates: &[T], predicate: impl Fn(&T) -> bool) -> Option<T> {
    candidates.iter().find(|c| predicate(c)).copied()
}

/// The single face of `group` on `feature`.
fn sole_face(
    introspect: &dyn KernelIntrospect,
    feature: &FeatureHandle,
    group: FaceGroup,
    rule: &'static str,
) -> Result<KernelId, SelectError> {
    match introspect.feature_faces(feature, group).as_slice() {
        [face] => Ok(*face),
        [] => Err(SelectError::mismatch(rule, format!("feature has no {:?} face", group))),
        many => Err(SelectError::mismatch(
            rule,
            format!("expected one {:?} face, found {}", group, many.len()),
        )),
    }
}

/// The end face topologically opposite the extrusion's start profile.
pub fn far_end_face(
    introspect: &dyn KernelIntrospect,
    feature: &FeatureHandle,
) -> Result<KernelId, SelectError> {
    sole_face(introspect, feature, FaceGroup::End, FAR_END_FACE)
}

/// Every edge bounding the far end face.
pub fn far_end_face_edges(
    introspect: &dyn KernelIntrospect,
    feature: &FeatureHandle,
) -> Result<Vec<KernelId>, SelectError> {
    let face = far_end_face(introspect, feature)?;
    let edges = introspect.face_edges(face);
    if edges.is_empty() {
        return Err(SelectError::mismatch(FAR_END_FACE, format!("face {:?} has no edges", face)));
    }
    debug!(?face, edges = edges.len(), "selected far end-face edges");
    Ok(edges)
}

/// The face lying on the extrusion's sketch plane.
pub fn start_face(
    introspect: &dyn KernelIntrospect,
    feature: &FeatureHandle,
) -> Result<KernelId, SelectError> {
    sole_face(introspect, feature, FaceGroup::Start, START_FACE)
}

/// The loop of `face` made of exactly one edge.
///
/// A hex face pierced by the shank has a 6-edge outer loop and a 1-edge
/// circular inner loop; only the latter qualifies, wherever it is listed.
pub fn single_edge_loop(
    introspect: &dyn KernelIntrospect,
    face: KernelId,
) -> Result<KernelId, SelectError> {
    let loops = introspect.face_loops(face);
    find_first(&loops, |l| introspect.loop_edges(*l).len() == 1).ok_or_else(|| {
        SelectError::mismatch(
            SINGLE_EDGE_LOOP,
            format!("none of the {} loops on face {:?} has exactly one edge", loops.len(), face),
        )
    })
}

/// The cylindrical side face of a circular extrusion.
pub fn lateral_face(
    introspect: &dyn KernelIntrospect,
    feature: &FeatureHandle,
) -> Result<KernelId, SelectError> {
    let sides = introspect.feature_faces(feature, FaceGroup::Side);
    let face = find_first(&sides, |f| {
        introspect.compute_signature(*f, TopoKind::Face).surface_type == Some(SurfaceType::Cylindrical)
    })
    .ok_or_else(|| {
        SelectError::mismatch(
            LATERAL_FACE,
            format!("none of the {} side faces is cylindrical", sides.len()),
        )
    })?;
    debug!(?face, "selected lateral face");
    Ok(face)
}
