use std::collections::HashSet;
use std::time::Instant;

use bolt_kernel::{FeatureResult, KernelId, KernelIntrospect, KernelSolidHandle};
use bolt_types::{Role, TopoKind, TopoSignature};

use crate::types::{Diagnostics, EntityRecord, OpResult, Provenance};

/// Faces and edges of a body at a point in time.
#[derive(Debug, Clone, Default)]
pub struct TopoSnapshot {
    pub faces: Vec<(KernelId, TopoSignature)>,
    pub edges: Vec<(KernelId, TopoSignature)>,
}

impl TopoSnapshot {
    /// Snapshot of "no body yet", used before a NewBody extrude.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Take a topology snapshot of a body for diffing.
pub fn snapshot(introspect: &dyn KernelIntrospect, body: &KernelSolidHandle) -> TopoSnapshot {
    let sign = |ids: Vec<KernelId>, kind: TopoKind| -> Vec<(KernelId, TopoSignature)> {
        ids.into_iter()
            .map(|id| (id, introspect.compute_signature(id, kind)))
            .collect()
    };
    TopoSnapshot {
        faces: sign(introspect.list_faces(body), TopoKind::Face),
        edges: sign(introspect.list_edges(body), TopoKind::Edge),
    }
}

/// Result of diffing two topology snapshots.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub created: Vec<EntityRecord>,
    pub deleted: Vec<EntityRecord>,
}

/// Entities are matched by kernel id; ids stay stable for survivors within a session.
pub fn diff(before: &TopoSnapshot, after: &TopoSnapshot) -> DiffResult {
    let mut result = DiffResult::default();
    diff_kind(&before.faces, &after.faces, TopoKind::Face, &mut result);
    diff_kind(&before.edges, &after.edges, TopoKind::Edge, &mut result);
    result
}

fn diff_kind(
    before: &[(KernelId, TopoSignature)],
    after: &[(KernelId, TopoSignature)],
    kind: TopoKind,
    out: &mut DiffResult,
) {
    let before_ids: HashSet<KernelId> = before.iter().map(|(id, _)| *id).collect();
    let after_ids: HashSet<KernelId> = after.iter().map(|(id, _)| *id).collect();

    let record = |(id, sig): &(KernelId, TopoSignature)| EntityRecord {
        kernel_id: *id,
        kind,
        signature: sig.clone(),
    };
    out.created.extend(
        after
            .iter()
            .filter(|(id, _)| !before_ids.contains(id))
            .map(record),
    );
    out.deleted.extend(
        before
            .iter()
            .filter(|(id, _)| !after_ids.contains(id))
            .map(record),
    );
}

/// Diff the output body against `before` and package the operation result.
pub(crate) fn assemble(
    introspect: &dyn KernelIntrospect,
    output: FeatureResult,
    before: &TopoSnapshot,
    role_assignments: Vec<(KernelId, Role)>,
    kernel_time_ms: f64,
) -> OpResult {
    let after = snapshot(introspect, &output.body);
    let DiffResult { created, deleted } = diff(before, &after);
    OpResult {
        output,
        provenance: Provenance {
            created,
            deleted,
            role_assignments,
        },
        diagnostics: Diagnostics {
            warnings: Vec::new(),
            kernel_time_ms,
        },
    }
}

/// Milliseconds elapsed since `start`.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
