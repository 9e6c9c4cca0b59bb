use crate::types::*;

/// Host modeling surface. Every call is synchronous and either commits its
/// result to the host document or fails without side effects of its own.
/// Implemented by the host adapter and by MockKernel (deterministic test double).
pub trait Kernel {
    /// Add a fresh, empty component to the active design.
    fn create_component(&mut self) -> Result<ComponentHandle, KernelError>;

    /// Create an empty sketch on one of the component's construction planes.
    fn create_sketch(
        &mut self,
        component: &ComponentHandle,
        plane: SketchPlane,
    ) -> Result<SketchHandle, KernelError>;

    /// Add a line between two sketch-space points.
    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        start: Point3,
        end: Point3,
    ) -> Result<(), KernelError>;

    /// Add a circle given its sketch-space center and radius.
    fn add_circle(
        &mut self,
        sketch: &SketchHandle,
        center: Point3,
        radius: f64,
    ) -> Result<(), KernelError>;

    /// Closed profiles found in the sketch, in the order their first curve was drawn.
    fn sketch_profiles(&mut self, sketch: &SketchHandle) -> Result<Vec<KernelId>, KernelError>;

    /// Convert a model-space point into the sketch's frame.
    fn model_to_sketch(&self, sketch: &SketchHandle, point: Point3) -> Result<Point3, KernelError>;

    /// Extrude a profile along its sketch normal.
    fn extrude(
        &mut self,
        profile: KernelId,
        distance: f64,
        direction: ExtentDirection,
        operation: FeatureOperation,
    ) -> Result<FeatureResult, KernelError>;

    /// Revolve a profile about an axis by `angle` radians.
    fn revolve(
        &mut self,
        profile: KernelId,
        axis: Axis,
        angle: f64,
        operation: FeatureOperation,
    ) -> Result<FeatureResult, KernelError>;

    /// Equal-distance chamfer on a set of edges of one body.
    fn chamfer_edges(&mut self, edges: &[KernelId], distance: f64)
        -> Result<FeatureResult, KernelError>;

    /// Constant-radius fillet on a set of edges of one body.
    fn fillet_edges(&mut self, edges: &[KernelId], radius: f64)
        -> Result<FeatureResult, KernelError>;

    /// Rename a body in the host's browser.
    fn set_body_name(&mut self, body: &KernelSolidHandle, name: &str) -> Result<(), KernelError>;

    /// Attach a thread to a cylindrical face.
    fn apply_thread(&mut self, face: KernelId, spec: &ThreadSpec)
        -> Result<FeatureResult, KernelError>;
}

/// Topology introspection. Read-only queries on host entities.
pub trait KernelIntrospect {
    /// Faces of a feature, by group. Faces consumed by later operations are omitted.
    fn feature_faces(&self, feature: &FeatureHandle, group: FaceGroup) -> Vec<KernelId>;

    /// Boundary loops of a face. The outer loop comes first.
    fn face_loops(&self, face: KernelId) -> Vec<KernelId>;

    /// Edges of a loop, in order.
    fn loop_edges(&self, loop_id: KernelId) -> Vec<KernelId>;

    /// All edges bounding a face.
    fn face_edges(&self, face: KernelId) -> Vec<KernelId>;

    /// The body a face belongs to.
    fn face_body(&self, face: KernelId) -> Option<KernelSolidHandle>;

    /// All faces of a body.
    fn list_faces(&self, body: &KernelSolidHandle) -> Vec<KernelId>;

    /// All edges of a body.
    fn list_edges(&self, body: &KernelSolidHandle) -> Vec<KernelId>;

    /// Bodies owned by a component.
    fn component_bodies(&self, component: &ComponentHandle) -> Vec<KernelSolidHandle>;

    /// User-visible body name.
    fn body_name(&self, body: &KernelSolidHandle) -> Option<String>;

    /// Geometric signature of a single entity.
    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature;
}

/// The host's thread table.
pub trait ThreadQuery {
    /// The thread family the host uses when none is specified.
    fn default_thread_type(&self) -> String;

    /// Recommend a thread for a cylinder of the given diameter.
    /// `None` means the table has no matching size.
    fn recommend_thread(&self, diameter: f64, is_internal: bool, thread_type: &str)
        -> Option<ThreadSpec>;
}
