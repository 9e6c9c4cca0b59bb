//! MockKernel: a deterministic in-memory host implementing Kernel + KernelIntrospect + ThreadQuery.
//!
//! Tracks faces, loops and edges per body with enough geometry to drive
//! topology selection and to reject infeasible blends and cuts the way a
//! real host would. It does not compute exact blend surfaces.
//! Used by bolt-ops, bolt-engine and the scenario tests.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use tracing::debug;

use crate::thread_table::ThreadTable;
use crate::traits::{Kernel, KernelIntrospect, ThreadQuery};
use crate::types::*;

/// Coincidence tolerance for points, planes and sizes.
const TOL: f64 = 1e-7;

/// Kernel calls that can be observed and made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    CreateComponent,
    CreateSketch,
    AddCurve,
    SketchProfiles,
    Extrude,
    Revolve,
    Chamfer,
    Fillet,
    SetBodyName,
    ApplyThread,
}

#[derive(Debug, Clone)]
enum EdgeCurve {
    Line {
        start: Point3,
        end: Point3,
    },
    Circle {
        center: Point3,
        radius: f64,
    },
    Arc {
        center: Point3,
        radius: f64,
        sweep: f64,
    },
}

impl EdgeCurve {
    fn length(&self) -> f64 {
        match self {
            EdgeCurve::Line { start, end } => norm(sub(*end, *start)),
            EdgeCurve::Circle { radius, .. } => TAU * radius,
            EdgeCurve::Arc { radius, sweep, .. } => radius * sweep,
        }
    }

    fn centroid(&self) -> Point3 {
        match self {
            EdgeCurve::Line { start, end } => scale(add(*start, *end), 0.5),
            EdgeCurve::Circle { center, .. } | EdgeCurve::Arc { center, .. } => *center,
        }
    }

    fn radius(&self) -> Option<f64> {
        match self {
            EdgeCurve::Line { .. } => None,
            EdgeCurve::Circle { radius, .. } | EdgeCurve::Arc { radius, .. } => Some(*radius),
        }
    }

    /// Largest distance from the Z axis reached by the curve.
    fn radial_reach(&self) -> f64 {
        match self {
            EdgeCurve::Line { start, end } => radial(*start).max(radial(*end)),
            EdgeCurve::Circle { center, radius } | EdgeCurve::Arc { center, radius, .. } => {
                radial(*center) + radius
            }
        }
    }
}

#[derive(Debug, Clone)]
struct MockEdge {
    id: KernelId,
    curve: EdgeCurve,
}

#[derive(Debug, Clone)]
struct MockLoop {
    id: KernelId,
    edges: Vec<KernelId>,
}

#[derive(Debug, Clone)]
struct MockFace {
    id: KernelId,
    surface: SurfaceType,
    /// Outer loop first.
    loops: Vec<MockLoop>,
    normal: Option<Point3>,
    centroid: Point3,
    area: f64,
    radius: Option<f64>,
    /// How far a blend may eat into this face before consuming it.
    extent: f64,
    /// Largest distance from the centroid to the outer boundary.
    reach: f64,
    threaded: bool,
}

impl MockFace {
    fn has_edge(&self, edge: KernelId) -> bool {
        self.loops.iter().any(|l| l.edges.contains(&edge))
    }

    fn replace_edge(&mut self, old: KernelId, new: KernelId) {
        for l in &mut self.loops {
            for e in &mut l.edges {
                if *e == old {
                    *e = new;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct MockBody {
    name: String,
    faces: Vec<MockFace>,
    edges: Vec<MockEdge>,
    /// Axial range [min_z, max_z].
    z_range: [f64; 2],
    /// Largest distance from the Z axis.
    radial_reach: f64,
}

impl MockBody {
    fn face_mut(&mut self, id: KernelId) -> Option<&mut MockFace> {
        self.faces.iter_mut().find(|f| f.id == id)
    }

    fn absorb_bounds(&mut self, other: &MockBody) {
        self.z_range[0] = self.z_range[0].min(other.z_range[0]);
        self.z_range[1] = self.z_range[1].max(other.z_range[1]);
        self.radial_reach = self.radial_reach.max(other.radial_reach);
    }
}

#[derive(Debug, Clone)]
struct MockSketch {
    component: u64,
    plane: SketchPlane,
    curves: Vec<SketchCurve>,
    /// Cached profile ids; cleared whenever a curve is added.
    profiles: Option<Vec<KernelId>>,
}

/// A closed profile expressed in model space.
#[derive(Debug, Clone)]
enum ProfileShape {
    Polygon(Vec<Point3>),
    Circle { center: Point3, radius: f64 },
}

#[derive(Debug, Clone)]
struct MockProfile {
    component: u64,
    plane: SketchPlane,
    shape: ProfileShape,
}

#[derive(Debug, Clone)]
struct MockFeature {
    body: u64,
    start: Vec<KernelId>,
    end: Vec<KernelId>,
    side: Vec<KernelId>,
}

/// A freshly swept prism before it is committed to a component.
struct Prism {
    body: MockBody,
    start: KernelId,
    end: KernelId,
    side: Vec<KernelId>,
}

/// Deterministic in-memory host.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    /// Component -> bodies in creation order.
    components: HashMap<u64, Vec<u64>>,
    sketches: HashMap<u64, MockSketch>,
    profiles: HashMap<u64, MockProfile>,
    bodies: HashMap<u64, MockBody>,
    features: HashMap<u64, MockFeature>,
    thread_table: ThreadTable,
    failures: HashMap<MockOp, String>,
    calls: Vec<MockOp>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::with_thread_table(ThreadTable::iso_metric_coarse())
    }

    pub fn with_thread_table(thread_table: ThreadTable) -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            components: HashMap::new(),
            sketches: HashMap::new(),
            profiles: HashMap::new(),
            bodies: HashMap::new(),
            features: HashMap::new(),
            thread_table,
            failures: HashMap::new(),
            calls: Vec::new(),
        }
    }

    /// Make the next call of `op` fail with `reason`.
    pub fn fail_next(&mut self, op: MockOp, reason: impl Into<String>) {
        self.failures.insert(op, reason.into());
    }

    /// Every mutating call made so far, in order.
    pub fn calls(&self) -> &[MockOp] {
        &self.calls
    }

    /// Total number of bodies across all components.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Faces of a body that carry a thread.
    pub fn threaded_faces(&self, body: &KernelSolidHandle) -> Vec<KernelId> {
        self.bodies
            .get(&body.id())
            .map(|b| b.faces.iter().filter(|f| f.threaded).map(|f| f.id).collect())
            .unwrap_or_default()
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    /// Record a call and consume any failure injected for it.
    fn enter(&mut self, op: MockOp) -> Result<(), String> {
        self.calls.push(op);
        match self.failures.remove(&op) {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    fn push_feature(&mut self, feature: MockFeature) -> FeatureHandle {
        let h = self.alloc_handle();
        self.features.insert(h, feature);
        FeatureHandle(h)
    }

    fn locate_face(&self, id: KernelId) -> Option<(u64, &MockFace)> {
        self.bodies
            .iter()
            .find_map(|(bid, b)| b.faces.iter().find(|f| f.id == id).map(|f| (*bid, f)))
    }

    fn locate_loop(&self, id: KernelId) -> Option<&MockLoop> {
        self.bodies
            .values()
            .flat_map(|b| b.faces.iter())
            .flat_map(|f| f.loops.iter())
            .find(|l| l.id == id)
    }

    fn locate_edge(&self, id: KernelId) -> Option<(u64, &MockEdge)> {
        self.bodies
            .iter()
            .find_map(|(bid, b)| b.edges.iter().find(|e| e.id == id).map(|e| (*bid, e)))
    }

    fn new_loop(&mut self, edges: Vec<KernelId>) -> MockLoop {
        MockLoop {
            id: self.alloc_id(),
            edges,
        }
    }

    fn new_edge(&mut self, curve: EdgeCurve) -> MockEdge {
        MockEdge {
            id: self.alloc_id(),
            curve,
        }
    }

    /// Sweep a profile by `offset` into a standalone prism.
    fn build_prism(&mut self, shape: &ProfileShape, offset: Point3) -> Prism {
        let height = norm(offset);
        let up = normalize(offset);
        let down = scale(up, -1.0);

        match shape {
            ProfileShape::Polygon(points) => {
                let k = points.len();
                let top: Vec<Point3> = points.iter().map(|p| add(*p, offset)).collect();
                let center = centroid(points);

                let bottom_edges: Vec<MockEdge> = (0..k)
                    .map(|i| {
                        self.new_edge(EdgeCurve::Line {
                            start: points[i],
                            end: points[(i + 1) % k],
                        })
                    })
                    .collect();
                let top_edges: Vec<MockEdge> = (0..k)
                    .map(|i| {
                        self.new_edge(EdgeCurve::Line {
                            start: top[i],
                            end: top[(i + 1) % k],
                        })
                    })
                    .collect();
                let vertical_edges: Vec<MockEdge> = (0..k)
                    .map(|i| {
                        self.new_edge(EdgeCurve::Line {
                            start: points[i],
                            end: top[i],
                        })
                    })
                    .collect();

                let inradius = (0..k)
                    .map(|i| point_segment_distance(center, points[i], points[(i + 1) % k]))
                    .fold(f64::INFINITY, f64::min);
                let circumradius = points
                    .iter()
                    .map(|p| norm(sub(*p, center)))
                    .fold(0.0, f64::max);
                let area = polygon_area_3d(points);

                let bottom_loop = self.new_loop(bottom_edges.iter().map(|e| e.id).collect());
                let start = MockFace {
                    id: self.alloc_id(),
                    surface: SurfaceType::Planar,
                    loops: vec![bottom_loop],
                    normal: Some(down),
                    centroid: center,
                    area,
                    radius: None,
                    extent: inradius,
                    reach: circumradius,
                    threaded: false,
                };
                let top_loop = self.new_loop(top_edges.iter().map(|e| e.id).collect());
                let end = MockFace {
                    id: self.alloc_id(),
                    surface: SurfaceType::Planar,
                    loops: vec![top_loop],
                    normal: Some(up),
                    centroid: add(center, offset),
                    area,
                    radius: None,
                    extent: inradius,
                    reach: circumradius,
                    threaded: false,
                };

                let mut faces = vec![start, end];
                let mut side = Vec::with_capacity(k);
                for i in 0..k {
                    let j = (i + 1) % k;
                    let edge_vec = sub(points[j], points[i]);
                    let mid = scale(add(points[i], points[j]), 0.5);
                    let mut n = normalize(cross(edge_vec, up));
                    if dot(n, sub(mid, center)) < 0.0 {
                        n = scale(n, -1.0);
                    }
                    let side_loop = self.new_loop(vec![
                        bottom_edges[i].id,
                        vertical_edges[j].id,
                        top_edges[i].id,
                        vertical_edges[i].id,
                    ]);
                    let face = MockFace {
                        id: self.alloc_id(),
                        surface: SurfaceType::Planar,
                        loops: vec![side_loop],
                        normal: Some(n),
                        centroid: add(mid, scale(offset, 0.5)),
                        area: norm(edge_vec) * height,
                        radius: None,
                        extent: height,
                        reach: 0.5 * (norm(edge_vec).powi(2) + height * height).sqrt(),
                        threaded: false,
                    };
                    side.push(face.id);
                    faces.push(face);
                }

                let mut edges = bottom_edges;
                edges.extend(top_edges);
                edges.extend(vertical_edges);

                let start_id = faces[0].id;
                let end_id = faces[1].id;
                let body = self.assemble_body(faces, edges);
                Prism {
                    body,
                    start: start_id,
                    end: end_id,
                    side,
                }
            }

            ProfileShape::Circle {
                center,
                radius,
            } => {
                let r = *radius;
                let top_center = add(*center, offset);
                let bottom_edge = self.new_edge(EdgeCurve::Circle {
                    center: *center,
                    radius: r,
                });
                let top_edge = self.new_edge(EdgeCurve::Circle {
                    center: top_center,
                    radius: r,
                });

                let start_loop = self.new_loop(vec![bottom_edge.id]);
                let start = MockFace {
                    id: self.alloc_id(),
                    surface: SurfaceType::Planar,
                    loops: vec![start_loop],
                    normal: Some(down),
                    centroid: *center,
                    area: PI * r * r,
                    radius: None,
                    extent: r,
                    reach: r,
                    threaded: false,
                };
                let end_loop = self.new_loop(vec![top_edge.id]);
                let end = MockFace {
                    id: self.alloc_id(),
                    surface: SurfaceType::Planar,
                    loops: vec![end_loop],
                    normal: Some(up),
                    centroid: top_center,
                    area: PI * r * r,
                    radius: None,
                    extent: r,
                    reach: r,
                    threaded: false,
                };
                let side_loops = vec![
                    self.new_loop(vec![bottom_edge.id]),
                    self.new_loop(vec![top_edge.id]),
                ];
                let lateral = MockFace {
                    id: self.alloc_id(),
                    surface: SurfaceType::Cylindrical,
                    loops: side_loops,
                    normal: None,
                    centroid: add(*center, scale(offset, 0.5)),
                    area: TAU * r * height,
                    radius: Some(r),
                    extent: height,
                    reach: (r * r + 0.25 * height * height).sqrt(),
                    threaded: false,
                };

                let (start_id, end_id, side_id) = (start.id, end.id, lateral.id);
                let body = self.assemble_body(vec![start, end, lateral], vec![bottom_edge, top_edge]);
                Prism {
                    body,
                    start: start_id,
                    end: end_id,
                    side: vec![side_id],
                }
            }
        }
    }

    fn assemble_body(&mut self, faces: Vec<MockFace>, edges: Vec<MockEdge>) -> MockBody {
        let mut z_range = [f64::INFINITY, f64::NEG_INFINITY];
        let mut radial_reach: f64 = 0.0;
        for e in &edges {
            radial_reach = radial_reach.max(e.curve.radial_reach());
            let zs: Vec<f64> = match &e.curve {
                EdgeCurve::Line { start, end } => vec![start[2], end[2]],
                EdgeCurve::Circle { center, .. } | EdgeCurve::Arc { center, .. } => vec![center[2]],
            };
            for z in zs {
                z_range[0] = z_range[0].min(z);
                z_range[1] = z_range[1].max(z);
            }
        }
        MockBody {
            name: String::new(),
            faces,
            edges,
            z_range,
            radial_reach,
        }
    }

    /// Union a prism into `target`, merging caps that sit face-to-face with
    /// a target face. Returns the ids the prism's caps ended up with.
    fn join_prism(
        &mut self,
        target: &mut MockBody,
        prism: Prism,
    ) -> Result<(KernelId, KernelId), KernelError> {
        let Prism {
            body: mut tool,
            start,
            end,
            ..
        } = prism;
        let mut cap_ids = [start, end];

        for cap_id in cap_ids.iter_mut() {
            let Some(cap) = tool.faces.iter().find(|f| f.id == *cap_id).cloned() else {
                continue;
            };
            let Some(cap_normal) = cap.normal else {
                continue;
            };
            let mate = target.faces.iter().position(|f| {
                f.normal
                    .map(|n| dot(n, cap_normal) <= -1.0 + 1e-9)
                    .unwrap_or(false)
                    && dot(sub(cap.centroid, f.centroid), cap_normal).abs() <= TOL
            });
            let Some(mate) = mate else {
                continue;
            };

            if norm(sub(cap.centroid, target.faces[mate].centroid)) > TOL {
                return Err(KernelError::NotSupported {
                    operation: "join of non-concentric coplanar faces".to_string(),
                });
            }
            if cap.reach + TOL >= target.faces[mate].extent {
                return Err(KernelError::ExtrudeFailed {
                    reason: format!(
                        "joined profile (reach {:.5}) overhangs target face {:?} (extent {:.5})",
                        cap.reach, target.faces[mate].id, target.faces[mate].extent
                    ),
                });
            }

            let inner = self.new_loop(cap.loops[0].edges.clone());
            let face = &mut target.faces[mate];
            face.loops.push(inner);
            face.extent -= cap.reach;
            face.area -= cap.area;
            tool.faces.retain(|f| f.id != cap.id);
            *cap_id = face.id;
        }

        target.absorb_bounds(&tool);
        target.faces.extend(tool.faces);
        target.edges.extend(tool.edges);
        Ok((cap_ids[0], cap_ids[1]))
    }

    /// Shared chamfer/fillet implementation.
    fn blend(
        &mut self,
        op: MockOp,
        edges: &[KernelId],
        size: f64,
    ) -> Result<FeatureResult, KernelError> {
        let noun = match op {
            MockOp::Chamfer => "chamfer distance",
            _ => "fillet radius",
        };
        let fail = |reason: String| match op {
            MockOp::Chamfer => KernelError::ChamferFailed { reason },
            _ => KernelError::FilletFailed { reason },
        };

        if let Err(reason) = self.enter(op) {
            return Err(fail(reason));
        }
        if edges.is_empty() {
            return Err(fail("no edges selected".to_string()));
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(fail(format!("{} must be positive, got {}", noun, size)));
        }

        let (body_id, _) = self
            .locate_edge(edges[0])
            .ok_or(KernelError::EntityNotFound { id: edges[0] })?;
        let mut body = self
            .bodies
            .get(&body_id)
            .cloned()
            .ok_or(KernelError::StaleHandle { kind: "body", id: body_id })?;

        // Validate every edge before touching anything.
        let mut plan = Vec::with_capacity(edges.len());
        for &eid in edges {
            let edge = body
                .edges
                .iter()
                .find(|e| e.id == eid)
                .cloned()
                .ok_or_else(|| fail(format!("edge {:?} does not belong to the blended body", eid)))?;
            let adjacent: Vec<usize> = body
                .faces
                .iter()
                .enumerate()
                .filter(|(_, f)| f.has_edge(eid))
                .map(|(i, _)| i)
                .collect();
            if adjacent.len() != 2 {
                return Err(fail(format!(
                    "edge {:?} borders {} faces, expected 2",
                    eid,
                    adjacent.len()
                )));
            }
            let mut capacity = body.faces[adjacent[0]]
                .extent
                .min(body.faces[adjacent[1]].extent);
            if let EdgeCurve::Line { .. } = edge.curve {
                capacity = capacity.min(edge.curve.length() / 2.0);
            }
            if size + TOL >= capacity {
                return Err(fail(format!(
                    "{} {:.5} exceeds the available extent {:.5} next to edge {:?}",
                    noun, size, capacity, eid
                )));
            }
            plan.push((edge, adjacent));
        }

        let mut created = Vec::with_capacity(plan.len());
        for (edge, adjacent) in plan {
            let first = self.new_edge(edge.curve.clone());
            let second = self.new_edge(edge.curve.clone());
            let circular = edge.curve.radius().is_some();
            let surface = match (op, circular) {
                (MockOp::Chamfer, true) => SurfaceType::Conical,
                (MockOp::Chamfer, false) => SurfaceType::Planar,
                (_, true) => SurfaceType::Toroidal,
                (_, false) => SurfaceType::Cylindrical,
            };
            let loops = if circular {
                vec![self.new_loop(vec![first.id]), self.new_loop(vec![second.id])]
            } else {
                vec![self.new_loop(vec![first.id, second.id])]
            };
            let width = match op {
                MockOp::Chamfer => size * std::f64::consts::SQRT_2,
                _ => size * PI / 2.0,
            };
            let face = MockFace {
                id: self.alloc_id(),
                surface,
                loops,
                normal: None,
                centroid: edge.curve.centroid(),
                area: edge.curve.length() * width,
                radius: if op == MockOp::Fillet { Some(size) } else { None },
                extent: size,
                reach: size,
                threaded: false,
            };

            for (slot, new_edge) in adjacent.iter().zip([first.id, second.id]) {
                let f = &mut body.faces[*slot];
                f.replace_edge(edge.id, new_edge);
                f.extent -= size;
            }
            body.edges.retain(|e| e.id != edge.id);
            body.edges.push(first);
            body.edges.push(second);
            created.push(face.id);
            body.faces.push(face);
        }

        debug!(?op, size, faces = created.len(), "mock blend applied");
        self.bodies.insert(body_id, body);
        let feature = self.push_feature(MockFeature {
            body: body_id,
            start: Vec::new(),
            end: Vec::new(),
            side: created,
        });
        Ok(FeatureResult {
            feature,
            body: KernelSolidHandle(body_id),
        })
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn create_component(&mut self) -> Result<ComponentHandle, KernelError> {
        self.enter(MockOp::CreateComponent)
            .map_err(|reason| KernelError::ComponentFailed { reason })?;
        let h = self.alloc_handle();
        self.components.insert(h, Vec::new());
        Ok(ComponentHandle(h))
    }

    fn create_sketch(
        &mut self,
        component: &ComponentHandle,
        plane: SketchPlane,
    ) -> Result<SketchHandle, KernelError> {
        self.enter(MockOp::CreateSketch)
            .map_err(|reason| KernelError::SketchFailed { reason })?;
        if !self.components.contains_key(&component.id()) {
            return Err(KernelError::StaleHandle {
                kind: "component",
                id: component.id(),
            });
        }
        let h = self.alloc_handle();
        self.sketches.insert(
            h,
            MockSketch {
                component: component.id(),
                plane,
                curves: Vec::new(),
                profiles: None,
            },
        );
        Ok(SketchHandle(h))
    }

    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        start: Point3,
        end: Point3,
    ) -> Result<(), KernelError> {
        self.add_curve(sketch, SketchCurve::Line { start, end })
    }

    fn add_circle(
        &mut self,
        sketch: &SketchHandle,
        center: Point3,
        radius: f64,
    ) -> Result<(), KernelError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(KernelError::SketchFailed {
                reason: format!("circle radius must be positive, got {}", radius),
            });
        }
        self.add_curve(sketch, SketchCurve::Circle { center, radius })
    }

    fn sketch_profiles(&mut self, sketch: &SketchHandle) -> Result<Vec<KernelId>, KernelError> {
        self.enter(MockOp::SketchProfiles)
            .map_err(|reason| KernelError::SketchFailed { reason })?;
        let sk = self
            .sketches
            .get(&sketch.id())
            .cloned()
            .ok_or(KernelError::StaleHandle {
                kind: "sketch",
                id: sketch.id(),
            })?;
        if let Some(ids) = &sk.profiles {
            return Ok(ids.clone());
        }

        let mut ids = Vec::new();
        for shape in detect_profiles(sk.plane, &sk.curves) {
            let id = self.alloc_id();
            self.profiles.insert(
                id.0,
                MockProfile {
                    component: sk.component,
                    plane: sk.plane,
                    shape,
                },
            );
            ids.push(id);
        }
        if let Some(s) = self.sketches.get_mut(&sketch.id()) {
            s.profiles = Some(ids.clone());
        }
        Ok(ids)
    }

    fn model_to_sketch(&self, sketch: &SketchHandle, point: Point3) -> Result<Point3, KernelError> {
        self.sketches
            .get(&sketch.id())
            .map(|s| s.plane.model_to_sketch(point))
            .ok_or(KernelError::StaleHandle {
                kind: "sketch",
                id: sketch.id(),
            })
    }

    fn extrude(
        &mut self,
        profile: KernelId,
        distance: f64,
        direction: ExtentDirection,
        operation: FeatureOperation,
    ) -> Result<FeatureResult, KernelError> {
        self.enter(MockOp::Extrude)
            .map_err(|reason| KernelError::BodyFailed { reason })?;
        let prof = self
            .profiles
            .get(&profile.0)
            .cloned()
            .ok_or(KernelError::ProfileNotFound { id: profile })?;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(KernelError::ExtrudeFailed {
                reason: format!("extent distance must be positive, got {}", distance),
            });
        }

        let offset = scale(prof.plane.normal(), direction.sign() * distance);
        let prism = self.build_prism(&prof.shape, offset);
        let side = prism.side.clone();

        match operation {
            FeatureOperation::NewBody => {
                let body_id = self.alloc_handle();
                let (start, end) = (prism.start, prism.end);
                let mut body = prism.body;
                body.name = format!("Body{}", self.bodies.len() + 1);
                self.bodies.insert(body_id, body);
                self.components
                    .entry(prof.component)
                    .or_default()
                    .push(body_id);
                let feature = self.push_feature(MockFeature {
                    body: body_id,
                    start: vec![start],
                    end: vec![end],
                    side,
                });
                debug!(?profile, distance, "mock extrude created new body");
                Ok(FeatureResult {
                    feature,
                    body: KernelSolidHandle(body_id),
                })
            }
            FeatureOperation::Join => {
                let body_id = self
                    .components
                    .get(&prof.component)
                    .and_then(|bodies| bodies.last().copied())
                    .ok_or_else(|| KernelError::BodyFailed {
                        reason: "join requires an existing body in the component".to_string(),
                    })?;
                let mut target = self
                    .bodies
                    .get(&body_id)
                    .cloned()
                    .ok_or(KernelError::StaleHandle { kind: "body", id: body_id })?;
                let (start, end) = self.join_prism(&mut target, prism)?;
                self.bodies.insert(body_id, target);
                let feature = self.push_feature(MockFeature {
                    body: body_id,
                    start: vec![start],
                    end: vec![end],
                    side,
                });
                debug!(?profile, distance, "mock extrude joined body");
                Ok(FeatureResult {
                    feature,
                    body: KernelSolidHandle(body_id),
                })
            }
            FeatureOperation::Cut => Err(KernelError::NotSupported {
                operation: "extrude cut".to_string(),
            }),
        }
    }

    fn revolve(
        &mut self,
        profile: KernelId,
        axis: Axis,
        angle: f64,
        operation: FeatureOperation,
    ) -> Result<FeatureResult, KernelError> {
        self.enter(MockOp::Revolve)
            .map_err(|reason| KernelError::RevolveFailed { reason })?;
        let prof = self
            .profiles
            .get(&profile.0)
            .cloned()
            .ok_or(KernelError::ProfileNotFound { id: profile })?;
        if operation != FeatureOperation::Cut {
            return Err(KernelError::NotSupported {
                operation: format!("revolve {:?}", operation),
            });
        }
        if !angle.is_finite() || angle <= 0.0 || angle > TAU + TOL {
            return Err(KernelError::RevolveFailed {
                reason: format!("sweep angle {} outside (0, 2pi]", angle),
            });
        }
        let dir = normalize(axis.direction);
        if dir[2].abs() < 1.0 - 1e-9 || radial(axis.origin) > TOL {
            return Err(KernelError::NotSupported {
                operation: "revolve about an axis other than Z".to_string(),
            });
        }
        let ProfileShape::Polygon(points) = &prof.shape else {
            return Err(KernelError::NotSupported {
                operation: "revolve of a circular profile".to_string(),
            });
        };

        let r_min = points.iter().map(|p| radial(*p)).fold(f64::INFINITY, f64::min);
        let r_max = points.iter().map(|p| radial(*p)).fold(0.0, f64::max);
        let z_min = points.iter().map(|p| p[2]).fold(f64::INFINITY, f64::min);
        let z_max = points.iter().map(|p| p[2]).fold(f64::NEG_INFINITY, f64::max);

        let target = self
            .components
            .get(&prof.component)
            .into_iter()
            .flatten()
            .copied()
            .find(|bid| {
                self.bodies.get(bid).is_some_and(|b| {
                    b.z_range[0] < z_max - TOL
                        && b.z_range[1] > z_min + TOL
                        && b.radial_reach > r_min + TOL
                })
            })
            .ok_or_else(|| KernelError::RevolveFailed {
                reason: "revolved profile does not intersect any body".to_string(),
            })?;

        let mut body = self
            .bodies
            .get(&target)
            .cloned()
            .ok_or(KernelError::StaleHandle { kind: "body", id: target })?;

        // One trimming arc per planar side face crossed by the cut.
        let crossed: Vec<KernelId> = body
            .faces
            .iter()
            .filter(|f| {
                f.surface == SurfaceType::Planar
                    && f.normal.is_some_and(|n| n[2].abs() < TOL)
            })
            .map(|f| f.id)
            .collect();
        let arc_count = crossed.len().max(1);
        let mid_radius = 0.5 * (r_min + r_max);
        let mid_z = 0.5 * (z_min + z_max);
        let arcs: Vec<MockEdge> = (0..arc_count)
            .map(|_| {
                self.new_edge(EdgeCurve::Arc {
                    center: [0.0, 0.0, mid_z],
                    radius: mid_radius,
                    sweep: angle / arc_count as f64,
                })
            })
            .collect();
        for (face_id, arc) in crossed.iter().zip(&arcs) {
            if let Some(f) = body.face_mut(*face_id) {
                if let Some(outer) = f.loops.first_mut() {
                    outer.edges.push(arc.id);
                }
            }
        }

        let slant = ((r_max - r_min).powi(2) + (z_max - z_min).powi(2)).sqrt();
        let cone_loop = self.new_loop(arcs.iter().map(|e| e.id).collect());
        let cone = MockFace {
            id: self.alloc_id(),
            surface: SurfaceType::Conical,
            loops: vec![cone_loop],
            normal: None,
            centroid: [0.0, 0.0, mid_z],
            area: PI * (r_min + r_max) * slant * angle / TAU,
            radius: None,
            extent: slant / 2.0,
            reach: r_max,
            threaded: false,
        };
        let cone_id = cone.id;
        body.faces.push(cone);
        body.edges.extend(arcs);
        self.bodies.insert(target, body);

        debug!(?profile, r_min, r_max, z_min, z_max, "mock revolve cut applied");
        let feature = self.push_feature(MockFeature {
            body: target,
            start: Vec::new(),
            end: Vec::new(),
            side: vec![cone_id],
        });
        Ok(FeatureResult {
            feature,
            body: KernelSolidHandle(target),
        })
    }

    fn chamfer_edges(
        &mut self,
        edges: &[KernelId],
        distance: f64,
    ) -> Result<FeatureResult, KernelError> {
        self.blend(MockOp::Chamfer, edges, distance)
    }

    fn fillet_edges(
        &mut self,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<FeatureResult, KernelError> {
        self.blend(MockOp::Fillet, edges, radius)
    }

    fn set_body_name(&mut self, body: &KernelSolidHandle, name: &str) -> Result<(), KernelError> {
        self.enter(MockOp::SetBodyName)
            .map_err(|message| KernelError::Other { message })?;
        let b = self
            .bodies
            .get_mut(&body.id())
            .ok_or(KernelError::StaleHandle { kind: "body", id: body.id() })?;
        b.name = name.to_string();
        Ok(())
    }

    fn apply_thread(
        &mut self,
        face: KernelId,
        spec: &ThreadSpec,
    ) -> Result<FeatureResult, KernelError> {
        self.enter(MockOp::ApplyThread)
            .map_err(|reason| KernelError::ThreadFailed { reason })?;
        let (body_id, f) = self
            .locate_face(face)
            .ok_or(KernelError::EntityNotFound { id: face })?;
        if f.surface != SurfaceType::Cylindrical {
            return Err(KernelError::ThreadFailed {
                reason: format!("face {:?} is {:?}, not cylindrical", face, f.surface),
            });
        }
        let diameter = 2.0 * f.radius.unwrap_or(0.0);
        if (diameter - spec.nominal_diameter).abs() > spec.nominal_diameter * 0.02 + TOL {
            return Err(KernelError::ThreadFailed {
                reason: format!(
                    "thread {} does not fit a cylinder of diameter {:.5}",
                    spec.designation, diameter
                ),
            });
        }
        if f.threaded {
            return Err(KernelError::ThreadFailed {
                reason: format!("face {:?} is already threaded", face),
            });
        }

        if let Some(f) = self.bodies.get_mut(&body_id).and_then(|b| b.face_mut(face)) {
            f.threaded = true;
        }
        let feature = self.push_feature(MockFeature {
            body: body_id,
            start: Vec::new(),
            end: Vec::new(),
            side: vec![face],
        });
        Ok(FeatureResult {
            feature,
            body: KernelSolidHandle(body_id),
        })
    }
}

impl MockKernel {
    fn add_curve(&mut self, sketch: &SketchHandle, curve: SketchCurve) -> Result<(), KernelError> {
        self.enter(MockOp::AddCurve)
            .map_err(|reason| KernelError::SketchFailed { reason })?;
        let sk = self
            .sketches
            .get_mut(&sketch.id())
            .ok_or(KernelError::StaleHandle {
                kind: "sketch",
                id: sketch.id(),
            })?;
        sk.curves.push(curve);
        if let Some(stale) = sk.profiles.take() {
            for id in stale {
                self.profiles.remove(&id.0);
            }
        }
        Ok(())
    }
}

impl KernelIntrospect for MockKernel {
    fn feature_faces(&self, feature: &FeatureHandle, group: FaceGroup) -> Vec<KernelId> {
        let Some(f) = self.features.get(&feature.id()) else {
            return Vec::new();
        };
        let ids = match group {
            FaceGroup::Start => &f.start,
            FaceGroup::End => &f.end,
            FaceGroup::Side => &f.side,
        };
        let Some(body) = self.bodies.get(&f.body) else {
            return Vec::new();
        };
        ids.iter()
            .copied()
            .filter(|id| body.faces.iter().any(|face| face.id == *id))
            .collect()
    }

    fn face_loops(&self, face: KernelId) -> Vec<KernelId> {
        self.locate_face(face)
            .map(|(_, f)| f.loops.iter().map(|l| l.id).collect())
            .unwrap_or_default()
    }

    fn loop_edges(&self, loop_id: KernelId) -> Vec<KernelId> {
        self.locate_loop(loop_id)
            .map(|l| l.edges.clone())
            .unwrap_or_default()
    }

    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        self.locate_face(face)
            .map(|(_, f)| f.loops.iter().flat_map(|l| l.edges.iter().copied()).collect())
            .unwrap_or_default()
    }

    fn face_body(&self, face: KernelId) -> Option<KernelSolidHandle> {
        self.locate_face(face).map(|(bid, _)| KernelSolidHandle(bid))
    }

    fn list_faces(&self, body: &KernelSolidHandle) -> Vec<KernelId> {
        self.bodies
            .get(&body.id())
            .map(|b| b.faces.iter().map(|f| f.id).collect())
            .unwrap_or_default()
    }

    fn list_edges(&self, body: &KernelSolidHandle) -> Vec<KernelId> {
        self.bodies
            .get(&body.id())
            .map(|b| b.edges.iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    fn component_bodies(&self, component: &ComponentHandle) -> Vec<KernelSolidHandle> {
        self.components
            .get(&component.id())
            .map(|ids| ids.iter().map(|id| KernelSolidHandle(*id)).collect())
            .unwrap_or_default()
    }

    fn body_name(&self, body: &KernelSolidHandle) -> Option<String> {
        self.bodies.get(&body.id()).map(|b| b.name.clone())
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        match kind {
            TopoKind::Face => match self.locate_face(entity) {
                Some((_, f)) => TopoSignature {
                    surface_type: Some(f.surface),
                    area: Some(f.area),
                    centroid: Some(f.centroid),
                    normal: f.normal,
                    radius: f.radius,
                    length: None,
                },
                None => TopoSignature::empty(),
            },
            TopoKind::Edge => match self.locate_edge(entity) {
                Some((_, e)) => TopoSignature {
                    surface_type: Some(match e.curve {
                        EdgeCurve::Line { .. } => SurfaceType::Linear,
                        _ => SurfaceType::Circular,
                    }),
                    area: None,
                    centroid: Some(e.curve.centroid()),
                    normal: None,
                    radius: e.curve.radius(),
                    length: Some(e.curve.length()),
                },
                None => TopoSignature::empty(),
            },
            TopoKind::Loop => match self.locate_loop(entity) {
                Some(l) => {
                    let length: f64 = l
                        .edges
                        .iter()
                        .filter_map(|id| self.locate_edge(*id))
                        .map(|(_, e)| e.curve.length())
                        .sum();
                    TopoSignature {
                        length: Some(length),
                        ..TopoSignature::empty()
                    }
                }
                None => TopoSignature::empty(),
            },
            TopoKind::Vertex | TopoKind::Body => TopoSignature::empty(),
        }
    }
}

impl ThreadQuery for MockKernel {
    fn default_thread_type(&self) -> String {
        self.thread_table.thread_type().to_string()
    }

    fn recommend_thread(
        &self,
        diameter: f64,
        is_internal: bool,
        thread_type: &str,
    ) -> Option<ThreadSpec> {
        self.thread_table.lookup(diameter, is_internal, thread_type)
    }
}

/// Find closed profiles among a sketch's curves, in drawing order.
/// Circles stand alone; lines are chained end-to-end into polygons.
/// Open chains and zero-area polygons produce no profile.
fn detect_profiles(plane: SketchPlane, curves: &[SketchCurve]) -> Vec<ProfileShape> {
    let mut shapes = Vec::new();
    let mut used = vec![false; curves.len()];

    for i in 0..curves.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        match &curves[i] {
            SketchCurve::Circle { center, radius } => {
                shapes.push(ProfileShape::Circle {
                    center: plane.sketch_to_model(*center),
                    radius: *radius,
                });
            }
            SketchCurve::Line { start, end } => {
                let mut chain = vec![*start];
                let mut cursor = *end;
                let mut closed = false;
                loop {
                    if close(cursor, chain[0]) {
                        closed = true;
                        break;
                    }
                    let next = (0..curves.len()).find(|&j| {
                        !used[j]
                            && line_ends(&curves[j])
                                .is_some_and(|(s, e)| close(s, cursor) || close(e, cursor))
                    });
                    let Some((j, (s, e))) = next.and_then(|j| line_ends(&curves[j]).map(|ends| (j, ends)))
                    else {
                        break;
                    };
                    used[j] = true;
                    chain.push(cursor);
                    cursor = if close(s, cursor) { e } else { s };
                }
                if closed && chain.len() >= 3 && polygon_area_2d(&chain) > TOL {
                    shapes.push(ProfileShape::Polygon(
                        chain.into_iter().map(|p| plane.sketch_to_model(p)).collect(),
                    ));
                }
            }
        }
    }
    shapes
}

fn line_ends(curve: &SketchCurve) -> Option<(Point3, Point3)> {
    match curve {
        SketchCurve::Line { start, end } => Some((*start, *end)),
        SketchCurve::Circle { .. } => None,
    }
}

fn close(a: Point3, b: Point3) -> bool {
    norm(sub(a, b)) <= TOL
}

/// Shoelace area in the sketch's XY frame.
fn polygon_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum();
    twice.abs() / 2.0
}

/// Newell area of a planar polygon in model space.
fn polygon_area_3d(points: &[Point3]) -> f64 {
    let n = points.len();
    let mut acc = [0.0; 3];
    for i in 0..n {
        acc = add(acc, cross(points[i], points[(i + 1) % n]));
    }
    norm(acc) / 2.0
}

fn centroid(points: &[Point3]) -> Point3 {
    let sum = points.iter().fold([0.0; 3], |acc, p| add(acc, *p));
    scale(sum, 1.0 / points.len() as f64)
}

fn point_segment_distance(p: Point3, a: Point3, b: Point3) -> f64 {
    let ab = sub(b, a);
    let len2 = dot(ab, ab);
    if len2 <= f64::EPSILON {
        return norm(sub(p, a));
    }
    let t = (dot(sub(p, a), ab) / len2).clamp(0.0, 1.0);
    norm(sub(p, add(a, scale(ab, t))))
}

/// Distance from the Z axis.
fn radial(p: Point3) -> f64 {
    (p[0] * p[0] + p[1] * p[1]).sqrt()
}

fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: Point3) -> f64 {
    dot(a, a).sqrt()
}

fn normalize(a: Point3) -> Point3 {
    let len = norm(a);
    if len > 1e-12 {
        scale(a, 1.0 / len)
    } else {
        [0.0, 0.0, 1.0]
    }
}
