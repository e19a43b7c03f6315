//! In-memory scene implementation.

use super::{Paint, RawHit, RawHitKind, SceneAdapter, ShapeId, ShapeKind};
use kurbo::{Affine, BezPath, ParamCurveNearest, Point, Rect, Shape as KurboShape};
use peniko::Color;
use std::collections::HashMap;
use uuid::Uuid;

/// Curve accuracy used for stroke distance queries.
const NEAREST_ACCURACY: f64 = 1e-6;

/// A scene item held by [`MemoryScene`].
#[derive(Debug, Clone)]
pub struct MemoryShape {
    pub(crate) id: ShapeId,
    pub kind: ShapeKind,
    /// Local geometry (empty for groups and compound paths).
    pub path: BezPath,
    /// Accumulated transform applied to `path`.
    pub transform: Affine,
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub stroke_width: f64,
    pub parent: Option<ShapeId>,
    pub children: Vec<ShapeId>,
}

impl MemoryShape {
    fn leaf(kind: ShapeKind, path: BezPath) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            path,
            transform: Affine::IDENTITY,
            fill: Some(Paint::Solid(Color::BLACK)),
            stroke: None,
            stroke_width: 1.0,
            parent: None,
            children: Vec::new(),
        }
    }

    fn container(kind: ShapeKind, children: Vec<ShapeId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            path: BezPath::new(),
            transform: Affine::IDENTITY,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            parent: None,
            children,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    fn is_container(&self) -> bool {
        matches!(self.kind, ShapeKind::Group | ShapeKind::CompoundPath)
    }
}

/// In-memory scene for testing and hosts without their own scene graph.
///
/// Top-level items are kept back to front in `z_order`; children of groups and
/// compound paths are reachable only through their parent.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    shapes: HashMap<ShapeId, MemoryShape>,
    z_order: Vec<ShapeId>,
}

impl MemoryScene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, shape: MemoryShape) -> ShapeId {
        let id = shape.id;
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Add a filled path on top of the scene.
    pub fn add_path(&mut self, path: BezPath) -> ShapeId {
        self.insert(MemoryShape::leaf(ShapeKind::Path, path))
    }

    /// Add a filled rectangle on top of the scene.
    pub fn add_rect(&mut self, rect: Rect) -> ShapeId {
        self.add_path(rect.to_path(0.1))
    }

    /// Add a raster image occupying `rect`.
    pub fn add_raster(&mut self, rect: Rect) -> ShapeId {
        self.insert(MemoryShape::leaf(ShapeKind::Raster, rect.to_path(0.1)))
    }

    /// Add a compound path built from `paths`. The sub-paths share the
    /// compound's paint.
    pub fn add_compound(&mut self, paths: Vec<BezPath>) -> ShapeId {
        let mut compound = MemoryShape::container(ShapeKind::CompoundPath, Vec::new());
        compound.fill = Some(Paint::Solid(Color::BLACK));
        let compound_id = compound.id;
        for path in paths {
            let mut child = MemoryShape::leaf(ShapeKind::Path, path);
            child.fill = None;
            child.parent = Some(compound_id);
            compound.children.push(child.id);
            self.shapes.insert(child.id, child);
        }
        self.insert(compound)
    }

    /// Wrap existing items in a new group placed on top of the scene.
    pub fn group(&mut self, children: &[ShapeId]) -> ShapeId {
        let group = MemoryShape::container(ShapeKind::Group, children.to_vec());
        let group_id = group.id;
        for &child in children {
            self.detach(child);
            if let Some(shape) = self.shapes.get_mut(&child) {
                shape.parent = Some(group_id);
            }
        }
        self.insert(group)
    }

    /// Remove an item from wherever it currently lives in the hierarchy.
    fn detach(&mut self, id: ShapeId) {
        self.z_order.retain(|&z| z != id);
        let parent = self.shapes.get(&id).and_then(|s| s.parent);
        if let Some(parent) = parent.and_then(|p| self.shapes.get_mut(&p)) {
            parent.children.retain(|&c| c != id);
        }
    }

    /// Remove an item and its descendants.
    pub fn remove(&mut self, id: ShapeId) -> Option<MemoryShape> {
        self.detach(id);
        let shape = self.shapes.remove(&id)?;
        for child in &shape.children {
            self.remove_subtree(*child);
        }
        Some(shape)
    }

    fn remove_subtree(&mut self, id: ShapeId) {
        if let Some(shape) = self.shapes.remove(&id) {
            for child in shape.children {
                self.remove_subtree(child);
            }
        }
    }

    pub fn shape(&self, id: ShapeId) -> Option<&MemoryShape> {
        self.shapes.get(&id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut MemoryShape> {
        self.shapes.get_mut(&id)
    }

    /// Give an item a stroke, or remove it with `None`.
    pub fn set_stroke(&mut self, id: ShapeId, paint: Option<Paint>, width: f64) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.stroke = paint;
            shape.stroke_width = width;
        }
    }

    /// Remove an item's fill.
    pub fn clear_fill(&mut self, id: ShapeId) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.fill = None;
        }
    }

    /// Top-level items, back to front.
    pub fn top_level(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Geometry of an item in world coordinates.
    pub fn world_path(&self, id: ShapeId) -> Option<BezPath> {
        let shape = self.shapes.get(&id)?;
        if shape.is_container() {
            let mut path = BezPath::new();
            for child in &shape.children {
                if let Some(child_path) = self.world_path(*child) {
                    path.extend(child_path);
                }
            }
            Some(path)
        } else {
            let mut path = shape.path.clone();
            path.apply_affine(shape.transform);
            Some(path)
        }
    }

    /// Fill used when hit-testing a leaf; sub-paths inherit from a compound parent.
    fn effective_fill<'a>(&'a self, shape: &'a MemoryShape) -> Option<&'a Paint> {
        shape.fill.as_ref().or_else(|| {
            let parent = self.shapes.get(&shape.parent?)?;
            if parent.kind == ShapeKind::CompoundPath {
                parent.fill.as_ref()
            } else {
                None
            }
        })
    }

    fn effective_stroke<'a>(&'a self, shape: &'a MemoryShape) -> Option<(&'a Paint, f64)> {
        if let Some(stroke) = shape.stroke.as_ref() {
            return Some((stroke, shape.stroke_width));
        }
        let parent = self.shapes.get(&shape.parent?)?;
        if parent.kind == ShapeKind::CompoundPath {
            parent.stroke.as_ref().map(|s| (s, parent.stroke_width))
        } else {
            None
        }
    }

    fn pick_item(
        &self,
        id: ShapeId,
        point: Point,
        tolerance: f64,
        filter: &dyn Fn(ShapeId) -> bool,
    ) -> Option<RawHit> {
        let shape = self.shapes.get(&id)?;
        if !filter(id) {
            return None;
        }
        match shape.kind {
            ShapeKind::Group | ShapeKind::CompoundPath => shape
                .children
                .iter()
                .rev()
                .find_map(|child| self.pick_item(*child, point, tolerance, filter)),
            ShapeKind::Raster => {
                let bounds = self.world_path(id)?.bounding_box();
                bounds
                    .inflate(tolerance, tolerance)
                    .contains(point)
                    .then_some(RawHit {
                        shape: id,
                        kind: RawHitKind::Pixel,
                    })
            }
            ShapeKind::Path => {
                let path = self.world_path(id)?;
                if let Some((_, width)) = self.effective_stroke(shape) {
                    if distance_to_path(&path, point) <= width / 2.0 + tolerance {
                        return Some(RawHit {
                            shape: id,
                            kind: RawHitKind::Stroke,
                        });
                    }
                }
                if self.effective_fill(shape).is_some() && path.contains(point) {
                    return Some(RawHit {
                        shape: id,
                        kind: RawHitKind::Fill,
                    });
                }
                None
            }
        }
    }
}

/// Shortest distance from `point` to any segment of `path`.
pub(crate) fn distance_to_path(path: &BezPath, point: Point) -> f64 {
    path.segments()
        .map(|seg| seg.nearest(point, NEAREST_ACCURACY).distance_sq)
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

impl SceneAdapter for MemoryScene {
    fn pick(
        &self,
        point: Point,
        tolerance: f64,
        filter: &dyn Fn(ShapeId) -> bool,
    ) -> Option<RawHit> {
        self.z_order
            .iter()
            .rev()
            .find_map(|id| self.pick_item(*id, point, tolerance, filter))
    }

    fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    fn kind(&self, id: ShapeId) -> Option<ShapeKind> {
        self.shapes.get(&id).map(|s| s.kind)
    }

    fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.shapes.get(&id).and_then(|s| s.parent)
    }

    fn bounds(&self, id: ShapeId) -> Option<Rect> {
        self.world_path(id).map(|p| p.bounding_box())
    }

    fn outline(&self, id: ShapeId) -> Option<BezPath> {
        self.world_path(id)
    }

    fn transform(&mut self, id: ShapeId, affine: Affine) {
        let children = match self.shapes.get_mut(&id) {
            Some(shape) if shape.is_container() => shape.children.clone(),
            Some(shape) => {
                shape.transform = affine * shape.transform;
                return;
            }
            None => return,
        };
        for child in children {
            self.transform(child, affine);
        }
    }

    fn fill_paint(&self, id: ShapeId) -> Option<Paint> {
        self.shapes.get(&id).and_then(|s| s.fill.clone())
    }

    fn stroke_paint(&self, id: ShapeId) -> Option<Paint> {
        self.shapes.get(&id).and_then(|s| s.stroke.clone())
    }

    fn set_fill_paint(&mut self, id: ShapeId, paint: Paint) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.fill = Some(paint);
        }
    }

    fn set_stroke_paint(&mut self, id: ShapeId, paint: Paint) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.stroke = Some(paint);
        }
    }
}
