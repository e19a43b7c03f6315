//! Scene abstraction consumed by the tools.
//!
//! The tools never own shapes. They read bounds, outlines and paints from the
//! host scene and write geometry and paint changes back through
//! [`SceneAdapter`]. [`MemoryScene`] is a small in-memory implementation for
//! tests and hosts without a scene graph of their own.

mod memory;

pub use memory::{MemoryScene, MemoryShape};

use crate::geometry;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use uuid::Uuid;

/// Unique identifier for shapes in the host scene.
pub type ShapeId = Uuid;

/// Structural kind of a scene item, as far as hit promotion cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A single open or closed path.
    Path,
    /// A path made of several sub-paths that is selected as one.
    CompoundPath,
    /// A container of other items.
    Group,
    /// A bitmap image.
    Raster,
}

/// Hit type as reported by the scene's raw pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawHitKind {
    Fill,
    Stroke,
    Curve,
    Pixel,
}

/// A raw pick result before the classifier's promotion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHit {
    pub shape: ShapeId,
    pub kind: RawHitKind,
}

/// Which paint slot of a shape is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaintTarget {
    #[default]
    Fill,
    Stroke,
}

/// A gradient paint as written onto a shape.
#[derive(Debug, Clone)]
pub struct GradientDescriptor {
    /// `(color, offset)` pairs in editing order, not necessarily sorted.
    pub stops: Vec<(Color, f64)>,
    pub radial: bool,
    pub origin: Point,
    pub destination: Point,
}

impl GradientDescriptor {
    /// Stops ordered by offset, for renderers that require it.
    pub fn sorted_stops(&self) -> Vec<(Color, f64)> {
        let mut stops = self.stops.clone();
        stops.sort_by(|a, b| a.1.total_cmp(&b.1));
        stops
    }

    pub fn same_as(&self, other: &GradientDescriptor) -> bool {
        self.radial == other.radial
            && self.origin == other.origin
            && self.destination == other.destination
            && self.stops.len() == other.stops.len()
            && self
                .stops
                .iter()
                .zip(&other.stops)
                .all(|(a, b)| a.1 == b.1 && a.0.components == b.0.components)
    }
}

/// Fill or stroke paint of a shape.
#[derive(Debug, Clone)]
pub enum Paint {
    Solid(Color),
    Gradient(GradientDescriptor),
}

impl Paint {
    pub fn as_gradient(&self) -> Option<&GradientDescriptor> {
        match self {
            Paint::Gradient(g) => Some(g),
            Paint::Solid(_) => None,
        }
    }

    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Paint::Solid(c) => Some(*c),
            Paint::Gradient(_) => None,
        }
    }

    /// Structural equality (colors compared component-wise).
    pub fn same_as(&self, other: &Paint) -> bool {
        match (self, other) {
            (Paint::Solid(a), Paint::Solid(b)) => a.components == b.components,
            (Paint::Gradient(a), Paint::Gradient(b)) => a.same_as(b),
            _ => false,
        }
    }
}

/// Host scene operations used by the transform widget and gradient editor.
///
/// Ids that no longer exist are ignored by mutators and yield `None` from
/// accessors; a missing shape is never an error for the tools.
pub trait SceneAdapter {
    /// Topmost item under `point` within `tolerance`, skipping ids rejected by `filter`.
    fn pick(
        &self,
        point: Point,
        tolerance: f64,
        filter: &dyn Fn(ShapeId) -> bool,
    ) -> Option<RawHit>;

    /// Check if an item exists.
    fn contains(&self, id: ShapeId) -> bool;

    fn kind(&self, id: ShapeId) -> Option<ShapeKind>;

    /// Parent item, `None` for top-level items.
    fn parent(&self, id: ShapeId) -> Option<ShapeId>;

    /// Axis-aligned bounds in world coordinates.
    fn bounds(&self, id: ShapeId) -> Option<Rect>;

    /// Reference position of an item (its bounds center).
    fn position(&self, id: ShapeId) -> Option<Point> {
        self.bounds(id).map(|b| b.center())
    }

    /// A detached copy of the item's outline in world coordinates.
    fn outline(&self, id: ShapeId) -> Option<BezPath>;

    /// Apply an arbitrary affine in world coordinates.
    fn transform(&mut self, id: ShapeId, affine: Affine);

    fn translate(&mut self, id: ShapeId, delta: Vec2) {
        self.transform(id, Affine::translate(delta));
    }

    /// Rotate by `degrees` around `pivot`.
    fn rotate(&mut self, id: ShapeId, degrees: f64, pivot: Point) {
        self.transform(id, geometry::rotate_about(degrees, pivot));
    }

    /// Scale by `factor` around `pivot`.
    fn scale(&mut self, id: ShapeId, factor: Vec2, pivot: Point) {
        self.transform(id, geometry::scale_about(factor, pivot));
    }

    fn fill_paint(&self, id: ShapeId) -> Option<Paint>;

    fn stroke_paint(&self, id: ShapeId) -> Option<Paint>;

    fn set_fill_paint(&mut self, id: ShapeId, paint: Paint);

    fn set_stroke_paint(&mut self, id: ShapeId, paint: Paint);

    fn paint(&self, id: ShapeId, target: PaintTarget) -> Option<Paint> {
        match target {
            PaintTarget::Fill => self.fill_paint(id),
            PaintTarget::Stroke => self.stroke_paint(id),
        }
    }

    fn set_paint(&mut self, id: ShapeId, target: PaintTarget, paint: Paint) {
        match target {
            PaintTarget::Fill => self.set_fill_paint(id, paint),
            PaintTarget::Stroke => self.set_stroke_paint(id, paint),
        }
    }
}
