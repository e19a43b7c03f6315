//! Handle definitions for the transform widget.

use crate::error::{WidgetError, WidgetResult};
use crate::geometry;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Position of this corner on `rect`.
    pub fn point(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Orientation of the rotation hot-zone at this corner, in degrees.
    pub fn hotspot_angle(self) -> f64 {
        match self {
            Corner::TopRight => 0.0,
            Corner::BottomRight => 90.0,
            Corner::BottomLeft => 180.0,
            Corner::TopLeft => 270.0,
        }
    }
}

/// Edge midpoint positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Midpoint of this edge on `rect`.
    pub fn point(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Edge::Top => Point::new(c.x, rect.y0),
            Edge::Right => Point::new(rect.x1, c.y),
            Edge::Bottom => Point::new(c.x, rect.y1),
            Edge::Left => Point::new(rect.x0, c.y),
        }
    }

    /// Top and left edges anchor on the bottom-right corner.
    pub fn is_top_left(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }

    /// Top and bottom edges move vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// What a handle does when grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner scale handle.
    Corner(Corner),
    /// Edge midpoint scale/skew handle.
    Edge(Edge),
    /// Rotation hot-zone outside a corner.
    Rotation(Corner),
    /// Pivot marker (display only).
    Pivot,
}

/// A circular widget handle.
#[derive(Debug, Clone)]
pub struct Handle {
    pub kind: HandleKind,
    /// Position in world coordinates.
    pub center: Point,
    /// Radius in world units (already divided by zoom).
    pub radius: f64,
    pub stroke_width: f64,
    pub fill: Color,
    pub stroke: Color,
}

impl Handle {
    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let reach = self.radius + tolerance;
        dx * dx + dy * dy <= reach * reach
    }

    pub fn path(&self) -> BezPath {
        Circle::new(self.center, self.radius).to_path(0.1)
    }

    fn transformed(mut self, affine: Affine) -> Self {
        self.center = affine * self.center;
        self
    }
}

/// Builder for [`Handle`] that rejects incomplete definitions.
#[derive(Debug, Clone, Default)]
pub struct HandleBuilder {
    kind: Option<HandleKind>,
    center: Option<Point>,
    radius: f64,
    stroke_width: f64,
    fill: Option<Color>,
    stroke: Option<Color>,
}

impl HandleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: HandleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn build(self) -> WidgetResult<Handle> {
        let missing = |name: &'static str| {
            log::error!("handle builder: {name} is required");
            WidgetError::MissingArgument(name)
        };
        Ok(Handle {
            kind: self.kind.ok_or_else(|| missing("kind"))?,
            center: self.center.ok_or_else(|| missing("center"))?,
            radius: self.radius,
            stroke_width: self.stroke_width,
            fill: self.fill.ok_or_else(|| missing("fill"))?,
            stroke: self.stroke.ok_or_else(|| missing("stroke"))?,
        })
    }
}

/// An "L"-shaped rotation hot-zone wrapped around a box corner.
#[derive(Debug, Clone)]
pub struct RotationHotspot {
    pub corner: Corner,
    /// Outline in world coordinates.
    pub path: BezPath,
    pub fill: Color,
}

impl RotationHotspot {
    /// Build the hot-zone for `corner` placed at `at`, covering the three
    /// quadrants around the corner that lie outside the box.
    pub fn new(corner: Corner, at: Point, radius: f64, fill: Color) -> Self {
        let r = radius;
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.0, r));
        path.line_to((r, r));
        path.line_to((r, -r));
        path.line_to((-r, -r));
        path.line_to((-r, 0.0));
        path.close_path();
        path.apply_affine(
            Affine::translate(at.to_vec2()) * Affine::rotate(corner.hotspot_angle().to_radians()),
        );
        Self { corner, path, fill }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.path.contains(point)
    }

    fn transformed(mut self, affine: Affine) -> Self {
        self.path.apply_affine(affine);
        self
    }
}

/// All pickable and display geometry of a built widget, in world coordinates.
#[derive(Debug, Clone)]
pub struct WidgetGui {
    pub border: BezPath,
    /// One bounding rectangle per item, only when several items are selected.
    pub item_outlines: Vec<BezPath>,
    /// Stroke of the border and the item outlines.
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub hotspots: Vec<RotationHotspot>,
    /// Corner handles followed by edge handles.
    pub handles: Vec<Handle>,
    /// Pivot marker, never rotated and never picked.
    pub pivot: Handle,
}

impl WidgetGui {
    /// Rotate everything but the pivot marker by `degrees` around `center`.
    pub(crate) fn rotated(self, degrees: f64, center: Point) -> Self {
        let affine = geometry::rotate_about(degrees, center);
        let mut border = self.border;
        border.apply_affine(affine);
        Self {
            border,
            item_outlines: self
                .item_outlines
                .into_iter()
                .map(|mut p| {
                    p.apply_affine(affine);
                    p
                })
                .collect(),
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            hotspots: self
                .hotspots
                .into_iter()
                .map(|h| h.transformed(affine))
                .collect(),
            handles: self
                .handles
                .into_iter()
                .map(|h| h.transformed(affine))
                .collect(),
            pivot: self.pivot,
        }
    }

    /// Handle or hot-zone under `point`. Handles sit above hot-zones, and
    /// later elements above earlier ones.
    pub fn pick(&self, point: Point, tolerance: f64) -> Option<HandleKind> {
        self.handles
            .iter()
            .rev()
            .find(|h| h.hit_test(point, tolerance))
            .map(|h| h.kind)
            .or_else(|| {
                self.hotspots
                    .iter()
                    .rev()
                    .find(|h| h.contains(point))
                    .map(|h| HandleKind::Rotation(h.corner))
            })
    }
}
