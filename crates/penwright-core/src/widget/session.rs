//! Drag session state of the transform widget.
//!
//! A session is created once when a drag starts and owns everything the drag
//! needs: the initial pointer, the pivot and box rotation at the time of the
//! grab, the box in the pivot-aligned frame, and the ghost preview. Every
//! update recomputes the transform from those initial values, so repeated
//! pointer moves never accumulate rounding drift.

use super::handles::{Corner, Edge, HandleKind};
use crate::config::{SerializableColor, TransformMode, WidgetConfig};
use crate::error::WidgetError;
use crate::geometry::{self, EPSILON};
use crate::input::Modifiers;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use std::fmt;
use std::str::FromStr;

/// Coarse kind of transformation, as chosen by the grabbed handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Translate,
    Scale,
    Rotate,
}

impl TransformKind {
    /// Kind selected by grabbing `handle`; anything that is not a handle translates.
    pub fn for_handle(handle: Option<HandleKind>) -> Self {
        match handle {
            Some(HandleKind::Rotation(_)) => TransformKind::Rotate,
            Some(HandleKind::Corner(_) | HandleKind::Edge(_)) => TransformKind::Scale,
            Some(HandleKind::Pivot) | None => TransformKind::Translate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Translate => "translate",
            TransformKind::Scale => "scale",
            TransformKind::Rotate => "rotate",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translate" => Ok(TransformKind::Translate),
            "scale" => Ok(TransformKind::Scale),
            "rotate" => Ok(TransformKind::Rotate),
            other => Err(WidgetError::InvalidAction(other.to_string())),
        }
    }
}

/// Concrete action of a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Translate,
    Rotate,
    MoveEdge(Edge),
    MoveCorner(Corner),
}

impl SessionAction {
    /// Refine a transform kind with the grabbed handle. A scale without a
    /// scale handle has no meaningful action.
    pub fn classify(kind: TransformKind, handle: Option<HandleKind>) -> Option<Self> {
        match kind {
            TransformKind::Translate => Some(SessionAction::Translate),
            TransformKind::Rotate => Some(SessionAction::Rotate),
            TransformKind::Scale => match handle {
                Some(HandleKind::Edge(edge)) => Some(SessionAction::MoveEdge(edge)),
                Some(HandleKind::Corner(corner)) => Some(SessionAction::MoveCorner(corner)),
                _ => None,
            },
        }
    }
}

/// Mode flags after modifier keys are taken into account.
///
/// Each modifier toggles the mode default rather than forcing it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveModifiers {
    /// Edge handles shear (mode skews XOR command).
    pub skew: bool,
    /// Scale around the shared pivot (alt not held).
    pub center: bool,
    /// Axes scale independently, no 45 degree snapping (mode XOR shift).
    pub freescale: bool,
    /// Shearing also scales (skew-scale mode XOR shift).
    pub skewscale: bool,
}

impl EffectiveModifiers {
    pub fn resolve(mode: TransformMode, modifiers: Modifiers) -> Self {
        Self {
            skew: mode.skews() != modifiers.command,
            center: !modifiers.alt,
            freescale: mode.scales_freely() != modifiers.shift,
            skewscale: mode.skew_scales() != modifiers.shift,
        }
    }
}

/// One stroke of the ghost preview.
#[derive(Debug, Clone)]
pub struct GhostStroke {
    pub path: BezPath,
    pub color: Color,
    pub width: f64,
}

/// Live preview of a drag: detached outline snapshots plus the transform
/// computed so far. Never attached to the scene.
#[derive(Debug, Clone)]
pub struct Ghost {
    /// Item outlines in world coordinates at the start of the drag.
    pub outlines: Vec<BezPath>,
    /// The widget box at the start of the drag.
    pub bounds_outline: BezPath,
    /// Transform to apply to every outline.
    pub transform: Affine,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Ghost {
    pub(crate) fn new(outlines: Vec<BezPath>, bounds_outline: BezPath, config: &WidgetConfig) -> Self {
        Self {
            outlines,
            bounds_outline,
            transform: Affine::IDENTITY,
            stroke_color: config.ghost_stroke_color.into(),
            stroke_width: config.ghost_stroke_width,
            opacity: config.ghost_opacity,
        }
    }

    /// Transformed strokes in drawing order. Each item is drawn as a wide
    /// ghost-colored stroke under a thin white one so it reads on any
    /// background; the box outline comes last.
    pub fn strokes(&self) -> Vec<GhostStroke> {
        let white: Color = SerializableColor::white().into();
        let mut strokes = Vec::with_capacity(self.outlines.len() * 2 + 1);
        for outline in &self.outlines {
            let path = self.transform * outline.clone();
            strokes.push(GhostStroke {
                path: path.clone(),
                color: self.stroke_color,
                width: self.stroke_width * 2.0,
            });
            strokes.push(GhostStroke {
                path,
                color: white,
                width: self.stroke_width,
            });
        }
        strokes.push(GhostStroke {
            path: self.transform * self.bounds_outline.clone(),
            color: self.stroke_color,
            width: self.stroke_width,
        });
        strokes
    }
}

/// State of one drag, created in `start` and consumed in `finish`.
#[derive(Debug, Clone)]
pub struct TransformSession {
    pub action: SessionAction,
    pub initial_point: Point,
    /// Pivot at the time of the grab.
    pub pivot: Point,
    pub initial_box_rotation: f64,
    /// Angle of the initial pointer around the pivot.
    pub initial_angle: f64,
    /// Widget box expressed in the frame counter-rotated about the pivot.
    pub frame_box: Rect,
    pub offset: Vec2,
    pub rotate_delta: f64,
    pub scale_factor: Vec2,
    /// Scale/shear matrix of an edge drag, applied about `true_pivot`.
    pub matrix: Affine,
    pub true_pivot: Point,
    pub ghost: Ghost,
}

impl TransformSession {
    pub(crate) fn new(
        action: SessionAction,
        initial_point: Point,
        pivot: Point,
        box_rotation: f64,
        frame_box: Rect,
        ghost: Ghost,
    ) -> Self {
        Self {
            action,
            initial_point,
            pivot,
            initial_box_rotation: box_rotation,
            initial_angle: geometry::angle_of(initial_point - pivot),
            frame_box,
            offset: Vec2::ZERO,
            rotate_delta: 0.0,
            scale_factor: Vec2::new(1.0, 1.0),
            matrix: Affine::IDENTITY,
            true_pivot: pivot,
            ghost,
        }
    }

    /// Counter-rotation that aligns the box with the axes.
    fn frame(&self) -> Affine {
        geometry::rotate_about(-self.initial_box_rotation, self.pivot)
    }

    fn unframe(&self) -> Affine {
        geometry::rotate_about(self.initial_box_rotation, self.pivot)
    }

    /// Box rotation the widget should show for the current state.
    pub fn box_rotation(&self) -> f64 {
        self.initial_box_rotation + self.rotate_delta
    }

    /// Recompute the transform for a pointer at `point`.
    pub fn update(&mut self, point: Point, mods: EffectiveModifiers) {
        match self.action {
            SessionAction::Translate => {
                let mut delta = point - self.initial_point;
                if !mods.freescale {
                    delta = geometry::snap_vector_45(delta);
                }
                self.offset = delta;
                self.ghost.transform = Affine::translate(delta);
            }
            SessionAction::Rotate => {
                let mut delta = geometry::angle_of(point - self.pivot) - self.initial_angle;
                if !mods.freescale {
                    delta = geometry::snap_angle_45(delta);
                }
                self.rotate_delta = delta;
                self.ghost.transform = geometry::rotate_about(delta, self.pivot);
            }
            SessionAction::MoveCorner(corner) => self.update_corner(corner, point, mods),
            SessionAction::MoveEdge(edge) => self.update_edge(edge, point, mods),
        }
    }

    fn update_corner(&mut self, corner: Corner, point: Point, mods: EffectiveModifiers) {
        let true_pivot = if mods.center {
            self.pivot
        } else {
            corner.opposite().point(self.frame_box)
        };
        let frame = self.frame();
        let current = frame * point - true_pivot;
        let initial = frame * self.initial_point - true_pivot;
        if initial.x.abs() < EPSILON || initial.y.abs() < EPSILON {
            log::warn!("corner drag started on the scale pivot axis, axis left unscaled");
        }

        let mut scale = geometry::div_components(current, initial);
        if !mods.freescale {
            scale = geometry::uniform_scale(scale);
        }
        self.true_pivot = true_pivot;
        self.scale_factor = scale;
        self.ghost.transform = self.unframe() * geometry::scale_about(scale, true_pivot) * frame;
    }

    fn update_edge(&mut self, edge: Edge, point: Point, mods: EffectiveModifiers) {
        let bounds = self.frame_box;
        let true_pivot = if mods.center {
            self.pivot
        } else if edge.is_top_left() {
            Corner::BottomRight.point(bounds)
        } else {
            Corner::TopLeft.point(bounds)
        };

        let frame = self.frame();
        let current = frame * point;
        let initial = frame * self.initial_point;

        let mut matrix = Affine::IDENTITY;
        if !mods.skew || mods.skewscale {
            let mut scale = geometry::div_components(current - true_pivot, initial - true_pivot);
            if edge.is_vertical() {
                scale.x = 1.0;
            } else {
                scale.y = 1.0;
            }
            matrix = Affine::scale_non_uniform(scale.x, scale.y);
        }
        if mods.skew {
            let delta = current - initial;
            let mut shear = Vec2::new(
                ratio_or_zero(delta.x, bounds.height()),
                ratio_or_zero(delta.y, bounds.width()),
            );
            if edge.is_vertical() {
                shear.y = 0.0;
            } else {
                shear.x = 0.0;
            }
            if mods.center {
                shear *= 2.0;
            }
            if edge.is_top_left() {
                shear = -shear;
            }
            // Shear is applied after the scale, so undo the scale on it first.
            let [sx, _, _, sy, _, _] = matrix.as_coeffs();
            shear = Vec2::new(ratio_or_zero(shear.x, sx), ratio_or_zero(shear.y, sy));
            matrix = matrix * Affine::skew(shear.x, shear.y);
        }

        self.true_pivot = true_pivot;
        self.matrix = matrix;
        self.ghost.transform = self.unframe() * geometry::about(matrix, true_pivot) * frame;
    }
}

fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den.abs() < EPSILON {
        log::warn!("degenerate box dimension, shear left at zero");
        0.0
    } else {
        num / den
    }
}
