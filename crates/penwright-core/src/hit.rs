//! Shared hit-testing policy layered on the scene's raw pick.
//!
//! Tools draw their own GUI on top of the scene, so the classifier asks the
//! tool's [`Overlay`] first and only falls back to the scene when no GUI
//! element is under the pointer. Scene hits are normalized to
//! [`HitType::Fill`] or [`HitType::Curve`] and promoted to the top-level
//! selectable item: children of compound paths and nested group members are
//! never returned on their own.

use crate::scene::{RawHit, RawHitKind, SceneAdapter, ShapeId, ShapeKind};
use kurbo::Point;

/// Normalized hit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitType {
    Fill,
    Curve,
    /// A gradient color stop marker.
    Stop,
    /// Any other tool handle.
    Handle,
}

/// Result of a classified pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult<E = ()> {
    Nothing,
    /// A selectable scene item.
    Shape { id: ShapeId, kind: HitType },
    /// One of the active tool's own GUI elements.
    Gui { element: E, kind: HitType },
}

impl<E> HitResult<E> {
    pub fn is_nothing(&self) -> bool {
        matches!(self, HitResult::Nothing)
    }

    pub fn kind(&self) -> Option<HitType> {
        match self {
            HitResult::Nothing => None,
            HitResult::Shape { kind, .. } | HitResult::Gui { kind, .. } => Some(*kind),
        }
    }

    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            HitResult::Shape { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn gui(&self) -> Option<&E> {
        match self {
            HitResult::Gui { element, .. } => Some(element),
            _ => None,
        }
    }
}

/// GUI geometry owned by a tool that can be picked before the scene.
pub trait Overlay {
    type Element;

    /// Topmost GUI element under `point` within `tolerance` (world units).
    fn pick_overlay(&self, point: Point, tolerance: f64) -> Option<(Self::Element, HitType)>;
}

/// A tool without GUI geometry.
impl Overlay for () {
    type Element = ();

    fn pick_overlay(&self, _point: Point, _tolerance: f64) -> Option<((), HitType)> {
        None
    }
}

/// Picks scene items and tool GUI with a screen-space tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitClassifier {
    /// Pick tolerance in screen pixels.
    pub tolerance: f64,
}

impl Default for HitClassifier {
    fn default() -> Self {
        Self { tolerance: 3.0 }
    }
}

impl HitClassifier {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// World-space tolerance at the given zoom.
    pub fn world_tolerance(&self, zoom: f64) -> f64 {
        self.tolerance / zoom.max(f64::EPSILON)
    }

    /// Classify what lies under `point`.
    ///
    /// `filter` rejects scene items before promotion; GUI elements are not
    /// subject to it.
    pub fn classify<S, O>(
        &self,
        scene: &S,
        overlay: &O,
        point: Point,
        zoom: f64,
        filter: &dyn Fn(ShapeId) -> bool,
    ) -> HitResult<O::Element>
    where
        S: SceneAdapter + ?Sized,
        O: Overlay + ?Sized,
    {
        let tolerance = self.world_tolerance(zoom);
        if let Some((element, kind)) = overlay.pick_overlay(point, tolerance) {
            return HitResult::Gui { element, kind };
        }
        match scene.pick(point, tolerance, filter) {
            Some(raw) => {
                let (id, kind) = Self::promote(scene, raw);
                HitResult::Shape { id, kind }
            }
            None => HitResult::Nothing,
        }
    }

    /// Pick the scene only.
    pub fn pick_scene<S>(
        &self,
        scene: &S,
        point: Point,
        zoom: f64,
        filter: &dyn Fn(ShapeId) -> bool,
    ) -> HitResult
    where
        S: SceneAdapter + ?Sized,
    {
        self.classify(scene, &(), point, zoom, filter)
    }

    /// Apply the promotion rules to a raw scene hit.
    pub fn promote<S: SceneAdapter + ?Sized>(scene: &S, raw: RawHit) -> (ShapeId, HitType) {
        let mut id = raw.shape;
        let mut kind = match raw.kind {
            RawHitKind::Stroke | RawHitKind::Curve => HitType::Curve,
            RawHitKind::Fill | RawHitKind::Pixel => HitType::Fill,
        };

        if let Some(parent) = scene.parent(id) {
            if scene.kind(parent) == Some(ShapeKind::CompoundPath) {
                id = parent;
            }
        }

        // Members of a group are picked as the whole top-level group.
        if scene.parent(id).is_some() {
            kind = HitType::Fill;
            while let Some(parent) = scene.parent(id) {
                id = parent;
            }
        }

        (id, kind)
    }
}
