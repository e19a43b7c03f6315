//! Selection transform widget.
//!
//! The widget wraps a set of scene items in a box that can be rotated
//! independently of the items themselves. It builds its own GUI (border,
//! corner/edge handles, rotation hot-zones and a pivot marker), turns pointer
//! drags into translate, rotate, scale and skew transforms previewed on a
//! ghost, and applies the final transform to the real items when the drag
//! finishes.
//!
//! Scale and skew always act in the box frame: items are counter-rotated by
//! the box rotation about the pivot, transformed, and rotated back.

mod handles;
mod session;

pub use handles::{Corner, Edge, Handle, HandleBuilder, HandleKind, RotationHotspot, WidgetGui};
pub use session::{
    EffectiveModifiers, Ghost, GhostStroke, SessionAction, TransformKind, TransformSession,
};

use crate::config::WidgetConfig;
use crate::error::WidgetResult;
use crate::events::{ActionTag, EventQueue, ToolEvent};
use crate::geometry;
use crate::hit::{HitType, Overlay};
use crate::input::{PointerEvent, ToolContext};
use crate::scene::{SceneAdapter, ShapeId};
use kurbo::{Affine, Point, Rect, Shape, Vec2};
use peniko::Color;

/// Width/height ratio used instead of zero so a selection can be scaled back.
const MIN_SCALE_RATIO: f64 = 0.001;

/// Interactive transform widget around a selection.
#[derive(Debug, Clone)]
pub struct TransformWidget {
    config: WidgetConfig,
    items: Vec<ShapeId>,
    pivot: Point,
    /// Rotation of the box in degrees.
    box_rotation: f64,
    /// Center of the union of the items' axis-aligned bounds.
    center: Point,
    /// Box in the frame counter-rotated about `center`.
    bounding_box: Rect,
    zoom: f64,
    gui: Option<WidgetGui>,
    grabbed: Option<HandleKind>,
    session: Option<TransformSession>,
    current_action: Option<TransformKind>,
    events: EventQueue,
}

impl Default for TransformWidget {
    fn default() -> Self {
        Self::new(WidgetConfig::default())
    }
}

impl TransformWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            pivot: Point::ZERO,
            box_rotation: 0.0,
            center: Point::ZERO,
            bounding_box: Rect::ZERO,
            zoom: 1.0,
            gui: None,
            grabbed: None,
            session: None,
            current_action: None,
            events: EventQueue::new(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Build the widget around `items`. Ids unknown to the scene are dropped.
    ///
    /// Any running drag is discarded. An empty selection builds no GUI.
    /// Handles are sized for the zoom last given to [`TransformWidget::set_zoom`].
    pub fn build<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &S,
        items: &[ShapeId],
        box_rotation: f64,
        pivot: Point,
    ) -> WidgetResult<()> {
        self.items = items.iter().copied().filter(|id| scene.contains(*id)).collect();
        self.box_rotation = box_rotation;
        self.pivot = pivot;
        self.session = None;
        self.grabbed = None;
        self.rebuild(scene)
    }

    /// Recompute the box and GUI from the current items, rotation and pivot.
    pub fn rebuild<S: SceneAdapter + ?Sized>(&mut self, scene: &S) -> WidgetResult<()> {
        self.gui = None;
        if self.items.is_empty() {
            self.center = Point::ZERO;
            self.bounding_box = Rect::ZERO;
            return Ok(());
        }

        self.center = self
            .items
            .iter()
            .filter_map(|id| scene.bounds(*id))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
            .center();
        self.bounding_box = self.counter_rotated_bounds(scene);
        self.gui = Some(self.build_gui(scene)?);
        Ok(())
    }

    /// Union of each item's bounds after counter-rotating it by the box
    /// rotation about the selection center.
    fn counter_rotated_bounds<S: SceneAdapter + ?Sized>(&self, scene: &S) -> Rect {
        self.items
            .iter()
            .filter_map(|id| self.counter_rotated_item_bounds(scene, *id))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    fn counter_rotated_item_bounds<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        id: ShapeId,
    ) -> Option<Rect> {
        let outline = scene.outline(id)?;
        let unrotate = geometry::rotate_about(-self.box_rotation, self.center);
        Some((unrotate * outline).bounding_box())
    }

    fn scale(&self) -> f64 {
        1.0 / self.zoom.max(f64::EPSILON)
    }

    fn build_gui<S: SceneAdapter + ?Sized>(&self, scene: &S) -> WidgetResult<WidgetGui> {
        let scale = self.scale();
        let bb = self.bounding_box;
        let config = &self.config;

        let item_outlines = if self.items.len() > 1 {
            self.items
                .iter()
                .filter_map(|id| self.counter_rotated_item_bounds(scene, *id))
                .map(|rect| rect.to_path(0.1))
                .collect()
        } else {
            Vec::new()
        };

        let hotspot_fill: Color = config.rotation_hotspot_fill_color.into();
        let hotspots = Corner::ALL
            .iter()
            .map(|c| {
                RotationHotspot::new(
                    *c,
                    c.point(bb),
                    config.rotation_hotspot_radius * scale,
                    hotspot_fill,
                )
            })
            .collect();

        let mut handles = Vec::with_capacity(8);
        for corner in Corner::ALL {
            handles.push(self.scale_handle(HandleKind::Corner(corner), corner.point(bb))?);
        }
        for edge in Edge::ALL {
            handles.push(self.scale_handle(HandleKind::Edge(edge), edge.point(bb))?);
        }

        let pivot = HandleBuilder::new()
            .kind(HandleKind::Pivot)
            .center(self.pivot)
            .radius(config.pivot_radius * scale)
            .stroke_width(config.box_stroke_width * scale)
            .fill(config.pivot_fill_color.into())
            .stroke(config.pivot_stroke_color.into())
            .build()?;

        let gui = WidgetGui {
            border: bb.to_path(0.1),
            item_outlines,
            stroke_color: config.box_stroke_color.into(),
            stroke_width: config.box_stroke_width * scale,
            hotspots,
            handles,
            pivot,
        };
        Ok(gui.rotated(self.box_rotation, self.center))
    }

    fn scale_handle(&self, kind: HandleKind, center: Point) -> WidgetResult<Handle> {
        let scale = self.scale();
        HandleBuilder::new()
            .kind(kind)
            .center(center)
            .radius(self.config.handle_radius * scale)
            .stroke_width(self.config.handle_stroke_width * scale)
            .fill(self.config.handle_fill_color.into())
            .stroke(self.config.handle_stroke_color.into())
            .build()
    }

    /// Update the zoom and rebuild the GUI at the new handle sizes.
    pub fn set_zoom<S: SceneAdapter + ?Sized>(&mut self, scene: &S, zoom: f64) -> WidgetResult<()> {
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return Ok(());
        }
        self.zoom = zoom;
        self.rebuild(scene)
    }

    /// Handle or rotation hot-zone under `point`. The pivot marker is never picked.
    pub fn handle_at(&self, point: Point) -> Option<HandleKind> {
        self.gui.as_ref()?.pick(point, 0.0)
    }

    /// Begin a drag on `handle` (or on the selection body when `None`).
    pub fn start<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &S,
        handle: Option<HandleKind>,
        point: Point,
    ) {
        if self.items.is_empty() {
            log::debug!("transform start ignored: empty selection");
            return;
        }
        let kind = TransformKind::for_handle(handle);
        let Some(action) = SessionAction::classify(kind, handle) else {
            return;
        };

        let outlines = self.items.iter().filter_map(|id| scene.outline(*id)).collect();
        let bounds_outline =
            geometry::rotate_about(self.box_rotation, self.center) * self.bounding_box.to_path(0.1);
        let ghost = Ghost::new(outlines, bounds_outline, &self.config);

        // The box expressed in the frame aligned with the pivot.
        let to_frame = geometry::rotate_about(-self.box_rotation, self.pivot)
            * geometry::rotate_about(self.box_rotation, self.center);
        let frame_box = to_frame.transform_rect_bbox(self.bounding_box);

        log::debug!("transform session started: {action:?} at {point:?}");
        self.grabbed = handle;
        self.current_action = Some(kind);
        self.session = Some(TransformSession::new(
            action,
            point,
            self.pivot,
            self.box_rotation,
            frame_box,
            ghost,
        ));
    }

    /// Preview the drag at the pointer position. Only the ghost changes.
    pub fn update(&mut self, event: &PointerEvent, ctx: &ToolContext) {
        if self.current_action.is_none() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mods = EffectiveModifiers::resolve(ctx.transform_mode, event.modifiers);
        session.update(event.point, mods);
    }

    /// Drop the ghost and apply the drag to the selected items.
    ///
    /// Returns whether a transform was applied. A drag whose action was
    /// nulled ends without touching the scene.
    pub fn finish<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> WidgetResult<bool> {
        let session = self.session.take();
        self.grabbed = None;
        let action = self.current_action.take();
        let (Some(session), Some(_)) = (session, action) else {
            return Ok(false);
        };

        match session.action {
            SessionAction::Translate => self.apply_translate(scene, session.offset),
            SessionAction::Rotate => {
                self.apply_rotate(scene, session.rotate_delta);
                self.box_rotation = session.box_rotation();
            }
            SessionAction::MoveCorner(_) => {
                let matrix =
                    Affine::scale_non_uniform(session.scale_factor.x, session.scale_factor.y);
                self.apply_in_frame(scene, matrix, session.true_pivot);
            }
            SessionAction::MoveEdge(_) => {
                self.apply_in_frame(scene, session.matrix, session.true_pivot)
            }
        }
        log::debug!("transform session finished: {:?}", session.action);
        self.commit(&*scene)?;
        Ok(true)
    }

    /// Abandon any drag and tear down the GUI.
    pub fn deactivate(&mut self) {
        self.session = None;
        self.grabbed = None;
        self.current_action = None;
        self.items.clear();
        self.gui = None;
        self.bounding_box = Rect::ZERO;
    }

    /// Override the action of the current drag by name.
    ///
    /// Accepts "translate", "scale" and "rotate". Anything else, or a scale
    /// without a grabbed scale handle, nulls the action so the drag ends
    /// without effect.
    pub fn set_current_action_by_name(&mut self, name: &str) {
        let kind = match name.parse::<TransformKind>() {
            Ok(kind) => kind,
            Err(err) => {
                log::error!("{err}");
                self.current_action = None;
                return;
            }
        };
        self.current_action = Some(kind);
        if let Some(session) = self.session.as_mut() {
            match SessionAction::classify(kind, self.grabbed) {
                Some(action) => session.action = action,
                None => self.current_action = None,
            }
        }
    }

    fn commit<S: SceneAdapter + ?Sized>(&mut self, scene: &S) -> WidgetResult<()> {
        self.events.modified(ActionTag::ShapeTransformApplied);
        self.rebuild(scene)
    }

    fn apply_translate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, delta: Vec2) {
        for id in &self.items {
            scene.translate(*id, delta);
        }
        self.pivot += delta;
    }

    fn apply_rotate<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, degrees: f64) {
        for id in &self.items {
            scene.rotate(*id, degrees, self.pivot);
        }
    }

    /// Apply `matrix` about `pivot` in the box frame and move the shared
    /// pivot by the same law.
    fn apply_in_frame<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, matrix: Affine, pivot: Point) {
        let local = geometry::about(matrix, pivot);
        let world = geometry::rotate_about(self.box_rotation, self.pivot)
            * local
            * geometry::rotate_about(-self.box_rotation, self.pivot);
        for id in &self.items {
            scene.transform(*id, world);
        }
        self.pivot = geometry::rotate_point(local * self.pivot, self.box_rotation, self.pivot);
    }

    pub fn translate_selection<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        delta: Vec2,
    ) -> WidgetResult<()> {
        self.apply_translate(scene, delta);
        self.commit(&*scene)
    }

    /// Rotate the items and the box by `degrees` about the pivot.
    pub fn rotate_selection<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        degrees: f64,
    ) -> WidgetResult<()> {
        self.apply_rotate(scene, degrees);
        self.box_rotation += degrees;
        self.commit(&*scene)
    }

    /// Scale in the box frame about `pivot`, defaulting to the shared pivot.
    pub fn scale_selection<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        scale: Vec2,
        pivot: Option<Point>,
    ) -> WidgetResult<()> {
        let pivot = pivot.unwrap_or(self.pivot);
        self.apply_in_frame(scene, Affine::scale_non_uniform(scale.x, scale.y), pivot);
        self.commit(&*scene)
    }

    /// Apply a linear `matrix` in the box frame about `pivot`, defaulting to
    /// the shared pivot.
    pub fn transform_selection<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        matrix: Affine,
        pivot: Option<Point>,
    ) -> WidgetResult<()> {
        let pivot = pivot.unwrap_or(self.pivot);
        self.apply_in_frame(scene, matrix, pivot);
        self.commit(&*scene)
    }

    pub fn flip_horizontally<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> WidgetResult<()> {
        self.scale_selection(scene, Vec2::new(-1.0, 1.0), None)
    }

    pub fn flip_vertically<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> WidgetResult<()> {
        self.scale_selection(scene, Vec2::new(1.0, -1.0), None)
    }

    /// Top-left corner of the box, rotated by the box rotation about the pivot.
    pub fn position(&self) -> Point {
        geometry::rotate_point(
            Corner::TopLeft.point(self.bounding_box),
            self.box_rotation,
            self.pivot,
        )
    }

    pub fn set_position<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        position: Point,
    ) -> WidgetResult<()> {
        let delta = position - self.position();
        self.translate_selection(scene, delta)
    }

    pub fn width(&self) -> f64 {
        self.bounding_box.width()
    }

    pub fn set_width<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, width: f64) -> WidgetResult<()> {
        match size_ratio(width, self.width()) {
            Some(ratio) => self.scale_selection(scene, Vec2::new(ratio, 1.0), None),
            None => Ok(()),
        }
    }

    pub fn height(&self) -> f64 {
        self.bounding_box.height()
    }

    pub fn set_height<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        height: f64,
    ) -> WidgetResult<()> {
        match size_ratio(height, self.height()) {
            Some(ratio) => self.scale_selection(scene, Vec2::new(1.0, ratio), None),
            None => Ok(()),
        }
    }

    pub fn rotation(&self) -> f64 {
        self.box_rotation()
    }

    pub fn set_rotation<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        degrees: f64,
    ) -> WidgetResult<()> {
        let delta = degrees - self.box_rotation;
        self.rotate_selection(scene, delta)
    }

    pub fn items(&self) -> &[ShapeId] {
        &self.items
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Move the pivot without touching the items.
    pub fn set_pivot(&mut self, pivot: Point) {
        self.pivot = pivot;
        if let Some(gui) = self.gui.as_mut() {
            gui.pivot.center = pivot;
        }
    }

    /// Box rotation in degrees, following the pointer while a rotate drag runs.
    /// The rotation is only kept when the drag finishes as a rotation.
    pub fn box_rotation(&self) -> f64 {
        match (&self.session, self.current_action) {
            (Some(session), Some(_)) if session.action == SessionAction::Rotate => {
                session.box_rotation()
            }
            _ => self.box_rotation,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn gui(&self) -> Option<&WidgetGui> {
        self.gui.as_ref()
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        self.session.as_ref().map(|s| &s.ghost)
    }

    pub fn session(&self) -> Option<&TransformSession> {
        self.session.as_ref()
    }

    pub fn current_action(&self) -> Option<TransformKind> {
        self.current_action
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Take all pending events (non-blocking).
    pub fn poll_events(&mut self) -> Vec<ToolEvent> {
        self.events.poll_events()
    }
}

/// Ratio between a requested and a current size. Zero becomes a small
/// positive ratio; an undefined ratio is skipped.
fn size_ratio(requested: f64, current: f64) -> Option<f64> {
    let ratio = requested / current;
    if ratio == 0.0 {
        Some(MIN_SCALE_RATIO)
    } else if ratio.is_finite() {
        Some(ratio)
    } else {
        log::warn!("cannot resize a selection of size {current} to {requested}");
        None
    }
}

impl Overlay for TransformWidget {
    type Element = HandleKind;

    fn pick_overlay(&self, point: Point, tolerance: f64) -> Option<(HandleKind, HitType)> {
        let gui = self.gui.as_ref()?;
        gui.pick(point, tolerance).map(|kind| (kind, HitType::Handle))
    }
}
