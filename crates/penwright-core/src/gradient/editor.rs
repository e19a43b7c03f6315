//! Interactive gradient editor.
//!
//! The editor targets the fill or stroke of one path. It shows the gradient
//! line between two endpoint markers (a circle for the origin, a square for
//! the destination) and one marker per color stop. The markers sit outside
//! the true endpoints by a fixed screen distance so they never cover the
//! line ends.
//!
//! Every visible edit is written back to the target immediately.

use super::model::{ColorStop, Gradient};
use crate::config::{GradientConfig, TransformMode};
use crate::events::{ActionTag, Cursor, EventQueue, ToolEvent};
use crate::geometry;
use crate::hit::{HitClassifier, HitResult, HitType, Overlay};
use crate::input::{PointerEvent, ToolContext};
use crate::scene::{Paint, PaintTarget, SceneAdapter, ShapeId, ShapeKind};
use kurbo::{Line, ParamCurveNearest, Point, Rect, Vec2};
use peniko::Color;
use std::fmt;

/// A GUI element of the gradient editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientHandle {
    Origin,
    Destination,
    /// The guide line between the endpoint markers.
    Line,
    /// A color stop, by index into the stop list.
    Stop(usize),
}

/// What the inspector should show for the current editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionType {
    Unknown,
    GradientStop,
    GradientStroke,
    GradientFill,
}

impl SelectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionType::Unknown => "unknown",
            SelectionType::GradientStop => "gradientstop",
            SelectionType::GradientStroke => "gradientstroke",
            SelectionType::GradientFill => "gradientfill",
        }
    }
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientType {
    Linear,
    Radial,
}

/// Which endpoint marker is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

/// Endpoint positions captured when an endpoint drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointDrag {
    pub endpoint: Endpoint,
    pub last_origin: Point,
    pub last_destination: Point,
    /// Vector between the two markers.
    pub last_marker_vector: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorState {
    /// No target.
    Idle,
    TargetSelected,
    /// Pointer over the gradient line, previewing a new stop.
    Hover,
    DraggingEndpoint(EndpointDrag),
    DraggingStop(usize),
    /// Dragging a stop created by the pointer-down that started the drag.
    PlacingStop(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Target {
    id: ShapeId,
    paint: PaintTarget,
}

/// Display description of a stop marker.
#[derive(Debug, Clone, Copy)]
pub struct StopMarker {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    pub transparent: bool,
    pub selected: bool,
    pub outline_color: Color,
    pub outline_width: f64,
}

/// Display description of the endpoint markers and the line between them.
/// The origin is drawn as a circle, the destination as a square.
#[derive(Debug, Clone, Copy)]
pub struct EndpointGuide {
    pub line: Line,
    pub origin: Point,
    pub destination: Point,
    pub radius: f64,
    pub fill_color: Color,
    pub outline_color: Color,
    pub outline_width: f64,
}

/// Gradient editing tool.
#[derive(Debug, Clone)]
pub struct GradientEditor {
    config: GradientConfig,
    classifier: HitClassifier,
    zoom: f64,
    target: Option<Target>,
    gradient: Gradient,
    /// Endpoint marker positions, `None` while no GUI is built.
    markers: Option<(Point, Point)>,
    preview: Option<ColorStop>,
    state: EditorState,
    cursor: Cursor,
    /// Target paint as last written or read, to detect outside changes.
    last_paint: Option<Paint>,
    events: EventQueue,
}

impl Default for GradientEditor {
    fn default() -> Self {
        Self::new(GradientConfig::default())
    }
}

impl GradientEditor {
    pub fn new(config: GradientConfig) -> Self {
        Self {
            classifier: HitClassifier::new(config.selection_tolerance),
            config,
            zoom: 1.0,
            target: None,
            gradient: Gradient::solid(Color::TRANSPARENT, Point::ZERO, Point::ZERO),
            markers: None,
            preview: None,
            state: EditorState::Idle,
            cursor: Cursor::Default,
            last_paint: None,
            events: EventQueue::new(),
        }
    }

    fn scale(&self) -> f64 {
        1.0 / self.zoom.max(f64::EPSILON)
    }

    fn endpoint_offset(&self) -> f64 {
        self.config.endpoint_offset_length() * self.scale()
    }

    fn mouse_max_distance(&self) -> f64 {
        self.config.mouse_max_distance() * self.scale()
    }

    /// Re-sync with the scene when the tool becomes active again.
    pub fn activate<S: SceneAdapter + ?Sized>(&mut self, scene: &S) {
        let Some(target) = self.target else {
            return;
        };
        if !scene.contains(target.id) {
            log::debug!("gradient target {} is gone", target.id);
            self.clear_target();
            return;
        }
        let current = scene.paint(target.id, target.paint);
        let unchanged = match (&current, &self.last_paint) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            self.setup_gui(scene);
        }
    }

    /// Tear down all GUI and forget the target.
    pub fn deactivate(&mut self) {
        self.clear_target();
    }

    fn clear_target(&mut self) {
        self.target = None;
        self.markers = None;
        self.preview = None;
        self.last_paint = None;
        self.gradient.select(None);
        self.state = EditorState::Idle;
        self.cursor = Cursor::Default;
    }

    /// Make `id` the target and build the GUI from its current paint.
    pub fn set_target<S: SceneAdapter + ?Sized>(&mut self, scene: &S, id: ShapeId, paint: PaintTarget) {
        log::debug!("gradient target set to {id} ({paint:?})");
        self.target = Some(Target { id, paint });
        self.setup_gui(scene);
    }

    /// Read the target's paint into the editor and rebuild the markers.
    ///
    /// A solid paint becomes a two-stop linear gradient across the target's
    /// bounds; a missing paint is treated as transparent.
    pub fn setup_gui<S: SceneAdapter + ?Sized>(&mut self, scene: &S) {
        let Some(target) = self.target else {
            return;
        };
        let paint = scene.paint(target.id, target.paint);
        self.gradient = match &paint {
            Some(Paint::Gradient(desc)) => Gradient::from_descriptor(desc),
            Some(Paint::Solid(color)) => self.solid_across(scene, target.id, *color),
            None => self.solid_across(scene, target.id, Color::TRANSPARENT),
        };
        self.last_paint = paint;
        self.preview = None;
        self.place_markers();
        self.state = EditorState::TargetSelected;
    }

    fn solid_across<S: SceneAdapter + ?Sized>(&self, scene: &S, id: ShapeId, color: Color) -> Gradient {
        let bounds = scene.bounds(id).unwrap_or(Rect::ZERO);
        let mid_y = bounds.center().y;
        Gradient::solid(color, Point::new(bounds.x0, mid_y), Point::new(bounds.x1, mid_y))
    }

    /// Put the markers outside the true endpoints.
    fn place_markers(&mut self) {
        let offset = self.gradient.line_unit() * self.endpoint_offset();
        self.markers = Some((
            self.gradient.origin() - offset,
            self.gradient.destination() + offset,
        ));
    }

    /// Derive the true endpoints from the marker positions.
    fn endpoints_from_markers(&mut self, origin_marker: Point, destination_marker: Point) {
        let offset = geometry::normalize_or_zero(destination_marker - origin_marker)
            * self.endpoint_offset();
        self.markers = Some((origin_marker, destination_marker));
        self.gradient
            .set_endpoints(origin_marker + offset, destination_marker - offset);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        self.zoom = zoom;
        if self.markers.is_some() {
            self.place_markers();
        }
    }

    /// Classify what lies under `point`. Scene hits on anything but paths and
    /// compound paths are reported as nothing.
    pub fn hit_test<S: SceneAdapter + ?Sized>(&self, scene: &S, point: Point) -> HitResult<GradientHandle> {
        let hit = self.classifier.classify(scene, self, point, self.zoom, &|_| true);
        match hit {
            HitResult::Shape { id, .. } => match scene.kind(id) {
                Some(ShapeKind::Path | ShapeKind::CompoundPath) => hit,
                _ => HitResult::Nothing,
            },
            other => other,
        }
    }

    /// Whether `point` is close enough to the gradient line, and between its
    /// endpoints, to place a stop.
    fn over_line(&self, point: Point) -> bool {
        if self.target.is_none() || self.markers.is_none() {
            return false;
        }
        let within = self
            .gradient
            .offset_of_unclamped(point)
            .is_some_and(|t| (0.0..=1.0).contains(&t));
        within && self.gradient.distance_to_line(point) <= self.mouse_max_distance()
    }

    pub fn on_pointer_move<S: SceneAdapter + ?Sized>(&mut self, scene: &S, event: &PointerEvent) {
        let hit = self.hit_test(scene, event.point);
        let over_stop = matches!(hit.gui(), Some(GradientHandle::Stop(_)));

        if !over_stop && self.over_line(event.point) {
            self.cursor = Cursor::CreateStop;
            self.preview = Some(self.gradient.interpolate_stop(event.point));
            if self.state == EditorState::TargetSelected {
                self.state = EditorState::Hover;
            }
        } else {
            self.preview = None;
            self.cursor = if hit.gui().is_some() {
                Cursor::Move
            } else {
                Cursor::Default
            };
            if self.state == EditorState::Hover {
                self.state = EditorState::TargetSelected;
            }
        }
    }

    pub fn on_pointer_down<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, event: &PointerEvent) {
        let hit = self.hit_test(&*scene, event.point);
        self.gradient.select(None);
        let has_target = self.target.is_some();

        match hit {
            HitResult::Gui {
                element: GradientHandle::Stop(index),
                ..
            } if has_target => {
                self.gradient.select(Some(index));
                if event.modifiers.shift {
                    self.delete_selected_stop(scene);
                    self.state = EditorState::TargetSelected;
                } else {
                    self.state = EditorState::DraggingStop(index);
                    self.events.request_render(ActionTag::GradientStopSelected);
                }
                self.cursor = Cursor::Move;
            }
            HitResult::Gui {
                element: handle @ (GradientHandle::Origin | GradientHandle::Destination),
                ..
            } if has_target => {
                self.events.request_render(ActionTag::GradientEndpointSelected);
                let endpoint = if handle == GradientHandle::Origin {
                    Endpoint::Origin
                } else {
                    Endpoint::Destination
                };
                let vector = self.gradient.line_vector();
                let length = vector.hypot() + 2.0 * self.endpoint_offset();
                self.state = EditorState::DraggingEndpoint(EndpointDrag {
                    endpoint,
                    last_origin: self.gradient.origin(),
                    last_destination: self.gradient.destination(),
                    last_marker_vector: geometry::with_length(vector, length),
                });
                self.cursor = Cursor::Move;
            }
            _ if self.over_line(event.point) => {
                let stop = self.gradient.interpolate_stop(event.point);
                let index = self.gradient.push(stop);
                self.gradient.select(Some(index));
                log::debug!("created gradient stop {index} at offset {:.3}", stop.offset());
                self.preview = None;
                self.update_target(scene);
                self.events.modified(ActionTag::GradientTargetModified);
                self.state = EditorState::PlacingStop(index);
                self.cursor = Cursor::Move;
            }
            HitResult::Shape { id, kind } => {
                let paint = if kind == HitType::Curve {
                    PaintTarget::Stroke
                } else {
                    PaintTarget::Fill
                };
                self.set_target(&*scene, id, paint);
                self.events.request_render(ActionTag::GradientTargetSelected);
                self.cursor = Cursor::Default;
            }
            HitResult::Nothing if has_target => {
                self.clear_target();
                self.events.request_render(ActionTag::GradientTargetSelected);
            }
            _ => {}
        }
    }

    pub fn on_pointer_drag<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        event: &PointerEvent,
        ctx: &ToolContext,
    ) {
        self.preview = None;
        match self.state {
            EditorState::DraggingStop(index) | EditorState::PlacingStop(index) => {
                let offset = self.gradient.offset_of(event.point);
                self.gradient.set_offset(index, offset);
            }
            EditorState::DraggingEndpoint(drag) => {
                let symmetric = (ctx.transform_mode == TransformMode::Uniform) != event.modifiers.shift;
                let offset = self.endpoint_offset();
                let point = event.point;
                let (origin_marker, destination_marker) = match drag.endpoint {
                    Endpoint::Origin if symmetric => (point, point + drag.last_marker_vector),
                    Endpoint::Origin => (
                        point,
                        drag.last_destination
                            + geometry::with_length(drag.last_destination - point, offset),
                    ),
                    Endpoint::Destination if symmetric => (point - drag.last_marker_vector, point),
                    Endpoint::Destination => (
                        drag.last_origin - geometry::with_length(point - drag.last_origin, offset),
                        point,
                    ),
                };
                self.endpoints_from_markers(origin_marker, destination_marker);
            }
            _ => return,
        }
        self.update_target(scene);
    }

    pub fn on_pointer_up<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, _event: &PointerEvent) {
        match self.state {
            EditorState::DraggingStop(_)
            | EditorState::PlacingStop(_)
            | EditorState::DraggingEndpoint(_) => {
                self.commit(scene);
                self.state = EditorState::TargetSelected;
            }
            _ => {}
        }
    }

    /// Write the gradient to the target's fill or stroke.
    pub fn update_target<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        let Some(target) = self.target else {
            return;
        };
        let paint = Paint::Gradient(self.gradient.to_descriptor());
        scene.set_paint(target.id, target.paint, paint.clone());
        self.last_paint = Some(paint);
    }

    fn commit<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        self.update_target(scene);
        self.events.modified(ActionTag::GradientTargetModified);
    }

    pub fn selection_type(&self) -> SelectionType {
        match self.target {
            None => SelectionType::Unknown,
            Some(_) if self.gradient.selected().is_some() => SelectionType::GradientStop,
            Some(Target {
                paint: PaintTarget::Stroke,
                ..
            }) => SelectionType::GradientStroke,
            Some(_) => SelectionType::GradientFill,
        }
    }

    pub fn gradient_type(&self) -> GradientType {
        if self.gradient.is_radial() {
            GradientType::Radial
        } else {
            GradientType::Linear
        }
    }

    pub fn set_gradient_type<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, kind: GradientType) {
        if self.target.is_none() {
            return;
        }
        self.gradient.set_radial(kind == GradientType::Radial);
        self.commit(scene);
    }

    pub fn origin(&self) -> Point {
        self.gradient.origin()
    }

    pub fn destination(&self) -> Point {
        self.gradient.destination()
    }

    pub fn set_origin<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, origin: Point) {
        let destination = self.gradient.destination();
        self.set_endpoints(scene, origin, destination);
    }

    pub fn set_destination<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, destination: Point) {
        let origin = self.gradient.origin();
        self.set_endpoints(scene, origin, destination);
    }

    fn set_endpoints<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, origin: Point, destination: Point) {
        if self.target.is_none() {
            return;
        }
        self.gradient.set_endpoints(origin, destination);
        self.place_markers();
        self.commit(scene);
    }

    /// Angle of the gradient line in degrees.
    pub fn line_angle(&self) -> f64 {
        geometry::angle_of(self.gradient.line_vector())
    }

    /// Turn the line to `degrees` around its midpoint, keeping its length.
    pub fn set_line_angle<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, degrees: f64) {
        let half = geometry::unit_at(degrees) * (self.gradient.line_vector().hypot() / 2.0);
        let mid = self.gradient.origin().midpoint(self.gradient.destination());
        self.set_endpoints(scene, mid - half, mid + half);
    }

    fn selected_stop(&self) -> Option<&ColorStop> {
        self.gradient.selected().and_then(|i| self.gradient.stop(i))
    }

    pub fn stop_color(&self) -> Option<Color> {
        self.selected_stop().map(|s| s.color())
    }

    pub fn set_stop_color<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, color: Color) {
        let Some(index) = self.gradient.selected() else {
            return;
        };
        self.gradient.set_color(index, color);
        self.commit(scene);
    }

    pub fn stop_opacity(&self) -> Option<f64> {
        self.selected_stop().map(|s| s.opacity())
    }

    pub fn set_stop_opacity<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, opacity: f64) {
        let Some(stop) = self.selected_stop() else {
            return;
        };
        let mut components = stop.color().components;
        components[3] = opacity.clamp(0.0, 1.0) as f32;
        self.set_stop_color(scene, Color::new(components));
    }

    pub fn stop_offset(&self) -> Option<f64> {
        self.selected_stop().map(|s| s.offset())
    }

    pub fn set_stop_offset<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, offset: f64) {
        let Some(index) = self.gradient.selected() else {
            return;
        };
        self.gradient.set_offset(index, offset);
        self.commit(scene);
    }

    pub fn reverse_gradient<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if self.target.is_none() {
            return;
        }
        self.gradient.reverse();
        self.commit(scene);
    }

    /// Delete the selected stop and clear the selection. With only two stops
    /// the stop takes the other one's color instead of disappearing.
    pub fn delete_selected_stop<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if self.target.is_none() {
            return;
        }
        if let Some(index) = self.gradient.selected() {
            self.gradient.delete_stop(index);
            self.gradient.select(None);
        }
        self.commit(scene);
    }

    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    pub fn target(&self) -> Option<(ShapeId, PaintTarget)> {
        self.target.map(|t| (t.id, t.paint))
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn origin_marker(&self) -> Option<Point> {
        self.markers.map(|m| m.0)
    }

    pub fn destination_marker(&self) -> Option<Point> {
        self.markers.map(|m| m.1)
    }

    pub fn endpoint_guide(&self) -> Option<EndpointGuide> {
        let (origin, destination) = self.markers?;
        Some(EndpointGuide {
            line: Line::new(origin, destination),
            origin,
            destination,
            radius: self.endpoint_radius(),
            fill_color: self.config.endpoint_fill_color.into(),
            outline_color: self.config.outline_color.into(),
            outline_width: self.config.outline_width * self.scale(),
        })
    }

    pub fn endpoint_radius(&self) -> f64 {
        self.config.endpoint_radius * self.scale()
    }

    fn marker_for(&self, stop: &ColorStop) -> StopMarker {
        let scaling = if stop.is_selected() {
            self.config.stop_selected_scaling
        } else {
            1.0
        };
        StopMarker {
            center: self.gradient.position_at(stop.offset()),
            radius: self.config.stop_radius * self.scale() * scaling,
            color: stop.color(),
            transparent: stop.is_transparent(),
            selected: stop.is_selected(),
            outline_color: self.config.outline_color.into(),
            outline_width: self.config.outline_width * self.scale(),
        }
    }

    /// Stop markers in list order; empty while no GUI is built.
    pub fn stop_markers(&self) -> Vec<StopMarker> {
        if self.markers.is_none() {
            return Vec::new();
        }
        self.gradient
            .stops()
            .iter()
            .map(|s| self.marker_for(s))
            .collect()
    }

    pub fn preview_stop(&self) -> Option<StopMarker> {
        self.preview.as_ref().map(|s| self.marker_for(s))
    }

    /// Take all pending events (non-blocking).
    pub fn poll_events(&mut self) -> Vec<ToolEvent> {
        self.events.poll_events()
    }
}

impl Overlay for GradientEditor {
    type Element = GradientHandle;

    fn pick_overlay(&self, point: Point, tolerance: f64) -> Option<(GradientHandle, HitType)> {
        let (origin, destination) = self.markers?;

        // Stops are drawn above the endpoint markers, which are above the line.
        let stop = self
            .gradient
            .stops()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, stop)| {
                let marker = self.marker_for(stop);
                (point - marker.center).hypot() <= marker.radius + tolerance
            });
        if let Some((index, _)) = stop {
            return Some((GradientHandle::Stop(index), HitType::Stop));
        }

        let r = self.endpoint_radius() + tolerance;
        let d = point - destination;
        if d.x.abs() <= r && d.y.abs() <= r {
            return Some((GradientHandle::Destination, HitType::Handle));
        }
        if (point - origin).hypot() <= r {
            return Some((GradientHandle::Origin, HitType::Handle));
        }

        let line = Line::new(origin, destination);
        let reach = self.config.outline_width * self.scale() / 2.0 + tolerance;
        if line.nearest(point, 1e-9).distance_sq <= reach * reach {
            return Some((GradientHandle::Line, HitType::Handle));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{GradientDescriptor, MemoryScene};

    const EPS: f64 = 1e-6;

    /// A 200x100 rectangle filled with a red to blue gradient along y = 50.
    fn setup() -> (MemoryScene, ShapeId, GradientEditor) {
        let mut scene = MemoryScene::new();
        let id = scene.add_rect(Rect::new(0.0, 0.0, 200.0, 100.0));
        scene.set_fill_paint(
            id,
            Paint::Gradient(GradientDescriptor {
                stops: vec![
                    (Color::from_rgba8(255, 0, 0, 255), 0.0),
                    (Color::from_rgba8(0, 0, 255, 255), 1.0),
                ],
                radial: false,
                origin: Point::new(0.0, 50.0),
                destination: Point::new(200.0, 50.0),
            }),
        );
        let mut editor = GradientEditor::default();
        editor.set_target(&scene, id, PaintTarget::Fill);
        (scene, id, editor)
    }

    fn fill_descriptor(scene: &MemoryScene, id: ShapeId) -> GradientDescriptor {
        scene
            .fill_paint(id)
            .and_then(|p| p.as_gradient().cloned())
            .unwrap()
    }

    #[test]
    fn test_solid_fill_becomes_two_stop_gradient() {
        let mut scene = MemoryScene::new();
        let id = scene.add_rect(Rect::new(10.0, 20.0, 110.0, 60.0));
        let mut editor = GradientEditor::default();
        editor.set_target(&scene, id, PaintTarget::Fill);

        assert_eq!(editor.gradient().len(), 2);
        assert!(!editor.gradient().is_radial());
        assert_eq!(editor.origin(), Point::new(10.0, 40.0));
        assert_eq!(editor.destination(), Point::new(110.0, 40.0));
        assert_eq!(editor.state(), EditorState::TargetSelected);
        // Markers sit 20 units outside the endpoints.
        assert!((editor.origin_marker().unwrap().x + 10.0).abs() < EPS);
        assert!((editor.destination_marker().unwrap().x - 130.0).abs() < EPS);
    }

    #[test]
    fn test_missing_paint_is_transparent() {
        let mut scene = MemoryScene::new();
        let id = scene.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.clear_fill(id);
        let mut editor = GradientEditor::default();
        editor.set_target(&scene, id, PaintTarget::Fill);
        assert!(editor.gradient().stops().iter().all(|s| s.is_transparent()));
    }

    #[test]
    fn test_click_on_line_creates_stop() {
        let (mut scene, id, mut editor) = setup();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((50.0, 55.0)));

        assert_eq!(editor.gradient().len(), 3);
        assert_eq!(editor.gradient().selected(), Some(2));
        assert_eq!(editor.state(), EditorState::PlacingStop(2));
        assert_eq!(fill_descriptor(&scene, id).stops.len(), 3);
        assert_eq!(
            editor.poll_events(),
            vec![ToolEvent::CanvasModified(ActionTag::GradientTargetModified)]
        );
        let stop = editor.gradient().stops()[2];
        assert!((stop.offset() - 0.25).abs() < EPS);
        assert!((stop.color().components[0] - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_shift_click_deletes_stop_among_three() {
        let (mut scene, id, mut editor) = setup();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((100.0, 50.0)));
        editor.on_pointer_up(&mut scene, &PointerEvent::new((100.0, 50.0)));
        editor.poll_events();
        assert_eq!(editor.gradient().len(), 3);

        editor.on_pointer_down(&mut scene, &PointerEvent::new((100.0, 50.0)).shift());
        assert_eq!(editor.gradient().len(), 2);
        assert!(editor.gradient().stops()[0].offset().abs() < EPS);
        assert!((editor.gradient().stops()[1].offset() - 1.0).abs() < EPS);
        assert_eq!(editor.gradient().selected(), None);
        assert_eq!(fill_descriptor(&scene, id).stops.len(), 2);
    }

    #[test]
    fn test_shift_click_with_two_stops_merges_color() {
        let (mut scene, _, mut editor) = setup();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((0.0, 50.0)).shift());
        assert_eq!(editor.gradient().len(), 2);
        let first = editor.gradient().stops()[0].color();
        let second = editor.gradient().stops()[1].color();
        assert_eq!(first.components, second.components);
    }

    #[test]
    fn test_select_stop_requests_render() {
        let (mut scene, _, mut editor) = setup();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((200.0, 50.0)));
        assert_eq!(editor.gradient().selected(), Some(1));
        assert_eq!(editor.selection_type(), SelectionType::GradientStop);
        assert_eq!(
            editor.poll_events(),
            vec![ToolEvent::CanvasRequestRender(ActionTag::GradientStopSelected)]
        );
    }

    #[test]
    fn test_drag_stop_clamps_offset() {
        let (mut scene, id, mut editor) = setup();
        let ctx = ToolContext::default();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((200.0, 50.0)));
        editor.on_pointer_drag(&mut scene, &PointerEvent::new((150.0, 60.0)), &ctx);
        assert!((editor.gradient().stops()[1].offset() - 0.75).abs() < EPS);
        editor.on_pointer_drag(&mut scene, &PointerEvent::new((400.0, 60.0)), &ctx);
        assert!((editor.gradient().stops()[1].offset() - 1.0).abs() < EPS);
        editor.on_pointer_up(&mut scene, &PointerEvent::new((400.0, 60.0)));
        assert!((fill_descriptor(&scene, id).stops[1].1 - 1.0).abs() < EPS);
        assert_eq!(editor.state(), EditorState::TargetSelected);
    }

    #[test]
    fn test_endpoint_drag_asymmetric() {
        let (mut scene, _, mut editor) = setup();
        let ctx = ToolContext::default();
        // Destination marker sits at (220, 50).
        editor.on_pointer_down(&mut scene, &PointerEvent::new((220.0, 50.0)));
        assert!(matches!(editor.state(), EditorState::DraggingEndpoint(_)));
        editor.on_pointer_drag(&mut scene, &PointerEvent::new((320.0, 50.0)), &ctx);
        assert!((editor.origin().x - 0.0).abs() < EPS);
        assert!((editor.destination().x - 300.0).abs() < EPS);
    }

    #[test]
    fn test_endpoint_drag_symmetric_with_shift() {
        let (mut scene, _, mut editor) = setup();
        let ctx = ToolContext::default();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((-20.0, 50.0)));
        editor.on_pointer_drag(&mut scene, &PointerEvent::new((-20.0, 150.0)).shift(), &ctx);
        // The whole line moves with the origin marker.
        assert!(geometry::points_close(editor.origin(), Point::new(0.0, 150.0), EPS));
        assert!(geometry::points_close(editor.destination(), Point::new(200.0, 150.0), EPS));
    }

    #[test]
    fn test_click_other_shape_retargets() {
        let (mut scene, _, mut editor) = setup();
        let other = scene.add_rect(Rect::new(300.0, 300.0, 400.0, 400.0));
        editor.on_pointer_down(&mut scene, &PointerEvent::new((350.0, 350.0)));
        assert_eq!(editor.target(), Some((other, PaintTarget::Fill)));
        assert_eq!(
            editor.poll_events(),
            vec![ToolEvent::CanvasRequestRender(ActionTag::GradientTargetSelected)]
        );
    }

    #[test]
    fn test_click_stroke_targets_stroke() {
        let mut scene = MemoryScene::new();
        let id = scene.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        scene.set_stroke(id, Some(Paint::Solid(Color::BLACK)), 4.0);
        let mut editor = GradientEditor::default();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((100.0, 30.0)));
        assert_eq!(editor.target(), Some((id, PaintTarget::Stroke)));
        assert_eq!(editor.selection_type(), SelectionType::GradientStroke);
    }

    #[test]
    fn test_groups_are_not_targets() {
        let mut scene = MemoryScene::new();
        let a = scene.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        scene.group(&[a]);
        let mut editor = GradientEditor::default();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((50.0, 50.0)));
        assert_eq!(editor.target(), None);
        assert!(editor.poll_events().is_empty());
    }

    #[test]
    fn test_click_empty_space_clears_target() {
        let (mut scene, _, mut editor) = setup();
        editor.on_pointer_down(&mut scene, &PointerEvent::new((900.0, 900.0)));
        assert_eq!(editor.target(), None);
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.stop_markers().is_empty());
        assert_eq!(
            editor.poll_events(),
            vec![ToolEvent::CanvasRequestRender(ActionTag::GradientTargetSelected)]
        );
    }

    #[test]
    fn test_hover_preview_and_cursor() {
        let (scene, _, mut editor) = setup();
        editor.on_pointer_move(&scene, &PointerEvent::new((60.0, 52.0)));
        assert_eq!(editor.cursor(), Cursor::CreateStop);
        assert_eq!(editor.state(), EditorState::Hover);
        assert!(editor.preview_stop().is_some());

        editor.on_pointer_move(&scene, &PointerEvent::new((0.0, 50.0)));
        assert_eq!(editor.cursor(), Cursor::Move);
        assert!(editor.preview_stop().is_none());

        editor.on_pointer_move(&scene, &PointerEvent::new((60.0, 90.0)));
        assert_eq!(editor.cursor(), Cursor::Default);
        assert_eq!(editor.state(), EditorState::TargetSelected);
    }

    #[test]
    fn test_reverse_and_type_setters_commit() {
        let (mut scene, id, mut editor) = setup();
        editor.reverse_gradient(&mut scene);
        let desc = fill_descriptor(&scene, id);
        assert!((desc.stops[0].1 - 1.0).abs() < EPS);
        assert!(desc.stops[1].1.abs() < EPS);

        editor.set_gradient_type(&mut scene, GradientType::Radial);
        assert!(fill_descriptor(&scene, id).radial);
        assert_eq!(editor.gradient_type(), GradientType::Radial);
        assert_eq!(editor.poll_events().len(), 2);
    }

    #[test]
    fn test_stop_setters_need_selection() {
        let (mut scene, _, mut editor) = setup();
        editor.set_stop_color(&mut scene, Color::WHITE);
        assert!(editor.poll_events().is_empty());
        assert_eq!(editor.stop_color(), None);

        editor.on_pointer_down(&mut scene, &PointerEvent::new((0.0, 50.0)));
        editor.set_stop_opacity(&mut scene, 0.0);
        assert!(editor.gradient().stops()[0].is_transparent());
        editor.set_stop_offset(&mut scene, 0.3);
        assert!((editor.stop_offset().unwrap() - 0.3).abs() < EPS);
    }

    #[test]
    fn test_line_angle() {
        let (mut scene, _, mut editor) = setup();
        assert!(editor.line_angle().abs() < EPS);
        editor.set_line_angle(&mut scene, 90.0);
        assert!(geometry::points_close(editor.origin(), Point::new(100.0, -50.0), EPS));
        assert!(geometry::points_close(editor.destination(), Point::new(100.0, 150.0), EPS));
    }

    #[test]
    fn test_activate_resyncs_changed_paint() {
        let (mut scene, id, mut editor) = setup();
        scene.set_fill_paint(id, Paint::Solid(Color::WHITE));
        editor.activate(&scene);
        assert!((editor.destination().x - 200.0).abs() < EPS);
        assert_eq!(editor.gradient().stops()[0].color().components, Color::WHITE.components);

        scene.remove(id);
        editor.activate(&scene);
        assert_eq!(editor.target(), None);
    }

    #[test]
    fn test_guide_uses_configured_style() {
        let (_, _, mut editor) = setup();
        editor.set_zoom(2.0);
        let guide = editor.endpoint_guide().unwrap();
        let config = GradientConfig::default();
        assert_eq!(guide.fill_color.components, Color::from(config.endpoint_fill_color).components);
        assert_eq!(guide.outline_color.components, Color::from(config.outline_color).components);
        assert!((guide.outline_width - 0.5).abs() < EPS);
        assert!((guide.line.p1.x - 210.0).abs() < EPS);
        let marker = editor.stop_markers()[0];
        assert_eq!(marker.outline_color.components, guide.outline_color.components);
    }

    #[test]
    fn test_zoom_moves_markers() {
        let (_, _, mut editor) = setup();
        editor.set_zoom(2.0);
        assert!((editor.origin_marker().unwrap().x + 10.0).abs() < EPS);
        assert!((editor.endpoint_radius() - 4.0).abs() < EPS);
    }
}
