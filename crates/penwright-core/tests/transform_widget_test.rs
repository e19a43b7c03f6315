//! Integration tests for the transform widget
//!
//! Drives full pointer gestures (start, update, finish) against an in-memory
//! scene and checks the committed geometry and emitted events.

use kurbo::{Point, Rect};
use penwright_core::{
    ActionTag, Corner, Edge, HandleKind, MemoryScene, PointerEvent, SceneAdapter, ShapeId,
    ToolContext, ToolEvent, TransformKind, TransformMode, TransformWidget,
};

const EPS: f64 = 1e-6;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rects_close(a: Rect, b: Rect) -> bool {
    (a.x0 - b.x0).abs() < EPS
        && (a.y0 - b.y0).abs() < EPS
        && (a.x1 - b.x1).abs() < EPS
        && (a.y1 - b.y1).abs() < EPS
}

/// One 100x100 square at the origin, selected with the pivot at its center.
fn setup() -> (MemoryScene, ShapeId, TransformWidget, ToolContext) {
    init_logging();
    let mut scene = MemoryScene::new();
    let id = scene.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    let ctx = ToolContext::default();
    let mut widget = TransformWidget::default();
    widget
        .build(&scene, &[id], 0.0, Point::new(50.0, 50.0))
        .unwrap();
    (scene, id, widget, ctx)
}

fn drag(
    widget: &mut TransformWidget,
    scene: &mut MemoryScene,
    handle: Option<HandleKind>,
    from: Point,
    to: PointerEvent,
    ctx: &ToolContext,
) -> bool {
    widget.start(&*scene, handle, from);
    widget.update(&to, ctx);
    widget.finish(scene).unwrap()
}

#[test]
fn test_translate_gesture() {
    let (mut scene, id, mut widget, ctx) = setup();
    let applied = drag(
        &mut widget,
        &mut scene,
        None,
        Point::new(50.0, 50.0),
        PointerEvent::new((70.0, 80.0)),
        &ctx,
    );

    assert!(applied);
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(20.0, 30.0, 120.0, 130.0)));
    assert!(rects_close(widget.bounding_box(), Rect::new(20.0, 30.0, 120.0, 130.0)));
    assert_eq!(
        widget.poll_events(),
        vec![ToolEvent::CanvasModified(ActionTag::ShapeTransformApplied)]
    );
}

#[test]
fn test_corner_scale_from_opposite_corner() {
    let (mut scene, id, mut widget, ctx) = setup();
    let handle = widget.handle_at(Point::new(100.0, 100.0));
    assert_eq!(handle, Some(HandleKind::Corner(Corner::BottomRight)));

    drag(
        &mut widget,
        &mut scene,
        handle,
        Point::new(100.0, 100.0),
        PointerEvent::new((200.0, 150.0)).alt(),
        &ctx,
    );
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(0.0, 0.0, 200.0, 150.0)));
}

#[test]
fn test_uniform_mode_keeps_aspect_ratio() {
    let (mut scene, id, mut widget, _) = setup();
    let ctx = ToolContext::new(TransformMode::Uniform);
    drag(
        &mut widget,
        &mut scene,
        Some(HandleKind::Corner(Corner::BottomRight)),
        Point::new(100.0, 100.0),
        PointerEvent::new((200.0, 150.0)).alt(),
        &ctx,
    );
    let bounds = scene.bounds(id).unwrap();
    assert!((bounds.width() - bounds.height()).abs() < EPS);
}

#[test]
fn test_rotate_gesture_updates_box_rotation() {
    let (mut scene, id, mut widget, ctx) = setup();
    widget.start(&scene, Some(HandleKind::Rotation(Corner::TopRight)), Point::new(150.0, 50.0));
    assert_eq!(widget.current_action(), Some(TransformKind::Rotate));
    widget.update(&PointerEvent::new((50.0, 150.0)), &ctx);
    assert!((widget.box_rotation() - 90.0).abs() < EPS);
    widget.finish(&mut scene).unwrap();

    assert!((widget.rotation() - 90.0).abs() < EPS);
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(0.0, 0.0, 100.0, 100.0)));
    assert!(!widget.is_dragging());
}

#[test]
fn test_edge_shear_with_command() {
    let (mut scene, id, mut widget, ctx) = setup();
    drag(
        &mut widget,
        &mut scene,
        Some(HandleKind::Edge(Edge::Right)),
        Point::new(100.0, 50.0),
        PointerEvent::new((100.0, 100.0)).command(),
        &ctx,
    );
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(0.0, -50.0, 100.0, 150.0)));
}

#[test]
fn test_nulled_action_leaves_scene_untouched() {
    let (mut scene, id, mut widget, ctx) = setup();
    widget.start(&scene, None, Point::new(50.0, 50.0));
    widget.update(&PointerEvent::new((90.0, 90.0)), &ctx);
    widget.set_current_action_by_name("stretch");

    assert!(!widget.finish(&mut scene).unwrap());
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(0.0, 0.0, 100.0, 100.0)));
    assert!(widget.poll_events().is_empty());
}

#[test]
fn test_multi_selection_moves_together() {
    init_logging();
    let mut scene = MemoryScene::new();
    let a = scene.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    let b = scene.add_rect(Rect::new(90.0, 90.0, 100.0, 100.0));
    let mut widget = TransformWidget::default();
    widget.build(&scene, &[a, b], 0.0, Point::new(50.0, 50.0)).unwrap();
    assert_eq!(widget.gui().unwrap().item_outlines.len(), 2);

    widget.translate_selection(&mut scene, kurbo::Vec2::new(5.0, -5.0)).unwrap();
    assert!(rects_close(scene.bounds(a).unwrap(), Rect::new(5.0, -5.0, 15.0, 5.0)));
    assert!(rects_close(scene.bounds(b).unwrap(), Rect::new(95.0, 85.0, 105.0, 95.0)));
}

#[test]
fn test_skew_scale_edge_drag() {
    let (mut scene, id, mut widget, _) = setup();
    let ctx = ToolContext::new(TransformMode::SkewScale);
    drag(
        &mut widget,
        &mut scene,
        Some(HandleKind::Edge(Edge::Right)),
        Point::new(100.0, 50.0),
        PointerEvent::new((150.0, 100.0)),
        &ctx,
    );
    // Width doubles about the pivot and the right edge slides down with the pointer.
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(-50.0, -50.0, 150.0, 150.0)));
}

#[test]
fn test_command_shears_bottom_edge_in_freescale() {
    let (mut scene, id, mut widget, ctx) = setup();
    drag(
        &mut widget,
        &mut scene,
        Some(HandleKind::Edge(Edge::Bottom)),
        Point::new(50.0, 100.0),
        PointerEvent::new((100.0, 100.0)).command(),
        &ctx,
    );
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(-50.0, 0.0, 150.0, 100.0)));
}

#[test]
fn test_command_shears_top_edge_in_uniform_from_opposite_edge() {
    let (mut scene, id, mut widget, _) = setup();
    let ctx = ToolContext::new(TransformMode::Uniform);
    drag(
        &mut widget,
        &mut scene,
        Some(HandleKind::Edge(Edge::Top)),
        Point::new(50.0, 0.0),
        PointerEvent::new((80.0, 0.0)).command().alt(),
        &ctx,
    );
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(0.0, 0.0, 130.0, 100.0)));
}

#[test]
fn test_rotate_renamed_to_unknown_action_keeps_rotation() {
    let (mut scene, id, mut widget, ctx) = setup();
    widget.start(&scene, Some(HandleKind::Rotation(Corner::TopRight)), Point::new(150.0, 50.0));
    widget.update(&PointerEvent::new((50.0, 150.0)), &ctx);
    widget.set_current_action_by_name("warp");

    assert!(!widget.finish(&mut scene).unwrap());
    assert!(widget.rotation().abs() < EPS);
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(0.0, 0.0, 100.0, 100.0)));
    assert!(widget.poll_events().is_empty());
}

#[test]
fn test_rotate_renamed_to_translate_moves_without_rotating() {
    let (mut scene, id, mut widget, ctx) = setup();
    widget.start(&scene, Some(HandleKind::Rotation(Corner::TopRight)), Point::new(150.0, 50.0));
    widget.update(&PointerEvent::new((50.0, 150.0)), &ctx);
    assert!((widget.box_rotation() - 90.0).abs() < EPS);

    widget.set_current_action_by_name("translate");
    assert_eq!(widget.current_action(), Some(TransformKind::Translate));
    widget.update(&PointerEvent::new((180.0, 50.0)), &ctx);
    assert!(widget.finish(&mut scene).unwrap());

    assert!(widget.rotation().abs() < EPS);
    assert!(rects_close(scene.bounds(id).unwrap(), Rect::new(30.0, 0.0, 130.0, 100.0)));
    assert!(rects_close(widget.bounding_box(), Rect::new(30.0, 0.0, 130.0, 100.0)));
}
