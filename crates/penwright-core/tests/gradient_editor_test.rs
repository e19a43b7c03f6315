//! Integration tests for the gradient editor
//!
//! Targets shapes through pointer clicks, edits stops and endpoints, and
//! checks what ends up written to the scene.

use kurbo::{Point, Rect};
use peniko::Color;
use penwright_core::{
    ActionTag, GradientConfig, GradientEditor, MemoryScene, Paint, PaintTarget, PointerEvent,
    SceneAdapter, SelectionType, ShapeId, ToolConfig, ToolContext, ToolEvent,
};

const EPS: f64 = 1e-6;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (MemoryScene, ShapeId, GradientEditor) {
    init_logging();
    let mut scene = MemoryScene::new();
    let id = scene.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    (scene, id, GradientEditor::new(GradientConfig::default()))
}

fn fill_offsets(scene: &MemoryScene, id: ShapeId) -> Vec<f64> {
    match scene.fill_paint(id) {
        Some(Paint::Gradient(desc)) => desc.stops.iter().map(|s| s.1).collect(),
        other => panic!("expected a gradient fill, got {other:?}"),
    }
}

#[test]
fn test_target_then_place_and_drag_stop() {
    let (mut scene, id, mut editor) = setup();
    let ctx = ToolContext::default();

    editor.on_pointer_down(&mut scene, &PointerEvent::new((50.0, 20.0)));
    assert_eq!(editor.target(), Some((id, PaintTarget::Fill)));
    assert_eq!(editor.selection_type(), SelectionType::GradientFill);
    // Solid fills are shown as a gradient across the middle of the bounds.
    assert_eq!(editor.origin(), Point::new(0.0, 50.0));
    assert_eq!(editor.destination(), Point::new(100.0, 50.0));

    editor.on_pointer_down(&mut scene, &PointerEvent::new((25.0, 52.0)));
    editor.on_pointer_drag(&mut scene, &PointerEvent::new((75.0, 60.0)), &ctx);
    editor.on_pointer_up(&mut scene, &PointerEvent::new((75.0, 60.0)));

    let offsets = fill_offsets(&scene, id);
    assert_eq!(offsets.len(), 3);
    assert!((offsets[2] - 0.75).abs() < EPS);

    let events = editor.poll_events();
    assert!(!events[0].is_undoable());
    assert!(events[1..].iter().all(ToolEvent::is_undoable));
    assert_eq!(
        events,
        vec![
            ToolEvent::CanvasRequestRender(ActionTag::GradientTargetSelected),
            ToolEvent::CanvasModified(ActionTag::GradientTargetModified),
            ToolEvent::CanvasModified(ActionTag::GradientTargetModified),
        ]
    );
}

#[test]
fn test_edit_selected_stop_and_reverse() {
    let (mut scene, id, mut editor) = setup();
    editor.set_target(&scene, id, PaintTarget::Fill);
    editor.on_pointer_down(&mut scene, &PointerEvent::new((25.0, 50.0)));
    editor.on_pointer_up(&mut scene, &PointerEvent::new((25.0, 50.0)));

    editor.set_stop_color(&mut scene, Color::from_rgba8(255, 0, 0, 255));
    assert_eq!(editor.stop_color().map(|c| c.components[0]), Some(1.0));
    editor.reverse_gradient(&mut scene);

    let offsets = fill_offsets(&scene, id);
    assert!((offsets[0] - 1.0).abs() < EPS);
    assert!(offsets[1].abs() < EPS);
    assert!((offsets[2] - 0.75).abs() < EPS);

    editor.delete_selected_stop(&mut scene);
    assert_eq!(fill_offsets(&scene, id).len(), 2);
    assert_eq!(editor.selection_type(), SelectionType::GradientFill);
}

#[test]
fn test_stroke_gradient_leaves_fill_alone() {
    let (mut scene, id, mut editor) = setup();
    scene.set_stroke(id, Some(Paint::Solid(Color::WHITE)), 2.0);
    editor.set_target(&scene, id, PaintTarget::Stroke);
    editor.reverse_gradient(&mut scene);

    assert!(matches!(scene.stroke_paint(id), Some(Paint::Gradient(_))));
    assert!(matches!(scene.fill_paint(id), Some(Paint::Solid(_))));
}

#[test]
fn test_config_from_json_changes_marker_offset() {
    init_logging();
    let config = ToolConfig::from_json(r#"{ "gradient": { "endpoint_radius": 4.0, "stop_radius": 6.0 } }"#)
        .unwrap();
    let mut scene = MemoryScene::new();
    let id = scene.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    let mut editor = GradientEditor::new(config.gradient);
    editor.set_target(&scene, id, PaintTarget::Fill);
    assert!((editor.origin_marker().unwrap().x + 10.0).abs() < EPS);
    assert!((editor.destination_marker().unwrap().x - 110.0).abs() < EPS);
}
