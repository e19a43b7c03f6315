//! Notifications emitted by the tools for the host to act on.

use serde::{Deserialize, Serialize};

/// What kind of change produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionTag {
    ShapeTransformApplied,
    GradientTargetModified,
    GradientStopSelected,
    GradientEndpointSelected,
    GradientTargetSelected,
}

impl ActionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionTag::ShapeTransformApplied => "shape-transform-applied",
            ActionTag::GradientTargetModified => "gradient-target-modified",
            ActionTag::GradientStopSelected => "gradient-stop-selected",
            ActionTag::GradientEndpointSelected => "gradient-endpoint-selected",
            ActionTag::GradientTargetSelected => "gradient-target-selected",
        }
    }
}

/// A semantic notification for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolEvent {
    /// A shape or paint changed: record an undo step and re-render.
    CanvasModified(ActionTag),
    /// Selection or view changed: re-render only, no undo step.
    CanvasRequestRender(ActionTag),
}

impl ToolEvent {
    /// Whether the host should push an undo step for this event.
    pub fn is_undoable(&self) -> bool {
        matches!(self, ToolEvent::CanvasModified(_))
    }
}

/// Cursor the host should show while a tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    CreateStop,
    Move,
}

/// Pending notifications, drained by the host via [`EventQueue::poll_events`].
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<ToolEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modified(&mut self, tag: ActionTag) {
        log::debug!("canvas modified: {}", tag.as_str());
        self.events.push(ToolEvent::CanvasModified(tag));
    }

    pub fn request_render(&mut self, tag: ActionTag) {
        log::debug!("canvas render requested: {}", tag.as_str());
        self.events.push(ToolEvent::CanvasRequestRender(tag));
    }

    /// Take all pending events (non-blocking).
    pub fn poll_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_drains_queue() {
        let mut queue = EventQueue::new();
        queue.modified(ActionTag::ShapeTransformApplied);
        queue.request_render(ActionTag::GradientStopSelected);
        assert_eq!(queue.len(), 2);

        let events = queue.poll_events();
        assert_eq!(
            events,
            vec![
                ToolEvent::CanvasModified(ActionTag::ShapeTransformApplied),
                ToolEvent::CanvasRequestRender(ActionTag::GradientStopSelected),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_undoable() {
        assert!(ToolEvent::CanvasModified(ActionTag::GradientTargetModified).is_undoable());
        assert!(!ToolEvent::CanvasRequestRender(ActionTag::GradientTargetSelected).is_undoable());
    }
}
