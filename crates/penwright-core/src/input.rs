//! Pointer input delivered to the tools by the host.

use crate::config::TransformMode;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub command: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        shift: false,
        command: false,
        alt: false,
    };
}

/// A pointer move/down/drag/up event in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub point: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create an event with no modifiers held.
    pub fn new(point: impl Into<Point>) -> Self {
        Self {
            point: point.into(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Create an event with explicit modifiers.
    pub fn with_modifiers(point: impl Into<Point>, modifiers: Modifiers) -> Self {
        Self {
            point: point.into(),
            modifiers,
        }
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn command(mut self) -> Self {
        self.modifiers.command = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

/// Host state passed into the pointer operations that depend on it.
///
/// Keeping this outside the tools means a widget or editor never reads
/// ambient application state, so several instances can coexist. Zoom is set
/// on each tool with `set_zoom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolContext {
    /// Default scale/skew freedom before modifier overrides.
    pub transform_mode: TransformMode,
}

impl ToolContext {
    pub fn new(transform_mode: TransformMode) -> Self {
        Self { transform_mode }
    }
}
