//! Penwright Core Library
//!
//! Interactive geometric manipulation for the Penwright vector editor: a
//! selection-transform widget (translate, rotate, scale, skew around a pivot)
//! and a gradient editing tool, both driven by pointer events and writing
//! their results through a host-provided [`SceneAdapter`].

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gradient;
pub mod hit;
pub mod input;
pub mod scene;
pub mod widget;

pub use config::{GradientConfig, SerializableColor, ToolConfig, TransformMode, WidgetConfig};
pub use error::{ConfigError, WidgetError, WidgetResult};
pub use events::{ActionTag, Cursor, EventQueue, ToolEvent};
pub use gradient::{
    ColorStop, Gradient, GradientEditor, GradientHandle, GradientType, SelectionType,
};
pub use hit::{HitClassifier, HitResult, HitType, Overlay};
pub use input::{Modifiers, PointerEvent, ToolContext};
pub use scene::{
    GradientDescriptor, MemoryScene, Paint, PaintTarget, RawHit, RawHitKind, SceneAdapter,
    ShapeId, ShapeKind,
};
pub use widget::{Corner, Edge, Handle, HandleKind, TransformKind, TransformWidget};
