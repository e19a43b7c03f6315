//! Gradient editing: the stop/endpoint model and the pointer-driven editor.

mod editor;
mod model;

pub use editor::{
    EditorState, Endpoint, EndpointDrag, EndpointGuide, GradientEditor, GradientHandle,
    GradientType, SelectionType, StopMarker,
};
pub use model::{lerp_color, ColorStop, Gradient};
