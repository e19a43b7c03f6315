//! Tool configuration: visual constants, tolerances and the default transform mode.

use crate::error::ConfigError;
use crate::input::ToolContext;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// How freely the transform widget scales and skews before modifier overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Corners scale uniformly; edges scale along one axis.
    Uniform,
    /// Corners scale each axis independently.
    #[default]
    FreeScale,
    /// Edge handles shear instead of scaling.
    Skew,
    /// Edge handles shear and scale at the same time.
    SkewScale,
}

impl TransformMode {
    /// Whether edge handles shear by default.
    pub fn skews(self) -> bool {
        matches!(self, TransformMode::Skew | TransformMode::SkewScale)
    }

    /// Whether axes scale independently by default.
    pub fn scales_freely(self) -> bool {
        self != TransformMode::Uniform
    }

    /// Whether shearing also scales by default.
    pub fn skew_scales(self) -> bool {
        self == TransformMode::SkewScale
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransformMode::Uniform => "uniform",
            TransformMode::FreeScale => "freescale",
            TransformMode::Skew => "skew",
            TransformMode::SkewScale => "skewscale",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(TransformMode::Uniform),
            "freescale" => Ok(TransformMode::FreeScale),
            "skew" => Ok(TransformMode::Skew),
            "skewscale" => Ok(TransformMode::SkewScale),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Visual constants of the transform widget, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub box_stroke_width: f64,
    pub box_stroke_color: SerializableColor,
    pub handle_radius: f64,
    pub handle_stroke_width: f64,
    pub handle_stroke_color: SerializableColor,
    pub handle_fill_color: SerializableColor,
    pub pivot_radius: f64,
    pub pivot_fill_color: SerializableColor,
    pub pivot_stroke_color: SerializableColor,
    pub rotation_hotspot_radius: f64,
    pub rotation_hotspot_fill_color: SerializableColor,
    pub ghost_stroke_color: SerializableColor,
    pub ghost_stroke_width: f64,
    pub ghost_opacity: f64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let box_stroke_color = SerializableColor::new(100, 150, 255, 255);
        Self {
            box_stroke_width: 1.0,
            box_stroke_color,
            handle_radius: 5.0,
            handle_stroke_width: 1.0,
            handle_stroke_color: box_stroke_color,
            handle_fill_color: SerializableColor::new(255, 255, 255, 77),
            pivot_radius: 5.0,
            pivot_fill_color: SerializableColor::new(255, 255, 255, 128),
            pivot_stroke_color: SerializableColor::black(),
            rotation_hotspot_radius: 20.0,
            rotation_hotspot_fill_color: SerializableColor::new(100, 150, 255, 128),
            ghost_stroke_color: SerializableColor::black(),
            ghost_stroke_width: 1.0,
            ghost_opacity: 0.5,
        }
    }
}

/// Visual constants and tolerances of the gradient editor, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// Pick tolerance handed to the hit classifier.
    pub selection_tolerance: f64,
    pub endpoint_radius: f64,
    pub endpoint_fill_color: SerializableColor,
    pub outline_color: SerializableColor,
    pub outline_width: f64,
    pub stop_radius: f64,
    /// Radius multiplier of the selected stop marker.
    pub stop_selected_scaling: f64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            selection_tolerance: 3.0,
            endpoint_radius: 8.0,
            endpoint_fill_color: SerializableColor::black(),
            outline_color: SerializableColor::new(128, 128, 128, 255),
            outline_width: 1.0,
            stop_radius: 12.0,
            stop_selected_scaling: 1.4,
        }
    }
}

impl GradientConfig {
    /// Max perpendicular pointer distance from the gradient line to place a stop.
    pub fn mouse_max_distance(&self) -> f64 {
        self.stop_radius
    }

    /// How far the endpoint markers sit outside the true endpoints.
    pub fn endpoint_offset_length(&self) -> f64 {
        self.endpoint_radius + self.stop_radius
    }
}

/// Configuration for both tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Mode both tools start from; the host may change it per event through
    /// [`ToolContext`].
    pub transform_mode: TransformMode,
    pub widget: WidgetConfig,
    pub gradient: GradientConfig,
}

impl ToolConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ToolConfig = serde_json::from_str(json)?;
        log::debug!(
            "loaded tool config (transform mode: {})",
            config.transform_mode
        );
        Ok(config)
    }

    /// Pointer context carrying the configured transform mode.
    pub fn context(&self) -> ToolContext {
        ToolContext::new(self.transform_mode)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
