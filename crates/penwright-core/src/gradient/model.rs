//! Gradient data: color stops positioned along an origin to destination line.
//!
//! Stops are kept in the order they were created, which is not necessarily
//! sorted by offset. Every lookup that needs neighbours scans the list.

use crate::geometry::{self, EPSILON};
use crate::scene::GradientDescriptor;
use kurbo::{Point, Vec2};
use peniko::Color;

/// A color stop of a gradient.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    offset: f64,
    color: Color,
    /// Set when the color is fully transparent. Transparent stops stay
    /// pickable; only their rendered color is invisible.
    transparent: bool,
    selected: bool,
}

impl ColorStop {
    /// Create a stop. The offset is clamped to `[0, 1]`.
    pub fn new(color: Color, offset: f64) -> Self {
        Self {
            offset: clamp_offset(offset),
            transparent: fully_transparent(color),
            color,
            selected: false,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = clamp_offset(offset);
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.transparent = fully_transparent(color);
    }

    pub fn opacity(&self) -> f64 {
        f64::from(self.color.components[3])
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

fn fully_transparent(color: Color) -> bool {
    color.components[3] <= 0.0
}

fn clamp_offset(offset: f64) -> f64 {
    if offset.is_nan() {
        0.0
    } else {
        offset.clamp(0.0, 1.0)
    }
}

/// Linear interpolation of all four color channels.
pub fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let t = t as f32;
    let [ar, ag, ab, aa] = a.components;
    let [br, bg, bb, ba] = b.components;
    Color::new([
        ar + (br - ar) * t,
        ag + (bg - ag) * t,
        ab + (bb - ab) * t,
        aa + (ba - aa) * t,
    ])
}

/// Linear or radial gradient being edited.
///
/// Always holds at least two stops.
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<ColorStop>,
    radial: bool,
    origin: Point,
    destination: Point,
}

impl Gradient {
    /// Create a gradient, padding `stops` up to two entries.
    pub fn new(mut stops: Vec<ColorStop>, radial: bool, origin: Point, destination: Point) -> Self {
        match stops.len() {
            0 => {
                log::warn!("gradient without stops, using a transparent one");
                stops.push(ColorStop::new(Color::TRANSPARENT, 0.0));
                stops.push(ColorStop::new(Color::TRANSPARENT, 1.0));
            }
            1 => {
                log::warn!("gradient with a single stop, duplicating it");
                let color = stops[0].color();
                let offset = if stops[0].offset() < 0.5 { 1.0 } else { 0.0 };
                stops.push(ColorStop::new(color, offset));
            }
            _ => {}
        }
        Self {
            stops,
            radial,
            origin,
            destination,
        }
    }

    /// A two-stop linear gradient of a single color.
    pub fn solid(color: Color, origin: Point, destination: Point) -> Self {
        Self::new(
            vec![ColorStop::new(color, 0.0), ColorStop::new(color, 1.0)],
            false,
            origin,
            destination,
        )
    }

    pub fn from_descriptor(desc: &GradientDescriptor) -> Self {
        let stops = desc
            .stops
            .iter()
            .map(|(color, offset)| ColorStop::new(*color, *offset))
            .collect();
        Self::new(stops, desc.radial, desc.origin, desc.destination)
    }

    /// Descriptor in the current stop order.
    pub fn to_descriptor(&self) -> GradientDescriptor {
        GradientDescriptor {
            stops: self.stops.iter().map(|s| (s.color(), s.offset())).collect(),
            radial: self.radial,
            origin: self.origin,
            destination: self.destination,
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn stop(&self, index: usize) -> Option<&ColorStop> {
        self.stops.get(index)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn is_radial(&self) -> bool {
        self.radial
    }

    pub fn set_radial(&mut self, radial: bool) {
        self.radial = radial;
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    pub fn set_endpoints(&mut self, origin: Point, destination: Point) {
        self.origin = origin;
        self.destination = destination;
    }

    pub fn line_vector(&self) -> Vec2 {
        self.destination - self.origin
    }

    /// Unit vector along the line, zero when the endpoints coincide.
    pub fn line_unit(&self) -> Vec2 {
        geometry::normalize_or_zero(self.line_vector())
    }

    /// Parametric position of the projection of `point` on the line.
    /// `None` when the line has no length.
    pub fn offset_of_unclamped(&self, point: Point) -> Option<f64> {
        let length = self.line_vector().hypot();
        if length < EPSILON {
            return None;
        }
        Some((point - self.origin).dot(self.line_unit()) / length)
    }

    /// Like [`Gradient::offset_of_unclamped`], clamped to `[0, 1]`.
    pub fn offset_of(&self, point: Point) -> f64 {
        self.offset_of_unclamped(point).map(clamp_offset).unwrap_or(0.0)
    }

    /// Perpendicular distance of `point` from the infinite line.
    pub fn distance_to_line(&self, point: Point) -> f64 {
        (point - self.origin).cross(self.line_unit()).abs()
    }

    pub fn position_at(&self, offset: f64) -> Point {
        self.origin + self.line_vector() * offset
    }

    /// Color at `offset`, blending the nearest stops on either side.
    pub fn color_at(&self, offset: f64) -> Color {
        let mut prev: Option<&ColorStop> = None;
        let mut next: Option<&ColorStop> = None;
        let mut prev_offset = 0.0;
        let mut next_offset = 1.0;
        for stop in &self.stops {
            let s = stop.offset();
            if prev_offset <= s && s <= offset {
                prev = Some(stop);
                prev_offset = s;
            } else if offset <= s && s <= next_offset {
                next = Some(stop);
                next_offset = s;
            }
        }

        match (prev, next) {
            (Some(p), Some(n)) => {
                let span = next_offset - prev_offset;
                if span < EPSILON {
                    p.color()
                } else {
                    lerp_color(p.color(), n.color(), (offset - prev_offset) / span)
                }
            }
            (Some(p), None) => p.color(),
            (None, Some(n)) => n.color(),
            (None, None) => Color::TRANSPARENT,
        }
    }

    /// A new stop at the projection of `point`, colored like the gradient there.
    pub fn interpolate_stop(&self, point: Point) -> ColorStop {
        let offset = self.offset_of(point);
        ColorStop::new(self.color_at(offset), offset)
    }

    /// Append a stop and return its index.
    pub fn push(&mut self, stop: ColorStop) -> usize {
        self.stops.push(stop);
        self.stops.len() - 1
    }

    pub fn set_offset(&mut self, index: usize, offset: f64) {
        if let Some(stop) = self.stops.get_mut(index) {
            stop.set_offset(offset);
        }
    }

    pub fn set_color(&mut self, index: usize, color: Color) {
        if let Some(stop) = self.stops.get_mut(index) {
            stop.set_color(color);
        }
    }

    /// Delete a stop. With only two stops left the stop is kept and takes the
    /// other stop's color instead. Returns whether the stop was removed.
    pub fn delete_stop(&mut self, index: usize) -> bool {
        if index >= self.stops.len() {
            return false;
        }
        if self.stops.len() <= 2 {
            let other = if index == 0 { 1 } else { 0 };
            let color = self.stops[other].color();
            log::warn!("gradient needs two stops, merging stop {index} into stop {other}");
            self.stops[index].set_color(color);
            self.stops[index].selected = false;
            false
        } else {
            log::debug!("deleted gradient stop {index}");
            self.stops.remove(index);
            true
        }
    }

    /// Mirror every offset, keeping colors and list order.
    pub fn reverse(&mut self) {
        for stop in &mut self.stops {
            stop.set_offset(1.0 - stop.offset());
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.stops.iter().position(|s| s.selected)
    }

    /// Select one stop, or none.
    pub fn select(&mut self, index: Option<usize>) {
        for (i, stop) in self.stops.iter_mut().enumerate() {
            stop.selected = Some(i) == index;
        }
    }
}
