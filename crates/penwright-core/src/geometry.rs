//! Degree-based affine helpers.
//!
//! Angles in this crate are expressed in degrees with the y axis pointing
//! down, so a positive angle turns clockwise on screen.

use kurbo::{Affine, Point, Vec2};

/// Values closer to zero than this are treated as degenerate.
pub const EPSILON: f64 = 1e-9;

/// Rotation by `degrees` around `center`.
pub fn rotate_about(degrees: f64, center: Point) -> Affine {
    about(Affine::rotate(degrees.to_radians()), center)
}

/// Non-uniform scale by `factor` around `center`.
pub fn scale_about(factor: Vec2, center: Point) -> Affine {
    about(Affine::scale_non_uniform(factor.x, factor.y), center)
}

/// Conjugate `matrix` so that it operates around `center` instead of the origin.
pub fn about(matrix: Affine, center: Point) -> Affine {
    let c = center.to_vec2();
    Affine::translate(c) * matrix * Affine::translate(-c)
}

/// Rotate a single point by `degrees` around `center`.
pub fn rotate_point(point: Point, degrees: f64, center: Point) -> Point {
    rotate_about(degrees, center) * point
}

/// Angle of a vector in degrees, measured from the positive x axis.
pub fn angle_of(v: Vec2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

/// Unit vector pointing at `degrees`.
pub fn unit_at(degrees: f64) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Round an angle to the nearest multiple of 45 degrees.
pub fn snap_angle_45(degrees: f64) -> f64 {
    (degrees / 45.0).round() * 45.0
}

/// Project `v` onto the nearest of the eight 45-degree directions.
pub fn snap_vector_45(v: Vec2) -> Vec2 {
    let unit = unit_at(snap_angle_45(angle_of(v)));
    unit * v.dot(unit)
}

/// Unit vector along `v`, or zero for a zero-length vector.
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < EPSILON { Vec2::ZERO } else { v / len }
}

/// Vector along `v` with the given length. A zero vector is treated as
/// pointing along the positive x axis.
pub fn with_length(v: Vec2, length: f64) -> Vec2 {
    let unit = normalize_or_zero(v);
    if unit == Vec2::ZERO {
        Vec2::new(length, 0.0)
    } else {
        unit * length
    }
}

/// Component-wise division. Components that would not be finite fall back to 1.
pub fn div_components(a: Vec2, b: Vec2) -> Vec2 {
    let fx = a.x / b.x;
    let fy = a.y / b.y;
    Vec2::new(
        if fx.is_finite() { fx } else { 1.0 },
        if fy.is_finite() { fy } else { 1.0 },
    )
}

/// Make the smaller-magnitude axis match the larger one, keeping its sign.
///
/// A zero component stays zero.
pub fn uniform_scale(factor: Vec2) -> Vec2 {
    let sign = |v: f64| if v == 0.0 { 0.0 } else { v.signum() };
    if factor.x.abs() < factor.y.abs() {
        Vec2::new(sign(factor.x) * factor.y.abs(), factor.y)
    } else {
        Vec2::new(factor.x, sign(factor.y) * factor.x.abs())
    }
}

/// Check two points for equality within `tolerance`.
pub fn points_close(a: Point, b: Point, tolerance: f64) -> bool {
    (a - b).hypot() <= tolerance
}

/// Check two affines for coefficient-wise equality within `tolerance`.
pub fn affines_close(a: Affine, b: Affine, tolerance: f64) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() <= tolerance)
}
