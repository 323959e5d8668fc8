//! Planar vector and angle helpers shared by the curvature and outlet math.
use std::f64::consts::{PI, TAU};

use super::{Vector2, TOLERANCE};

/// Returns `v` scaled to unit length.
///
/// Vectors no longer than [`TOLERANCE`] map to `(1, 0)`. This is a fallback
/// value, not an error.
#[must_use]
pub fn normalize(v: Vector2) -> Vector2 {
    normalize_with(v, TOLERANCE)
}

/// [`normalize`] with an explicit length threshold.
#[must_use]
pub fn normalize_with(v: Vector2, eps: f64) -> Vector2 {
    let len = v.norm();
    if len > eps {
        v / len
    } else {
        Vector2::new(1.0, 0.0)
    }
}

/// Wraps an angle into `(-π, π]`.
///
/// Angles already in range are returned unchanged.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    // `rem_euclid` lands in [0, TAU] once rounding is accounted for.
    let a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a + TAU
    } else if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Rotates `v` counter-clockwise by `angle` radians. The result is not normalized.
#[must_use]
pub fn rotate(v: Vector2, angle: f64) -> Vector2 {
    let (s, c) = angle.sin_cos();
    Vector2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// Direction of travel for a section normal: the normal rotated by -90°.
#[must_use]
pub fn tangent_of(normal: Vector2) -> Vector2 {
    Vector2::new(normal.y, -normal.x)
}
