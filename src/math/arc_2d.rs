//! Circular-arc transitions between oriented section frames.
//!
//! Sign conventions:
//! - a section normal `n` points across the duct; the direction of travel
//!   along the centerline is `n` rotated by -90°, i.e. `(n.y, -n.x)`
//! - `angle > 0`: the normal turns counter-clockwise from entry to exit
//! - `radius` is signed; its sign relative to `angle` selects which side of
//!   the chord the arc lies on
//! - `radius = +∞`: parallel normals, the transition is straight
use std::f64::consts::FRAC_PI_2;

use super::vector_2d::{normalize_angle, normalize_with, rotate, tangent_of};
use super::{Point2, Vector2, TOLERANCE};

/// Signed arc radius and normal-to-normal turning angle between two frames.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curvature {
    /// Signed radius, `f64::INFINITY` when the normals are parallel.
    pub radius: f64,
    /// Turning angle in `(-π, π]`.
    pub angle: f64,
}

impl Curvature {
    /// Returns `true` when no finite-radius arc connects the two frames.
    #[must_use]
    pub fn is_straight(&self) -> bool {
        !self.radius.is_finite()
    }
}

/// Computes the curvature connecting `(p1, n1)` to `(p2, n2)`.
///
/// Both normals are expected to be unit length.
#[must_use]
pub fn curvature_between(p1: Point2, n1: Vector2, p2: Point2, n2: Vector2) -> Curvature {
    curvature_between_with(p1, n1, p2, n2, TOLERANCE)
}

/// [`curvature_between`] with an explicit parallel-normal threshold.
#[must_use]
pub fn curvature_between_with(
    p1: Point2,
    n1: Vector2,
    p2: Point2,
    n2: Vector2,
    eps: f64,
) -> Curvature {
    let d = p2 - p1;
    let cross_displacement_n2 = d.x * n2.y - d.y * n2.x;
    let cross_n2_n1 = n2.x * n1.y - n2.y * n1.x;

    let radius = if cross_n2_n1.abs() > eps {
        -cross_displacement_n2 / cross_n2_n1
    } else {
        f64::INFINITY
    };

    let angle = normalize_angle(n2.y.atan2(n2.x) - n1.y.atan2(n1.x));

    Curvature { radius, angle }
}

/// Computes the exit point and exit normal of an arc leaving `point` with
/// normal `normal`.
///
/// Returns `(exit_point, exit_normal)`.
#[must_use]
pub fn arc_outlet(
    point: Point2,
    normal: Vector2,
    length: f64,
    radius: f64,
    angle: f64,
) -> (Point2, Vector2) {
    arc_outlet_with(point, normal, length, radius, angle, TOLERANCE)
}

/// [`arc_outlet`] with an explicit tolerance for near-zero length and angle.
#[must_use]
pub fn arc_outlet_with(
    point: Point2,
    normal: Vector2,
    length: f64,
    radius: f64,
    angle: f64,
    eps: f64,
) -> (Point2, Vector2) {
    let exit_normal = normalize_with(rotate(normal, angle), eps);

    if length <= eps {
        return (point, exit_normal);
    }

    if angle.abs() <= eps || !radius.is_finite() {
        return (point + tangent_of(normal) * length, exit_normal);
    }

    let theta = angle.abs() * 0.5;
    let chord = 2.0 * radius.abs() * theta.sin();

    // The two branches rotate about opposite normals; they must stay separate.
    let translation = if signs_differ(radius, angle) {
        rotate(-normal, FRAC_PI_2 - theta) * -chord
    } else {
        rotate(normal, theta - FRAC_PI_2) * chord
    };

    (point + translation, exit_normal)
}

/// `true` when `radius` and `angle` are both nonzero with opposite signs.
#[allow(clippy::float_cmp)]
fn signs_differ(radius: f64, angle: f64) -> bool {
    if radius == 0.0 || angle == 0.0 {
        return false;
    }
    radius.signum() != angle.signum()
}
