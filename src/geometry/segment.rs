use crate::math::arc_2d::Curvature;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{Point2, Vector2};

use super::section::FramedSection;

/// The four global corner points bounding a segment's sagittal outline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentCorners {
    pub entry_min: Point2,
    pub entry_max: Point2,
    pub exit_min: Point2,
    pub exit_max: Point2,
}

impl SegmentCorners {
    /// Places the entry section's depth bounds at both faces of its segment.
    ///
    /// The entry face uses `entry.scale_in`, the exit face `entry.scale_out`.
    /// Both faces share the entry section's bounds.
    #[must_use]
    pub fn derive(entry: &FramedSection, exit_point: Point2, exit_normal: Vector2) -> Self {
        let bounds = entry.depth_bounds;
        Self {
            entry_min: offset(entry.point, entry.normal, bounds.min, entry.scale_in),
            entry_max: offset(entry.point, entry.normal, bounds.max, entry.scale_in),
            exit_min: offset(exit_point, exit_normal, bounds.min, entry.scale_out),
            exit_max: offset(exit_point, exit_normal, bounds.max, entry.scale_out),
        }
    }

    /// Corners in boundary order: `entry_min, entry_max, exit_max, exit_min`.
    #[must_use]
    pub fn outline(&self) -> [Point2; 4] {
        [self.entry_min, self.entry_max, self.exit_max, self.exit_min]
    }

    /// Returns whether `point` lies inside the outline.
    #[must_use]
    pub fn contains(&self, point: Point2) -> bool {
        point_in_polygon(point, &self.outline())
    }
}

fn offset(point: Point2, normal: Vector2, bound: f64, scale: f64) -> Point2 {
    point + normal * bound * scale
}

/// Reconstructed transition between a section and its successor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Distance between the two sections' entry points.
    pub length: f64,
    /// Signed radius, `+∞` for parallel normals.
    pub curvature_radius: f64,
    /// Turning angle in `(-π, π]`.
    pub curvature_angle: f64,
    /// End of the arc reconstructed from the entry frame; not necessarily
    /// the next section's own point.
    pub exit_point: Point2,
    /// Unit normal at `exit_point`.
    pub exit_normal: Vector2,
    pub corners: SegmentCorners,
}

impl Segment {
    /// Curvature as a single value.
    #[must_use]
    pub fn curvature(&self) -> Curvature {
        Curvature {
            radius: self.curvature_radius,
            angle: self.curvature_angle,
        }
    }
}
