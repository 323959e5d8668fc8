use tracing::{debug, warn};

use crate::geometry::{FramedSection, PreparedSection, Section};
use crate::math::vector_2d::normalize;

/// Normalizes a section's normal and recenters its depth axis.
///
/// # Algorithm
///
/// 1. The normal is scaled to unit length (`(1, 0)` for a zero normal).
/// 2. The depth midline `(min + max) / 2` is subtracted from every depth value.
/// 3. The reference point is pushed along the unit normal by the midline,
///    so the contour keeps its global position while its local frame moves.
///
/// Lateral values are never touched. An empty contour has a zero midline and
/// `(0, 0)` bounds in both framings.
#[derive(Debug)]
pub struct PrepareSection<'a> {
    section: &'a Section,
}

impl<'a> PrepareSection<'a> {
    /// Creates a new preparation for `section`.
    #[must_use]
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    /// Executes the preparation.
    #[must_use]
    pub fn execute(&self) -> PreparedSection {
        let section = self.section;
        let unit_normal = normalize(section.normal());
        let contour = section.contour();

        if contour.is_empty() {
            warn!(
                x = section.reference_point().x,
                y = section.reference_point().y,
                "section has no contour points"
            );
        }

        let original_bounds = contour.depth_bounds();
        let depth_midline = if contour.is_empty() {
            0.0
        } else {
            original_bounds.midline()
        };

        let adjusted_contour = contour.shift_depth(depth_midline);
        let adjusted_bounds = adjusted_contour.depth_bounds();
        let adjusted_point = section.reference_point() + unit_normal * depth_midline;

        debug!(depth_midline, points = contour.len(), "prepared section");

        PreparedSection {
            depth_midline,
            unit_normal,
            adjusted: FramedSection {
                point: adjusted_point,
                normal: unit_normal,
                scale_in: section.scale_in(),
                scale_out: section.scale_out(),
                depth_bounds: adjusted_bounds,
            },
            original: FramedSection {
                point: section.reference_point(),
                normal: unit_normal,
                scale_in: section.scale_in(),
                scale_out: section.scale_out(),
                depth_bounds: original_bounds,
            },
            adjusted_contour,
            original_contour: contour.clone(),
        }
    }
}

/// Prepares every section of a chain, preserving order.
#[must_use]
pub fn prepare_all(sections: &[Section]) -> Vec<PreparedSection> {
    sections
        .iter()
        .map(|s| PrepareSection::new(s).execute())
        .collect()
}
