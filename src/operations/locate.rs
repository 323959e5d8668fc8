use crate::math::Point2;

use super::reconstruct::Centerline;

/// Finds the segment whose sagittal outline contains a point.
///
/// Segments are tested in chain order; where outlines overlap the lowest
/// index wins.
pub struct LocateSegment<'a> {
    centerline: &'a Centerline,
    point: Point2,
}

impl<'a> LocateSegment<'a> {
    /// Creates a new `LocateSegment` query.
    #[must_use]
    pub fn new(centerline: &'a Centerline, point: Point2) -> Self {
        Self { centerline, point }
    }

    /// Executes the query, returning the segment index if any outline holds the point.
    #[must_use]
    pub fn execute(&self) -> Option<usize> {
        self.centerline
            .segments
            .iter()
            .position(|s| s.corners.contains(self.point))
    }
}
