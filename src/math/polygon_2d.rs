use super::Point2;

/// Tests whether `point` lies inside the closed polygon `vertices`
/// (even-odd rule, last vertex connects back to the first).
///
/// Points exactly on an edge may report either side. Polygons with fewer
/// than three vertices contain nothing.
#[must_use]
pub fn point_in_polygon(point: Point2, vertices: &[Point2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];
        // Edge straddles the horizontal ray through `point`.
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
