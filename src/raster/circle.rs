use crate::models::{Point, PointSequence};

/// Midpoint circle of `radius` around `(cx, cy)`; `center ± radius` must fit in `i32`.
///
/// Each step of the first octant emits its eight reflections, so points on
/// the axes and on the diagonal are emitted more than once. A negative
/// radius yields an empty sequence.
pub fn rasterize_circle(cx: i32, cy: i32, radius: i32) -> PointSequence {
    if radius < 0 {
        return PointSequence::new();
    }

    let mut points = PointSequence::with_capacity(8 * (radius as usize + 1));
    let mut x = radius;
    let mut y = 0;
    let mut decision = 1 - radius;

    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            points.push(Point::new(px, py));
        }

        y += 1;
        if decision <= 0 {
            decision += 2 * y + 1;
        } else {
            x -= 1;
            decision += 2 * (y - x) + 1;
        }
    }

    points
}

/// Number of first-octant steps the midpoint loop takes for `radius`.
pub fn octant_steps(radius: i32) -> usize {
    rasterize_circle(0, 0, radius).len() / 8
}
