use crate::models::{Point, PointSequence};

/// Step direction with `sign(0) = +1`.
#[inline]
fn step(from: i32, to: i32) -> i32 {
    if to >= from { 1 } else { -1 }
}

/// Bresenham line from `(x1, y1)` to `(x2, y2)`.
///
/// The loop runs along the dominant axis (`x` only when `|dx| > |dy|`),
/// emitting one point per step, and the exact endpoint is appended last.
/// Integer arithmetic only; deltas and the error term are `i64`, so any
/// pair of `i32` endpoints is valid.
pub fn rasterize_line(x1: i32, y1: i32, x2: i32, y2: i32) -> PointSequence {
    let sx = step(x1, x2);
    let sy = step(y1, y2);
    let dx = (i64::from(x2) - i64::from(x1)).abs();
    let dy = (i64::from(y2) - i64::from(y1)).abs();

    let mut points = PointSequence::with_capacity(dx.max(dy) as usize + 1);
    let (mut x, mut y) = (x1, y1);

    if dx > dy {
        let mut err = dx / 2;
        while x != x2 {
            points.push(Point::new(x, y));
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy / 2;
        while y != y2 {
            points.push(Point::new(x, y));
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    points.push(Point::new(x2, y2));
    points
}
