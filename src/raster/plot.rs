use image::{GrayImage, Luma};

use crate::error::GridError;
use crate::models::PointSequence;

const PAPER: Luma<u8> = Luma([255]);
const INK: Luma<u8> = Luma([0]);

/// Render points as black pixels on a white canvas sized to their bounding
/// box plus `padding` on every side.
///
/// The y axis points up, as on a plot: the largest `y` lands on the top row.
/// Fails when the canvas side would not fit in a `u32`.
pub fn plot_points(points: &PointSequence, padding: u32) -> Result<GrayImage, GridError> {
    let pad = u64::from(padding);
    let Some((lo, hi)) = points.bounds() else {
        let side = 2 * pad + 1;
        let side = u32::try_from(side).map_err(|_| GridError::CanvasTooLarge {
            width: side,
            height: side,
        })?;
        return Ok(GrayImage::from_pixel(side, side, PAPER));
    };

    let span = |a: i32, b: i32| (i64::from(b) - i64::from(a)) as u64;
    let width = span(lo.x, hi.x) + 1 + 2 * pad;
    let height = span(lo.y, hi.y) + 1 + 2 * pad;
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(GridError::CanvasTooLarge { width, height });
    };

    let mut canvas = GrayImage::from_pixel(w, h, PAPER);
    for p in points {
        // Both offsets are below the side lengths checked above.
        let col = (span(lo.x, p.x) + pad) as u32;
        let row = (span(p.y, hi.y) + pad) as u32;
        canvas.put_pixel(col, row, INK);
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn plots_with_flipped_y() {
        let pts: PointSequence = [Point::new(0, 0), Point::new(2, 1)].into_iter().collect();
        let canvas = plot_points(&pts, 1).unwrap();
        assert_eq!(canvas.dimensions(), (5, 4));
        assert_eq!(canvas.get_pixel(1, 2)[0], 0);
        assert_eq!(canvas.get_pixel(3, 1)[0], 0);
        assert_eq!(canvas.pixels().filter(|p| p[0] == 0).count(), 2);
    }

    #[test]
    fn empty_sequence_gives_blank_canvas() {
        let canvas = plot_points(&PointSequence::new(), 2).unwrap();
        assert_eq!(canvas.dimensions(), (5, 5));
        assert!(canvas.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn canvas_wider_than_a_grid_is_rejected() {
        let pts: PointSequence = [Point::new(i32::MIN, 0), Point::new(i32::MAX, 0)]
            .into_iter()
            .collect();
        assert_eq!(
            plot_points(&pts, 0),
            Err(GridError::CanvasTooLarge {
                width: 1 << 32,
                height: 1
            })
        );
    }
}
