use image::GrayImage;
use log::debug;

use crate::grid::{self, binary};

/// Niblack local threshold: `T(x, y) = mean + k * stddev` over a
/// `window_size`×`window_size` window, pixels strictly above `T` become 255.
///
/// `k` is usually negative (around -0.2). Border pixels are thresholded
/// against windows clipped to the grid.
pub fn niblack(image: &GrayImage, window_size: u32, k: f32) -> GrayImage {
    if !grid::window_fits(image, window_size) {
        return grid::zeros_like(image);
    }

    let (mean, stddev) = grid::local_mean_stddev(image, window_size);
    debug!("niblack window={window_size} k={k}");

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let level = mean.get_pixel(x, y)[0] + k * stddev.get_pixel(x, y)[0];
        binary(image.get_pixel(x, y)[0] as f32 > level)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn flat_grid_is_all_background() {
        let img = GrayImage::from_pixel(10, 10, Luma([128]));
        let out = niblack(&img, 5, -0.2);
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn negative_k_lowers_threshold() {
        // A single bright column; with k < 0 its dark neighbours stay dark
        // while the column itself clears the lowered threshold.
        let img = GrayImage::from_fn(9, 9, |x, _| Luma([if x == 4 { 200 } else { 50 }]));
        let out = niblack(&img, 3, -0.2);
        assert_eq!(out.get_pixel(4, 4)[0], 255);
        assert_eq!(out.get_pixel(0, 4)[0], 0);
    }
}
