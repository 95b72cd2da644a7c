#![allow(dead_code)]

use image::{GrayImage, Luma, RgbImage, Rgb};
use tempfile::NamedTempFile;

/// Constant-intensity grid.
pub fn flat(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Checkerboard of `cell`-sized squares alternating between `lo` and `hi`.
pub fn checkerboard(size: u32, cell: u32, lo: u8, hi: u8) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        Luma([if (x / cell + y / cell) % 2 == 0 { lo } else { hi }])
    })
}

/// Dark grid with single bright pixels at the given positions.
pub fn impulses(width: u32, height: u32, at: &[(u32, u32)]) -> GrayImage {
    let mut img = flat(width, height, 10);
    for &(x, y) in at {
        img.put_pixel(x, y, Luma([240]));
    }
    img
}

/// Vertical step: `lo` left of column `at`, `hi` from it on.
pub fn step_edge(width: u32, height: u32, at: u32, lo: u8, hi: u8) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| Luma([if x < at { lo } else { hi }]))
}

/// Deterministic pseudo-random texture.
pub fn noise(width: u32, height: u32, seed: u32) -> GrayImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    GrayImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Luma([(state >> 24) as u8])
    })
}

/// Light page with a dark horizontal stroke broken by short gaps.
pub fn broken_stroke(width: u32, height: u32, row: u32, gaps: &[u32]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let on_stroke = y == row && x >= 4 && x + 4 < width && !gaps.contains(&x);
        Luma([if on_stroke { 20 } else { 200 }])
    })
}

/// Writes a small RGB gradient PNG and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let img = RgbImage::from_fn(64, 48, |x, y| {
        Rgb([(x * 255 / 64) as u8, (y * 255 / 48) as u8, 128u8])
    });
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
