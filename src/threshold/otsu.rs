use image::GrayImage;
use image::imageops::crop_imm;
use imageproc::contrast::otsu_level;
use log::debug;

use crate::grid::{self, binary};

/// Binarize the whole grid at its Otsu level.
pub fn global_otsu(image: &GrayImage) -> GrayImage {
    if grid::is_empty(image) {
        return grid::zeros_like(image);
    }
    let level = otsu_level(image);
    debug!("global_otsu level={level}");
    grid::binarize(image, level)
}

/// Tile the grid into `block_size`×`block_size` blocks and binarize each
/// full block at its own Otsu level.
///
/// Partial blocks along the right and bottom edges are left at 0.
pub fn local_otsu(image: &GrayImage, block_size: u32) -> GrayImage {
    let mut out = grid::zeros_like(image);
    if !grid::window_fits(image, block_size) {
        return out;
    }

    let (width, height) = image.dimensions();
    let mut tiles = 0usize;
    for ty in (0..height).step_by(block_size as usize) {
        for tx in (0..width).step_by(block_size as usize) {
            if tx + block_size > width || ty + block_size > height {
                continue;
            }

            let tile = crop_imm(image, tx, ty, block_size, block_size).to_image();
            let level = otsu_level(&tile);
            for (x, y, p) in tile.enumerate_pixels() {
                out.put_pixel(tx + x, ty + y, binary(p[0] > level));
            }
            tiles += 1;
        }
    }

    debug!("local_otsu block={block_size} tiles={tiles}");
    out
}
