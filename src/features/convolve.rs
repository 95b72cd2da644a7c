//! 2D correlation of a grid with a [`Kernel`].
//!
//! Replicate padding is the default: taps beyond the grid read the nearest
//! edge sample, so a constant grid has zero derivative everywhere,
//! including the outermost rows and columns.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use super::kernel::Kernel;
use crate::grid::{self, ResponseMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Border {
    /// Clamp-to-edge.
    #[default]
    Replicate,
    /// Taps outside the grid contribute nothing.
    Zero,
}

pub fn convolve(image: &GrayImage, kernel: &Kernel, border: Border) -> ResponseMap {
    convolve_map(&grid::to_response(image), kernel, border)
}

pub fn convolve_map(src: &ResponseMap, kernel: &Kernel, border: Border) -> ResponseMap {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return ResponseMap::new(w, h);
    }

    let (ax, ay) = kernel.anchor();
    let (ax, ay) = (ax as i64, ay as i64);
    let (wi, hi) = (w as i64, h as i64);

    ResponseMap::from_fn(w, h, |x, y| {
        let mut acc = 0.0f32;
        for j in 0..kernel.height() {
            let sy = y as i64 + j as i64 - ay;
            for i in 0..kernel.width() {
                let sx = x as i64 + i as i64 - ax;
                let inside = (0..wi).contains(&sx) && (0..hi).contains(&sy);
                let v = match (inside, border) {
                    (true, _) => src.get_pixel(sx as u32, sy as u32)[0],
                    (false, Border::Zero) => continue,
                    (false, Border::Replicate) => {
                        src.get_pixel(sx.clamp(0, wi - 1) as u32, sy.clamp(0, hi - 1) as u32)[0]
                    }
                };
                acc += kernel.weight(i, j) * v;
            }
        }
        Luma([acc])
    })
}
