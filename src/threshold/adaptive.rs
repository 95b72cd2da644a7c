use image::{GrayImage, Luma};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::{self, ResponseMap, binary};

/// How the local estimate is weighted over the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveMethod {
    Mean,
    Gaussian,
}

/// Which side of the local estimate becomes foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Above the estimate becomes 255.
    #[default]
    Binary,
    /// Above the estimate becomes 0.
    Inverted,
}

/// Adaptive threshold against `local_estimate - constant`.
///
/// The comparison runs on integers: the local estimate is rounded to the
/// nearest sample value before the constant is applied. A negative
/// `constant` raises the threshold; that is a valid configuration, not an
/// error.
pub fn adaptive_threshold(
    image: &GrayImage,
    block_size: u32,
    constant: f32,
    method: AdaptiveMethod,
    polarity: Polarity,
) -> GrayImage {
    if !grid::window_fits(image, block_size) {
        return grid::zeros_like(image);
    }

    let estimate = match method {
        AdaptiveMethod::Mean => grid::local_mean(image, block_size),
        AdaptiveMethod::Gaussian => gaussian_local_mean(image, block_size),
    };
    debug!("adaptive_threshold block={block_size} c={constant} method={method:?} polarity={polarity:?}");

    // The estimate is rounded to a sample value and the constant to an
    // integer, ceiling for binary output and floor for inverted.
    let constant = match polarity {
        Polarity::Binary => constant.ceil(),
        Polarity::Inverted => constant.floor(),
    };
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let level = estimate.get_pixel(x, y)[0].round_ties_even();
        let above = image.get_pixel(x, y)[0] as f32 > level - constant;
        match polarity {
            Polarity::Binary => binary(above),
            Polarity::Inverted => binary(!above),
        }
    })
}

/// Sigma used for a Gaussian window of `size` taps when none is given.
pub fn default_sigma(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian weights, anchored at `size / 2`.
pub fn gaussian_weights(size: u32, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-d * d / denom).exp()
        })
        .collect();
    let total: f32 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Gaussian-weighted local mean. Taps falling outside the grid are dropped
/// and the remaining weights renormalized.
fn gaussian_local_mean(image: &GrayImage, block_size: u32) -> ResponseMap {
    let weights = gaussian_weights(block_size, default_sigma(block_size));
    let rows = weighted_pass(&grid::to_response(image), &weights, true);
    weighted_pass(&rows, &weights, false)
}

fn weighted_pass(src: &ResponseMap, weights: &[f32], horizontal: bool) -> ResponseMap {
    let (w, h) = src.dimensions();
    let half = (weights.len() / 2) as i64;
    let len = i64::from(if horizontal { w } else { h });

    ResponseMap::from_fn(w, h, |x, y| {
        let center = i64::from(if horizontal { x } else { y });
        let mut acc = 0.0f32;
        let mut norm = 0.0f32;
        for (i, &wt) in weights.iter().enumerate() {
            let pos = center + i as i64 - half;
            if pos < 0 || pos >= len {
                continue;
            }
            let v = if horizontal {
                src.get_pixel(pos as u32, y)[0]
            } else {
                src.get_pixel(x, pos as u32)[0]
            };
            acc += wt * v;
            norm += wt;
        }
        Luma([if norm > 0.0 { acc / norm } else { 0.0 }])
    })
}
