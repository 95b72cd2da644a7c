use image::{GrayImage, Luma};
use log::debug;
use serde::{Deserialize, Serialize};

use super::convolve::{Border, convolve};
use super::kernel::Kernel;
use crate::grid::{self, ResponseMap};

/// Magnitude above which a pixel counts as an edge.
pub const EDGE_THRESHOLD: f32 = 50.0;

/// 3×3 derivative kernel pair feeding the shared magnitude pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientOperator {
    Sobel,
    Prewitt,
}

impl GradientOperator {
    /// `(horizontal, vertical)` derivative kernels.
    pub fn kernels(&self) -> (Kernel, Kernel) {
        match self {
            Self::Sobel => (Kernel::sobel_x(), Kernel::sobel_y()),
            Self::Prewitt => (Kernel::prewitt_x(), Kernel::prewitt_y()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sobel => "sobel",
            Self::Prewitt => "prewitt",
        }
    }
}

/// Euclidean gradient magnitude `sqrt(gx² + gy²)`.
pub fn gradient_magnitude(image: &GrayImage, operator: GradientOperator) -> ResponseMap {
    let (kx, ky) = operator.kernels();
    let gx = convolve(image, &kx, Border::Replicate);
    let gy = convolve(image, &ky, Border::Replicate);

    ResponseMap::from_fn(image.width(), image.height(), |x, y| {
        let dx = gx.get_pixel(x, y)[0];
        let dy = gy.get_pixel(x, y)[0];
        Luma([dx.hypot(dy)])
    })
}

/// Gradient magnitude binarized at `threshold`.
pub fn detect_edges(image: &GrayImage, operator: GradientOperator, threshold: f32) -> GrayImage {
    if grid::is_empty(image) {
        return grid::zeros_like(image);
    }
    let magnitude = gradient_magnitude(image, operator);
    debug!(
        "detect_edges operator={} peak={:?}",
        operator.name(),
        grid::max_response(&magnitude)
    );
    grid::binarize_response(&magnitude, threshold)
}
