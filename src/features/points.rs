use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use log::debug;
use serde::{Deserialize, Serialize};

use super::convolve::{Border, convolve};
use super::kernel::Kernel;
use super::morphology::{StructuringElement, dilate_response};
use crate::grid::{self, ResponseMap, Window};
use crate::threshold;

/// Harris corner detector parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarrisParams {
    /// Side of the window the gradient products are summed over.
    pub block_size: u32,
    /// Harris sensitivity, typically 0.04–0.06.
    pub k: f32,
    /// Fraction of the strongest response a dilated response must exceed.
    pub fraction: f32,
}

impl Default for HarrisParams {
    fn default() -> Self {
        Self {
            block_size: 2,
            k: 0.04,
            fraction: 0.01,
        }
    }
}

/// Point detection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PointMethod {
    /// Laplacian impulse kernel, clipped response above `threshold`.
    Laplacian { threshold: u8 },
    /// Dilated Harris response above a fraction of its maximum.
    Corner(HarrisParams),
    /// Gaussian blur followed by a global Otsu binarization.
    BlurOtsu { sigma: f32 },
}

impl PointMethod {
    pub fn laplacian() -> Self {
        Self::Laplacian { threshold: 127 }
    }

    pub fn corner() -> Self {
        Self::Corner(HarrisParams::default())
    }

    pub fn blur_otsu() -> Self {
        Self::BlurOtsu { sigma: 0.8 }
    }

    /// Default parameters for the method called `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "laplacian" => Some(Self::laplacian()),
            "corner" => Some(Self::corner()),
            "blur_otsu" => Some(Self::blur_otsu()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Laplacian { .. } => "laplacian",
            Self::Corner(_) => "corner",
            Self::BlurOtsu { .. } => "blur_otsu",
        }
    }
}

pub fn detect_points(image: &GrayImage, method: &PointMethod) -> GrayImage {
    if grid::is_empty(image) {
        return grid::zeros_like(image);
    }

    match *method {
        PointMethod::Laplacian { threshold } => {
            let response = laplacian_response(image);
            grid::binarize(&response, threshold)
        }
        PointMethod::Corner(params) => detect_corners(image, &params),
        PointMethod::BlurOtsu { sigma } if sigma > 0.0 => {
            threshold::global_otsu(&gaussian_blur_f32(image, sigma))
        }
        PointMethod::BlurOtsu { .. } => threshold::global_otsu(image),
    }
}

/// Laplacian point response, unnormalized and clipped to 0..=255.
pub fn laplacian_response(image: &GrayImage) -> GrayImage {
    let response = convolve(image, &Kernel::laplacian_point(), Border::Replicate);
    grid::clip_to_gray(&response)
}

/// Harris response `det(M) - k * trace(M)^2`, with `M` the sum of Sobel
/// gradient products over a `block_size` window.
pub fn corner_response(image: &GrayImage, params: &HarrisParams) -> ResponseMap {
    let (w, h) = image.dimensions();
    let gx = convolve(image, &Kernel::sobel_x(), Border::Replicate);
    let gy = convolve(image, &Kernel::sobel_y(), Border::Replicate);

    let block = params.block_size.max(1);
    ResponseMap::from_fn(w, h, |x, y| {
        let (x0, y0, x1, y1) = Window::centered(x, y, block).clip(w, h);
        let (mut sxx, mut syy, mut sxy) = (0.0f32, 0.0f32, 0.0f32);
        for sy in y0..y1 {
            for sx in x0..x1 {
                let dx = gx.get_pixel(sx, sy)[0];
                let dy = gy.get_pixel(sx, sy)[0];
                sxx += dx * dx;
                syy += dy * dy;
                sxy += dx * dy;
            }
        }
        let det = sxx * syy - sxy * sxy;
        let trace = sxx + syy;
        Luma([det - params.k * trace * trace])
    })
}

fn detect_corners(image: &GrayImage, params: &HarrisParams) -> GrayImage {
    let response = corner_response(image, params);
    let dilated = dilate_response(&response, &StructuringElement::default());

    let peak = grid::max_response(&dilated).unwrap_or(0.0);
    debug!("corner peak response={peak}");
    if peak <= 0.0 {
        return grid::zeros_like(image);
    }
    grid::binarize_response(&dilated, params.fraction * peak)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laplacian_flags_isolated_pixel_only() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([20]));
        img.put_pixel(4, 4, Luma([220]));
        let out = detect_points(&img, &PointMethod::laplacian());
        assert_eq!(out.get_pixel(4, 4)[0], 255);
        assert_eq!(out.pixels().filter(|p| p[0] == 255).count(), 1);
    }

    #[test]
    fn corner_response_is_zero_on_flat_grid() {
        let img = GrayImage::from_pixel(8, 8, Luma([50]));
        let r = corner_response(&img, &HarrisParams::default());
        assert!(r.pixels().all(|p| p[0] == 0.0));
        let out = detect_points(&img, &PointMethod::corner());
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn corner_fires_near_square_corner() {
        let img = GrayImage::from_fn(24, 24, |x, y| {
            Luma([if (8..16).contains(&x) && (8..16).contains(&y) { 255 } else { 0 }])
        });
        let out = detect_points(&img, &PointMethod::corner());
        let near_corner = (6..11).any(|y| (6..11).any(|x| out.get_pixel(x, y)[0] == 255));
        assert!(near_corner);
        assert_eq!(out.get_pixel(0, 23)[0], 0);
        assert_eq!(out.get_pixel(12, 12)[0], 0);
    }
}
