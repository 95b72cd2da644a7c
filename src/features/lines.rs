use image::GrayImage;
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

use super::convolve::{Border, convolve};
use super::kernel::Kernel;
use super::morphology::{StructuringElement, close};
use crate::grid;
use crate::threshold::{AdaptiveMethod, Polarity, adaptive_threshold};

/// Line detection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LineMethod {
    /// 45° matched filter, clipped response above `threshold`.
    DirectionalKernel { threshold: u8 },
    /// Inverted adaptive mean threshold, then closing with an elongated
    /// element to join broken strokes along its long axis.
    MorphClose {
        block_size: u32,
        constant: f32,
        element: StructuringElement,
    },
    /// Canny: gradient, non-maximum suppression, hysteresis.
    Canny { low: f32, high: f32 },
}

impl LineMethod {
    pub fn directional_kernel() -> Self {
        Self::DirectionalKernel { threshold: 127 }
    }

    pub fn morph_close() -> Self {
        Self::MorphClose {
            block_size: 15,
            constant: -2.0,
            element: StructuringElement::rect(9, 1),
        }
    }

    pub fn canny() -> Self {
        Self::Canny {
            low: 100.0,
            high: 200.0,
        }
    }

    /// Default parameters for the method called `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "directional_kernel" => Some(Self::directional_kernel()),
            "morph_close" => Some(Self::morph_close()),
            "canny" => Some(Self::canny()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectionalKernel { .. } => "directional_kernel",
            Self::MorphClose { .. } => "morph_close",
            Self::Canny { .. } => "canny",
        }
    }
}

pub fn detect_lines(image: &GrayImage, method: &LineMethod) -> GrayImage {
    if grid::is_empty(image) {
        return grid::zeros_like(image);
    }

    match *method {
        LineMethod::DirectionalKernel { threshold } => {
            grid::binarize(&diagonal_response(image), threshold)
        }
        LineMethod::MorphClose {
            block_size,
            constant,
            element,
        } => {
            let strokes = adaptive_threshold(
                image,
                block_size,
                constant,
                AdaptiveMethod::Mean,
                Polarity::Inverted,
            );
            close(&strokes, &element)
        }
        // Swapped thresholds are accepted and reordered.
        LineMethod::Canny { low, high } => canny(image, low.min(high), low.max(high)),
    }
}

/// Response of the 45° line kernel, clipped to 0..=255.
pub fn diagonal_response(image: &GrayImage) -> GrayImage {
    let response = convolve(image, &Kernel::diagonal_45(), Border::Replicate);
    grid::clip_to_gray(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rising_diagonal(size: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            Luma([if x + y == size - 1 { 255 } else { 0 }])
        })
    }

    #[test]
    fn directional_kernel_prefers_rising_diagonal() {
        let rising = detect_lines(&rising_diagonal(11), &LineMethod::directional_kernel());
        assert_eq!(rising.get_pixel(5, 5)[0], 255);

        let falling = GrayImage::from_fn(11, 11, |x, y| Luma([if x == y { 255 } else { 0 }]));
        let out = detect_lines(&falling, &LineMethod::directional_kernel());
        assert_eq!(out.get_pixel(5, 5)[0], 0);
    }

    #[test]
    fn canny_accepts_swapped_thresholds() {
        let img = GrayImage::from_fn(20, 20, |x, _| Luma([if x < 10 { 10 } else { 240 }]));
        let swapped = detect_lines(&img, &LineMethod::Canny { low: 200.0, high: 100.0 });
        let ordered = detect_lines(&img, &LineMethod::Canny { low: 100.0, high: 200.0 });
        assert_eq!(swapped, ordered);
        assert!(swapped.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn canny_on_flat_grid_is_empty() {
        let img = GrayImage::from_pixel(16, 16, Luma([90]));
        let out = detect_lines(&img, &LineMethod::canny());
        assert!(out.pixels().all(|p| p[0] == 0));
    }
}
