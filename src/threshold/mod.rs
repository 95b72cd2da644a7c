//! Thresholding engine: grayscale grid in, binary grid out.
//!
//! Every operation answers a degenerate request (empty grid, zero-sized
//! window, window larger than the grid) with an all-zero grid of the input
//! shape.

pub mod adaptive;
pub mod bernsen;
pub mod niblack;
pub mod otsu;

pub use adaptive::{AdaptiveMethod, Polarity, adaptive_threshold};
pub use bernsen::bernsen;
pub use niblack::niblack;
pub use otsu::{global_otsu, local_otsu};

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Thresholding strategies behind one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ThresholdMethod {
    LocalOtsu {
        block_size: u32,
    },
    Bernsen {
        window_size: u32,
        contrast_threshold: u8,
    },
    Niblack {
        window_size: u32,
        k: f32,
    },
    Adaptive {
        block_size: u32,
        constant: f32,
        mode: AdaptiveMethod,
        #[serde(default)]
        polarity: Polarity,
    },
}

impl ThresholdMethod {
    pub fn local_otsu() -> Self {
        Self::LocalOtsu { block_size: 10 }
    }

    pub fn bernsen() -> Self {
        Self::Bernsen {
            window_size: 15,
            contrast_threshold: 15,
        }
    }

    pub fn niblack() -> Self {
        Self::Niblack {
            window_size: 15,
            k: -0.2,
        }
    }

    pub fn adaptive_gaussian() -> Self {
        Self::Adaptive {
            block_size: 7,
            constant: 0.0,
            mode: AdaptiveMethod::Gaussian,
            polarity: Polarity::Binary,
        }
    }

    pub fn adaptive_mean() -> Self {
        Self::Adaptive {
            block_size: 7,
            constant: 0.0,
            mode: AdaptiveMethod::Mean,
            polarity: Polarity::Binary,
        }
    }

    /// Default parameters for the method called `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "local_otsu" => Some(Self::local_otsu()),
            "bernsen" => Some(Self::bernsen()),
            "niblack" => Some(Self::niblack()),
            "adaptive_mean" => Some(Self::adaptive_mean()),
            "adaptive_gaussian" => Some(Self::adaptive_gaussian()),
            _ => None,
        }
    }

    /// Replace the window/block size and the method's scalar parameter:
    /// contrast threshold (Bernsen), `k` (Niblack) or constant (adaptive).
    /// Local Otsu has no scalar parameter.
    pub fn with_overrides(mut self, size: Option<u32>, param: Option<f32>) -> Self {
        match &mut self {
            Self::LocalOtsu { block_size } => {
                if let Some(s) = size {
                    *block_size = s;
                }
            }
            Self::Bernsen {
                window_size,
                contrast_threshold,
            } => {
                if let Some(s) = size {
                    *window_size = s;
                }
                if let Some(p) = param {
                    *contrast_threshold = p.clamp(0.0, 255.0) as u8;
                }
            }
            Self::Niblack { window_size, k } => {
                if let Some(s) = size {
                    *window_size = s;
                }
                if let Some(p) = param {
                    *k = p;
                }
            }
            Self::Adaptive {
                block_size,
                constant,
                ..
            } => {
                if let Some(s) = size {
                    *block_size = s;
                }
                if let Some(p) = param {
                    *constant = p;
                }
            }
        }
        self
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalOtsu { .. } => "local_otsu",
            Self::Bernsen { .. } => "bernsen",
            Self::Niblack { .. } => "niblack",
            Self::Adaptive {
                mode: AdaptiveMethod::Mean,
                ..
            } => "adaptive_mean",
            Self::Adaptive {
                mode: AdaptiveMethod::Gaussian,
                ..
            } => "adaptive_gaussian",
        }
    }

    pub fn apply(&self, image: &GrayImage) -> GrayImage {
        match *self {
            Self::LocalOtsu { block_size } => local_otsu(image, block_size),
            Self::Bernsen {
                window_size,
                contrast_threshold,
            } => bernsen(image, window_size, contrast_threshold),
            Self::Niblack { window_size, k } => niblack(image, window_size, k),
            Self::Adaptive {
                block_size,
                constant,
                mode,
                polarity,
            } => adaptive_threshold(image, block_size, constant, mode, polarity),
        }
    }
}
