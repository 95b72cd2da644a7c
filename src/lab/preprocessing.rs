use image::{DynamicImage, GrayImage};
use imageproc::filter::gaussian_blur_f32;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    if img.width() == 0 || img.height() == 0 || sigma <= 0.0 {
        return img.clone();
    }
    gaussian_blur_f32(img, sigma)
}

/// Share of samples that are foreground (non-zero)
pub fn foreground_ratio(img: &GrayImage) -> f32 {
    let total = img.width() as usize * img.height() as usize;
    if total == 0 {
        return 0.0;
    }
    img.pixels().filter(|p| p[0] != 0).count() as f32 / total as f32
}
