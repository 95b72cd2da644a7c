use image::GrayImage;
use log::debug;

use crate::grid::{self, Window, binary};

/// Gray level separating dark from bright in low-contrast windows.
pub const GRAY_MIDPOINT: u16 = 127;

/// Bernsen local threshold.
///
/// For each pixel at least `window_size / 2` away from every border the
/// local min/max over a `window_size`×`window_size` window is taken. When
/// the window contrast `max - min` is below `contrast_threshold` the window
/// is considered uniform and its midpoint is compared against
/// [`GRAY_MIDPOINT`]; otherwise the pixel is compared against the midpoint
/// itself. Border pixels are never written.
pub fn bernsen(image: &GrayImage, window_size: u32, contrast_threshold: u8) -> GrayImage {
    let mut out = grid::zeros_like(image);
    if !grid::window_fits(image, window_size) {
        return out;
    }

    let (width, height) = image.dimensions();
    let half = window_size / 2;
    let mut uniform = 0usize;

    for y in half..height - half {
        for x in half..width - half {
            let (lo, hi) = Window::centered(x, y, window_size)
                .samples(image)
                .fold((u8::MAX, u8::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

            let contrast = hi - lo;
            let midpoint = (hi as u16 + lo as u16) / 2;

            let on = if contrast < contrast_threshold {
                uniform += 1;
                midpoint >= GRAY_MIDPOINT
            } else {
                image.get_pixel(x, y)[0] as u16 >= midpoint
            };
            out.put_pixel(x, y, binary(on));
        }
    }

    debug!("bernsen window={window_size} contrast={contrast_threshold} uniform_pixels={uniform}");
    out
}
