//! Shared helpers over the grayscale grid every engine consumes.
//!
//! Engines take `&GrayImage` and always allocate their output. Continuous
//! intermediate results (convolution responses, local statistics) are kept
//! as [`ResponseMap`]s and binarized at the end.

use image::{GrayImage, ImageBuffer, Luma};

use crate::error::GridError;

/// Continuous per-pixel response (convolution output, magnitudes, statistics).
pub type ResponseMap = ImageBuffer<Luma<f32>, Vec<f32>>;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Build a grid from a row-major sample buffer.
pub fn from_raw(width: u32, height: u32, samples: Vec<u8>) -> Result<GrayImage, GridError> {
    if width == 0 || height == 0 {
        if !samples.is_empty() {
            return Err(GridError::ZeroDimension { width, height });
        }
        return Ok(GrayImage::new(width, height));
    }

    let expected = width as usize * height as usize;
    if samples.len() != expected {
        return Err(GridError::SizeMismatch {
            expected,
            actual: samples.len(),
        });
    }

    GrayImage::from_raw(width, height, samples).ok_or(GridError::SizeMismatch {
        expected,
        actual: 0,
    })
}

/// All-zero grid with the same shape as `image`.
pub fn zeros_like(image: &GrayImage) -> GrayImage {
    GrayImage::new(image.width(), image.height())
}

pub fn is_empty(image: &GrayImage) -> bool {
    image.width() == 0 || image.height() == 0
}

/// True when a `size`×`size` window fits inside the grid.
pub fn window_fits(image: &GrayImage, size: u32) -> bool {
    size > 0 && size <= image.width() && size <= image.height()
}

/// Every sample is either 0 or 255.
pub fn is_binary(image: &GrayImage) -> bool {
    image
        .pixels()
        .all(|p| p[0] == FOREGROUND || p[0] == BACKGROUND)
}

#[inline]
pub fn binary(on: bool) -> Luma<u8> {
    Luma([if on { FOREGROUND } else { BACKGROUND }])
}

/// Samples strictly above `level` become 255, the rest 0.
pub fn binarize(image: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        binary(image.get_pixel(x, y)[0] > level)
    })
}

/// Responses strictly above `level` become 255, the rest 0.
pub fn binarize_response(map: &ResponseMap, level: f32) -> GrayImage {
    GrayImage::from_fn(map.width(), map.height(), |x, y| {
        binary(map.get_pixel(x, y)[0] > level)
    })
}

/// Clip a response into the 0..=255 sample range.
pub fn clip_to_gray(map: &ResponseMap) -> GrayImage {
    GrayImage::from_fn(map.width(), map.height(), |x, y| {
        Luma([map.get_pixel(x, y)[0].clamp(0.0, 255.0) as u8])
    })
}

/// Promote samples to a response map.
pub fn to_response(image: &GrayImage) -> ResponseMap {
    ResponseMap::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[0] as f32])
    })
}

/// Largest response value, `None` for an empty map.
pub fn max_response(map: &ResponseMap) -> Option<f32> {
    map.pixels().map(|p| p[0]).reduce(f32::max)
}

/// Square sub-region addressed by its top-left corner.
///
/// Coordinates are signed so that windows centered on border pixels can
/// extend past the grid before being clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: i64,
    pub y: i64,
    pub size: u32,
}

impl Window {
    /// Window of side `size` anchored at `size / 2` from its top-left corner.
    pub fn centered(cx: u32, cy: u32, size: u32) -> Self {
        let half = (size / 2) as i64;
        Self {
            x: cx as i64 - half,
            y: cy as i64 - half,
            size,
        }
    }

    /// Half-open `(x0, y0, x1, y1)` bounds intersected with a `width`×`height` grid.
    pub fn clip(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let x0 = self.x.clamp(0, width as i64) as u32;
        let y0 = self.y.clamp(0, height as i64) as u32;
        let x1 = (self.x + self.size as i64).clamp(0, width as i64) as u32;
        let y1 = (self.y + self.size as i64).clamp(0, height as i64) as u32;
        (x0, y0, x1, y1)
    }

    /// Iterate samples of the window that fall inside the grid.
    pub fn samples(self, image: &GrayImage) -> impl Iterator<Item = u8> + '_ {
        let (x0, y0, x1, y1) = self.clip(image.width(), image.height());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| image.get_pixel(x, y)[0]))
    }
}

/// Summed-area table over a per-sample function of the grid.
///
/// Row and column 0 are padding so that `sum` needs no branches.
pub struct SummedArea {
    stride: usize,
    sums: Vec<f64>,
}

impl SummedArea {
    pub fn new(image: &GrayImage, f: impl Fn(f64) -> f64) -> Self {
        let w = image.width() as usize;
        let h = image.height() as usize;
        let stride = w + 1;
        let mut sums = vec![0.0f64; stride * (h + 1)];

        for y in 0..h {
            let mut row = 0.0f64;
            for x in 0..w {
                row += f(image.get_pixel(x as u32, y as u32)[0] as f64);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }

        Self { stride, sums }
    }

    /// Sum over the half-open rectangle `[x0, x1) × [y0, y1)`.
    pub fn sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> f64 {
        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);
        self.sums[y1 * self.stride + x1] - self.sums[y0 * self.stride + x1]
            - self.sums[y1 * self.stride + x0]
            + self.sums[y0 * self.stride + x0]
    }
}

/// Sliding-window mean; windows are clipped to the grid and averaged over
/// the samples they actually cover.
pub fn local_mean(image: &GrayImage, window: u32) -> ResponseMap {
    let table = SummedArea::new(image, |v| v);
    windowed_average(image, window, &table)
}

/// Sliding-window mean and standard deviation,
/// `stddev = sqrt(mean(x²) − mean(x)²)`.
pub fn local_mean_stddev(image: &GrayImage, window: u32) -> (ResponseMap, ResponseMap) {
    let mean = local_mean(image, window);
    let squares = SummedArea::new(image, |v| v * v);
    let mean_sq = windowed_average(image, window, &squares);

    let stddev = ResponseMap::from_fn(image.width(), image.height(), |x, y| {
        let m = mean.get_pixel(x, y)[0];
        let variance = (mean_sq.get_pixel(x, y)[0] - m * m).max(0.0);
        Luma([variance.sqrt()])
    });

    (mean, stddev)
}

fn windowed_average(image: &GrayImage, window: u32, table: &SummedArea) -> ResponseMap {
    let (w, h) = image.dimensions();
    ResponseMap::from_fn(w, h, |x, y| {
        let (x0, y0, x1, y1) = Window::centered(x, y, window).clip(w, h);
        let count = ((x1 - x0) * (y1 - y0)) as f64;
        if count == 0.0 {
            return Luma([0.0]);
        }
        Luma([(table.sum(x0, y0, x1, y1) / count) as f32])
    })
}
