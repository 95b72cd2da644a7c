//! Grayscale morphology with flat structuring elements.
//!
//! On 0/255 input the operators behave as binary morphology and keep the
//! output binary. Samples outside the grid are ignored: they neither set a
//! dilation nor clear an erosion.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::grid::ResponseMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Rect,
    /// Center row and center column of the bounding rectangle.
    Cross,
}

/// Flat structuring element of `width`×`height`, anchored at its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuringElement {
    pub shape: Shape,
    pub width: u32,
    pub height: u32,
}

impl StructuringElement {
    pub fn rect(width: u32, height: u32) -> Self {
        Self {
            shape: Shape::Rect,
            width,
            height,
        }
    }

    pub fn cross(width: u32, height: u32) -> Self {
        Self {
            shape: Shape::Cross,
            width,
            height,
        }
    }

    /// Offsets `(dx, dy)` relative to the anchor covered by the element.
    pub fn offsets(&self) -> Vec<(i64, i64)> {
        let ax = (self.width / 2) as i64;
        let ay = (self.height / 2) as i64;
        let mut out = Vec::with_capacity((self.width * self.height) as usize);
        for j in 0..self.height as i64 {
            for i in 0..self.width as i64 {
                let keep = match self.shape {
                    Shape::Rect => true,
                    Shape::Cross => i == ax || j == ay,
                };
                if keep {
                    out.push((i - ax, j - ay));
                }
            }
        }
        out
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::rect(3, 3)
    }
}

fn reduce<T: Copy>(
    (w, h): (u32, u32),
    element: &StructuringElement,
    sample: impl Fn(u32, u32) -> T,
    pick: impl Fn(T, T) -> T,
) -> Vec<T> {
    let offsets = element.offsets();
    let mut out = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let mut acc = sample(x, y);
            for &(dx, dy) in &offsets {
                let sx = x as i64 + dx;
                let sy = y as i64 + dy;
                if sx < 0 || sy < 0 || sx >= w as i64 || sy >= h as i64 {
                    continue;
                }
                acc = pick(acc, sample(sx as u32, sy as u32));
            }
            out.push(acc);
        }
    }
    out
}

pub fn dilate(image: &GrayImage, element: &StructuringElement) -> GrayImage {
    let data = reduce(image.dimensions(), element, |x, y| image.get_pixel(x, y)[0], u8::max);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([data[(y * image.width() + x) as usize]])
    })
}

pub fn erode(image: &GrayImage, element: &StructuringElement) -> GrayImage {
    let data = reduce(image.dimensions(), element, |x, y| image.get_pixel(x, y)[0], u8::min);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([data[(y * image.width() + x) as usize]])
    })
}

/// Dilation followed by erosion; bridges gaps shorter than the element.
pub fn close(image: &GrayImage, element: &StructuringElement) -> GrayImage {
    erode(&dilate(image, element), element)
}

/// Erosion followed by dilation; removes specks smaller than the element.
pub fn open(image: &GrayImage, element: &StructuringElement) -> GrayImage {
    dilate(&erode(image, element), element)
}

/// Local maximum of a response map over `element`.
pub fn dilate_response(map: &ResponseMap, element: &StructuringElement) -> ResponseMap {
    let data = reduce(map.dimensions(), element, |x, y| map.get_pixel(x, y)[0], f32::max);
    ResponseMap::from_fn(map.width(), map.height(), |x, y| {
        Luma([data[(y * map.width() + x) as usize]])
    })
}
