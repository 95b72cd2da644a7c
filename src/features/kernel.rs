/// Small dense matrix of signed weights, anchored at its center.
///
/// Applied as a correlation: weight `(i, j)` multiplies the sample at
/// `(x + i - width / 2, y + j - height / 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: u32,
    height: u32,
    weights: Vec<f32>,
}

impl Kernel {
    /// Kernel from row-major weights. Returns `None` when the weight count
    /// does not match the shape or the shape is empty.
    pub fn new(width: u32, height: u32, weights: Vec<f32>) -> Option<Self> {
        if width == 0 || height == 0 || weights.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            weights,
        })
    }

    pub fn from_3x3(rows: [[f32; 3]; 3]) -> Self {
        Self {
            width: 3,
            height: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn anchor(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    #[inline]
    pub fn weight(&self, i: u32, j: u32) -> f32 {
        self.weights[(j * self.width + i) as usize]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Isolated-point detector: +8 at the center, -1 on all eight neighbours.
    pub fn laplacian_point() -> Self {
        Self::from_3x3([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    /// Matched filter for one-pixel lines rising at 45° (bottom-left to
    /// top-right in image coordinates).
    pub fn diagonal_45() -> Self {
        Self::from_3x3([[-1.0, -1.0, 2.0], [-1.0, 2.0, -1.0], [2.0, -1.0, -1.0]])
    }

    pub fn sobel_x() -> Self {
        Self::from_3x3([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]])
    }

    pub fn sobel_y() -> Self {
        Self::from_3x3([[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]])
    }

    pub fn prewitt_x() -> Self {
        Self::from_3x3([[1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [1.0, 0.0, -1.0]])
    }

    pub fn prewitt_y() -> Self {
        Self::from_3x3([[1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -1.0, -1.0]])
    }
}
