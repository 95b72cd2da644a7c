use core::fmt;

/// Caller misuse when handing raw sample buffers to the engines, or
/// asking for a canvas wider than a grid can be.
///
/// Degenerate grids (empty, smaller than a window) are not errors; the
/// engines answer them with zero-filled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    SizeMismatch { expected: usize, actual: usize },
    ZeroDimension { width: u32, height: u32 },
    CanvasTooLarge { width: u64, height: u64 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "sample buffer size mismatch: expected {expected}, got {actual}")
            }
            Self::ZeroDimension { width, height } => {
                write!(f, "non-empty sample buffer for a {width}x{height} grid")
            }
            Self::CanvasTooLarge { width, height } => {
                write!(f, "a {width}x{height} canvas exceeds the grid size limit")
            }
        }
    }
}

impl std::error::Error for GridError {}
