//! Feature detection engine: point, line and edge maps.
//!
//! Each detection problem has a closed set of strategies ([`PointMethod`],
//! [`LineMethod`], [`GradientOperator`]) dispatched behind one function.
//! Convolutions use replicate borders (see [`convolve`]).

pub mod convolve;
pub mod edges;
pub mod kernel;
pub mod lines;
pub mod morphology;
pub mod points;

pub use convolve::Border;
pub use edges::{EDGE_THRESHOLD, GradientOperator, detect_edges, gradient_magnitude};
pub use kernel::Kernel;
pub use lines::{LineMethod, detect_lines};
pub use morphology::{Shape, StructuringElement};
pub use points::{HarrisParams, PointMethod, detect_points};
