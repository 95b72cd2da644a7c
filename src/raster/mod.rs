//! Rasterization engine: integer line and circle stepping.

pub mod circle;
pub mod line;
pub mod plot;

pub use circle::{octant_steps, rasterize_circle};
pub use line::rasterize_line;
pub use plot::plot_points;
