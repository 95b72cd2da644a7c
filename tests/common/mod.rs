mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from gridlab for tests
pub use gridlab::grid::{is_binary, local_mean};
pub use gridlab::{Point, PointSequence};
