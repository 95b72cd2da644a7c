pub mod config;
pub mod error;
pub mod features;
pub mod grid;
pub mod lab;
pub mod models;
pub mod pipeline;
pub mod raster;
pub mod threshold;

pub use config::{LabConfig, load_config};
pub use error::GridError;
pub use features::{GradientOperator, LineMethod, PointMethod, detect_edges, detect_lines, detect_points};
pub use lab::{LabOutput, LabSuite};
pub use models::{Point, PointSequence};
pub use pipeline::{
    Pipeline, PipelineData, PipelineStep, PipelineContext,
    MetadataValue, WorkItem, PipelineExecutor, DebugConfig
};
pub use raster::{rasterize_circle, rasterize_line};
pub use threshold::{ThresholdMethod, adaptive_threshold, bernsen, local_otsu, niblack};
