//! JSON configuration for the lab suite.
//!
//! Every section is optional; missing fields fall back to the defaults
//! below.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::features::{EDGE_THRESHOLD, GradientOperator, LineMethod, PointMethod};
use crate::threshold::ThresholdMethod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub thresholds: Vec<ThresholdMethod>,
    pub points: Vec<PointMethod>,
    pub lines: Vec<LineMethod>,
    pub edges: EdgeConfig,
    pub raster: RasterConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![
                ThresholdMethod::adaptive_gaussian(),
                ThresholdMethod::local_otsu(),
                ThresholdMethod::bernsen(),
                ThresholdMethod::niblack(),
            ],
            points: vec![
                PointMethod::laplacian(),
                PointMethod::corner(),
                PointMethod::blur_otsu(),
            ],
            lines: vec![
                LineMethod::directional_kernel(),
                LineMethod::morph_close(),
                LineMethod::canny(),
            ],
            edges: EdgeConfig::default(),
            raster: RasterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub operators: Vec<GradientOperator>,
    pub threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            operators: vec![GradientOperator::Sobel, GradientOperator::Prewitt],
            threshold: EDGE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Blank margin around plotted shapes, in pixels.
    pub plot_padding: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self { plot_padding: 10 }
    }
}

impl LabConfig {
    /// Number of result grids the lab suite produces per input.
    pub fn output_count(&self) -> usize {
        self.thresholds.len() + self.points.len() + self.lines.len() + self.edges.operators.len()
    }

    /// The configured threshold called `name`, else its defaults.
    pub fn threshold_method(&self, name: &str) -> Option<ThresholdMethod> {
        self.thresholds
            .iter()
            .find(|m| m.name() == name)
            .copied()
            .or_else(|| ThresholdMethod::from_name(name))
    }

    /// The configured point method called `name`, else its defaults.
    pub fn point_method(&self, name: &str) -> Option<PointMethod> {
        self.points
            .iter()
            .find(|m| m.name() == name)
            .copied()
            .or_else(|| PointMethod::from_name(name))
    }

    /// The configured line method called `name`, else its defaults.
    pub fn line_method(&self, name: &str) -> Option<LineMethod> {
        self.lines
            .iter()
            .find(|m| m.name() == name)
            .copied()
            .or_else(|| LineMethod::from_name(name))
    }
}

pub fn load_config(path: &Path) -> Result<LabConfig> {
    let data = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    serde_json::from_str(&data)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}
