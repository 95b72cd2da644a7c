use crate::config::LabConfig;
use crate::features::{self, GradientOperator, LineMethod, PointMethod};
use crate::lab::{LabSuite, preprocessing};
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use crate::threshold::ThresholdMethod;
use anyhow::Result;
use image::{DynamicImage, GrayImage};

/// Wrap a result grid as a labelled item derived from `item`
fn grid_result(item: &PipelineData, grid: GrayImage, label: String) -> PipelineData {
    let ratio = preprocessing::foreground_ratio(&grid);
    item.derive(DynamicImage::ImageLuma8(grid), label)
        .with_metadata("foreground_ratio", MetadataValue::Float(ratio))
}

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let gray = preprocessing::to_grayscale(&item.image);
            let mut new_item = item.clone();
            new_item.image = DynamicImage::ImageLuma8(gray);
            result.push(new_item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let gray = item.image.to_luma8();
            let blurred = preprocessing::apply_blur(&gray, self.sigma);
            let mut new_item = item.clone();
            new_item.image = DynamicImage::ImageLuma8(blurred);
            result.push(new_item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Binarize with one thresholding method
pub struct ThresholdStep {
    pub method: ThresholdMethod,
}

impl PipelineStep for ThresholdStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let binary = self.method.apply(&item.image.to_luma8());
                grid_result(item, binary, format!("threshold_{}", self.method.name()))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Detect points with one method
pub struct PointDetectionStep {
    pub method: PointMethod,
}

impl PipelineStep for PointDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let points = features::detect_points(&item.image.to_luma8(), &self.method);
                grid_result(item, points, format!("points_{}", self.method.name()))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Point Detection"
    }
}

/// Detect lines with one method
pub struct LineDetectionStep {
    pub method: LineMethod,
}

impl PipelineStep for LineDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let lines = features::detect_lines(&item.image.to_luma8(), &self.method);
                grid_result(item, lines, format!("lines_{}", self.method.name()))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Line Detection"
    }
}

/// Detect edges from the gradient magnitude
pub struct EdgeDetectionStep {
    pub operator: GradientOperator,
    pub threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let edges = features::detect_edges(&item.image.to_luma8(), self.operator, self.threshold);
                grid_result(item, edges, format!("edges_{}", self.operator.name()))
                    .with_metadata("edge_threshold", MetadataValue::Float(self.threshold))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Run every configured operation - splits one grid into one result per operation
pub struct LabSuiteStep {
    pub suite: LabSuite,
}

impl LabSuiteStep {
    pub fn new(config: LabConfig) -> Self {
        Self {
            suite: LabSuite::new(config),
        }
    }
}

impl PipelineStep for LabSuiteStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let gray = item.image.to_luma8();
            let outputs = self.suite.run_with_verbosity(&gray, self.suite.verbose || context.verbose);
            for output in outputs {
                result.push(
                    grid_result(&item, output.image, output.label)
                        .with_metadata("category", MetadataValue::String(output.category.to_string())),
                );
            }
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Lab Suite"
    }
}
