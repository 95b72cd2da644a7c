pub mod preprocessing;
pub mod steps;

use std::fmt;
use std::sync::Arc;

use image::GrayImage;

use crate::config::LabConfig;
use crate::features;
use crate::pipeline::Pipeline;

/// Which engine produced a lab output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Threshold,
    Points,
    Lines,
    Edges,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Threshold => "threshold",
            Self::Points => "points",
            Self::Lines => "lines",
            Self::Edges => "edges",
        })
    }
}

/// One labelled result grid
#[derive(Debug, Clone)]
pub struct LabOutput {
    pub category: Category,
    pub label: String,
    pub image: GrayImage,
}

/// Runs every configured threshold and detector on one grid
#[derive(Debug, Clone)]
pub struct LabSuite {
    pub config: LabConfig,
    pub verbose: bool,
}

impl LabSuite {
    pub fn new(config: LabConfig) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the full suite on a grayscale grid
    pub fn run(&self, img: &GrayImage) -> Vec<LabOutput> {
        self.run_with_verbosity(img, self.verbose)
    }

    pub fn run_with_verbosity(&self, img: &GrayImage, verbose: bool) -> Vec<LabOutput> {
        let cfg = &self.config;
        let mut outputs = Vec::with_capacity(cfg.output_count());

        let mut emit = |category: Category, name: &str, image: GrayImage| {
            let label = format!("{}_{}", category, name);
            if verbose {
                println!(
                    "  {} ({}x{}, {:.1}% foreground)",
                    label,
                    image.width(),
                    image.height(),
                    100.0 * preprocessing::foreground_ratio(&image)
                );
            }
            outputs.push(LabOutput {
                category,
                label,
                image,
            });
        };

        if verbose {
            println!("\nThresholding ({} methods)...", cfg.thresholds.len());
        }
        for method in &cfg.thresholds {
            emit(Category::Threshold, method.name(), method.apply(img));
        }

        if verbose {
            println!("\nDetecting points ({} methods)...", cfg.points.len());
        }
        for method in &cfg.points {
            emit(Category::Points, method.name(), features::detect_points(img, method));
        }

        if verbose {
            println!("\nDetecting lines ({} methods)...", cfg.lines.len());
        }
        for method in &cfg.lines {
            emit(Category::Lines, method.name(), features::detect_lines(img, method));
        }

        if verbose {
            println!("\nDetecting edges ({} operators)...", cfg.edges.operators.len());
        }
        for &operator in &cfg.edges.operators {
            emit(
                Category::Edges,
                operator.name(),
                features::detect_edges(img, operator, cfg.edges.threshold),
            );
        }

        outputs
    }
}

impl Default for LabSuite {
    fn default() -> Self {
        Self::new(LabConfig::default())
    }
}

/// Build the standard lab pipeline: grayscale conversion, then the suite fan-out
pub fn build_standard_pipeline(config: LabConfig, verbose: bool) -> Pipeline {
    use steps::{GrayscaleStep, LabSuiteStep};

    Pipeline::new()
        .with_verbose(verbose)
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(LabSuiteStep::new(config)))
}
