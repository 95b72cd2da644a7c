use clap::{Parser, Subcommand, ValueEnum};
use image::{GrayImage, ImageReader};
use std::path::{Path, PathBuf};

use gridlab::config::{self, LabConfig};
use gridlab::features::{self, GradientOperator};
use gridlab::lab;
use gridlab::raster;
use gridlab::{PointSequence, grid};

#[derive(Parser)]
#[command(name = "gridlab")]
#[command(about = "Thresholding, feature detection and rasterization on pixel grids")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config overriding the default parameters
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every threshold and detector on an image and save all results
    Suite {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Directory for the result images
        #[arg(short, long, value_name = "DIR", default_value = "gridlab-out")]
        out: PathBuf,

        /// Save per-step debug outputs to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },
    /// Binarize an image with one thresholding method
    Threshold {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ThresholdKind::LocalOtsu)]
        method: ThresholdKind,
        /// Block or window size
        #[arg(long)]
        size: Option<u32>,
        /// Contrast threshold (bernsen), k (niblack) or constant (adaptive)
        #[arg(long, allow_negative_numbers = true)]
        param: Option<f32>,
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Detect isolated points or corners
    Points {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
        #[arg(short, long, value_enum, default_value_t = PointKind::Laplacian)]
        method: PointKind,
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Detect lines
    Lines {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
        #[arg(short, long, value_enum, default_value_t = LineKind::MorphClose)]
        method: LineKind,
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Detect edges from the gradient magnitude
    Edges {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
        #[arg(long, value_enum, default_value_t = OperatorKind::Sobel)]
        operator: OperatorKind,
        /// Magnitude threshold [default: config, else 50]
        #[arg(long)]
        threshold: Option<f32>,
        /// Save the clipped magnitude instead of the binary map
        #[arg(long)]
        magnitude: bool,
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Rasterize a line segment and print its points as JSON
    #[command(allow_negative_numbers = true)]
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        /// Also save a plot of the points
        #[arg(long, value_name = "FILE")]
        plot: Option<PathBuf>,
    },
    /// Rasterize a circle and print its points as JSON
    #[command(allow_negative_numbers = true)]
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        /// Also save a plot of the points
        #[arg(long, value_name = "FILE")]
        plot: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThresholdKind {
    LocalOtsu,
    Bernsen,
    Niblack,
    AdaptiveMean,
    AdaptiveGaussian,
}

#[derive(Clone, Copy, ValueEnum)]
enum PointKind {
    Laplacian,
    Corner,
    BlurOtsu,
}

#[derive(Clone, Copy, ValueEnum)]
enum LineKind {
    Directional,
    MorphClose,
    Canny,
}

#[derive(Clone, Copy, ValueEnum)]
enum OperatorKind {
    Sobel,
    Prewitt,
}

impl ThresholdKind {
    fn name(self) -> &'static str {
        match self {
            Self::LocalOtsu => "local_otsu",
            Self::Bernsen => "bernsen",
            Self::Niblack => "niblack",
            Self::AdaptiveMean => "adaptive_mean",
            Self::AdaptiveGaussian => "adaptive_gaussian",
        }
    }
}

impl PointKind {
    fn name(self) -> &'static str {
        match self {
            Self::Laplacian => "laplacian",
            Self::Corner => "corner",
            Self::BlurOtsu => "blur_otsu",
        }
    }
}

impl LineKind {
    fn name(self) -> &'static str {
        match self {
            Self::Directional => "directional_kernel",
            Self::MorphClose => "morph_close",
            Self::Canny => "canny",
        }
    }
}

impl OperatorKind {
    fn operator(self) -> GradientOperator {
        match self {
            Self::Sobel => GradientOperator::Sobel,
            Self::Prewitt => GradientOperator::Prewitt,
        }
    }
}

fn unknown_method(name: &str) -> anyhow::Error {
    anyhow::anyhow!("No parameters for method {}", name)
}

fn load_gray(path: &Path, verbose: bool) -> anyhow::Result<GrayImage> {
    if verbose {
        println!("Loading image: {:?}", path);
    }
    let img = ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    if verbose {
        println!("Image loaded: {}x{}", img.width(), img.height());
    }
    Ok(img.to_luma8())
}

fn save_gray(img: &GrayImage, path: &Path, verbose: bool) -> anyhow::Result<()> {
    img.save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))?;
    if verbose {
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn print_points(points: &PointSequence, plot: Option<&Path>, padding: u32, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        println!("{} points", points.len());
    }
    println!("{}", serde_json::to_string(points)?);
    if let Some(path) = plot {
        save_gray(&raster::plot_points(points, padding)?, path, verbose)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let verbose = args.verbose;

    let cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => LabConfig::default(),
    };

    match args.command {
        Command::Suite { image_path, out, debug_out } => {
            if verbose {
                println!("Loading image: {:?}", image_path);
            }
            let img = ImageReader::open(&image_path)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

            let mut pipeline = lab::build_standard_pipeline(cfg, verbose);
            if let Some(debug_dir) = debug_out {
                pipeline = pipeline.with_debug(debug_dir)?;
            }

            if verbose {
                println!("Running pipeline...\n");
            }
            let results = pipeline.run_with_executor(img)?;

            std::fs::create_dir_all(&out)?;
            println!("\n=== Lab Suite Results ===");
            for item in &results {
                let path = out.join(item.file_name("png"));
                item.image.save(&path)
                    .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))?;
                let ratio = item.get_float("foreground_ratio").unwrap_or(0.0);
                println!("  {:<28} {:5.1}% foreground -> {}", item.label.as_deref().unwrap_or("input"), 100.0 * ratio, path.display());
            }
        }
        Command::Threshold { image_path, method, size, param, out } => {
            let img = load_gray(&image_path, verbose)?;
            let method = cfg
                .threshold_method(method.name())
                .ok_or_else(|| unknown_method(method.name()))?
                .with_overrides(size, param);
            if verbose {
                println!("Thresholding with {:?}", method);
            }
            save_gray(&method.apply(&img), &out, verbose)?;
        }
        Command::Points { image_path, method, out } => {
            let method = cfg
                .point_method(method.name())
                .ok_or_else(|| unknown_method(method.name()))?;
            let img = load_gray(&image_path, verbose)?;
            save_gray(&features::detect_points(&img, &method), &out, verbose)?;
        }
        Command::Lines { image_path, method, out } => {
            let method = cfg
                .line_method(method.name())
                .ok_or_else(|| unknown_method(method.name()))?;
            let img = load_gray(&image_path, verbose)?;
            save_gray(&features::detect_lines(&img, &method), &out, verbose)?;
        }
        Command::Edges { image_path, operator, threshold, magnitude, out } => {
            let threshold = threshold.unwrap_or(cfg.edges.threshold);
            let img = load_gray(&image_path, verbose)?;
            let result = if magnitude {
                grid::clip_to_gray(&features::gradient_magnitude(&img, operator.operator()))
            } else {
                features::detect_edges(&img, operator.operator(), threshold)
            };
            save_gray(&result, &out, verbose)?;
        }
        Command::Line { x1, y1, x2, y2, plot } => {
            let points = raster::rasterize_line(x1, y1, x2, y2);
            print_points(&points, plot.as_deref(), cfg.raster.plot_padding, verbose)?;
        }
        Command::Circle { cx, cy, radius, plot } => {
            let points = raster::rasterize_circle(cx, cy, radius);
            if verbose {
                println!("{} octant steps", raster::octant_steps(radius));
            }
            print_points(&points, plot.as_deref(), cfg.raster.plot_padding, verbose)?;
        }
    }

    Ok(())
}
