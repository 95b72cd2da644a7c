use image::DynamicImage;
use std::sync::Arc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread;
use anyhow::Result;

/// Data that flows through the pipeline
/// Each PipelineData is one grid (the input, or a result derived from it)
#[derive(Clone)]
pub struct PipelineData {
    /// The current grid (grayscale after the first step)
    pub image: DynamicImage,

    /// The input the pipeline was started with (shared via Arc)
    pub original: Arc<DynamicImage>,

    /// Name of the operation that produced this grid, e.g. "bernsen"
    pub label: Option<String>,

    /// Metadata recorded by steps (e.g. "foreground_ratio", "category")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Values steps attach to a grid
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f32),
    String(String),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            label: None,
            metadata: HashMap::new(),
        }
    }

    /// Derive a labelled result from this item, keeping the original and metadata
    pub fn derive(&self, image: DynamicImage, label: impl Into<String>) -> Self {
        Self {
            image,
            original: self.original.clone(),
            label: Some(label.into()),
            metadata: self.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get metadata as float
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as string
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// File name for saving this grid, e.g. "local_otsu.png"
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.label.as_deref().unwrap_or("input"), extension)
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    fn debug_dir(&self) -> Option<&Path> {
        self.debug
            .as_ref()
            .filter(|d| d.enabled)
            .map(|d| d.output_dir.as_path())
    }
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in verbose output)
    fn name(&self) -> &str;
}

fn step_dir_name(step_index: usize, step_name: &str) -> String {
    format!("{:02}_{}", step_index, step_name.to_lowercase().replace(' ', "_"))
}

fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save debug image {}: {}", path.display(), e))
}

/// One grid on its way through the remaining steps.
#[derive(Clone)]
pub struct WorkItem {
    pub data: PipelineData,
    pub remaining_steps: Vec<Arc<dyn PipelineStep>>,
    /// Number of steps already applied.
    pub current_step_index: usize,
    /// 1-based output position at every step so far; `[1, 3]` is the third
    /// output of the first output of step one.
    pub lineage: Vec<usize>,
}

impl WorkItem {
    pub fn new(data: PipelineData, steps: Vec<Arc<dyn PipelineStep>>) -> Self {
        Self {
            data,
            remaining_steps: steps,
            current_step_index: 0,
            lineage: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_steps.is_empty()
    }

    /// Debug file name built from the lineage, e.g. `01-03.png`.
    pub fn lineage_filename(&self, extension: &str) -> String {
        if self.lineage.is_empty() {
            return format!("01.{}", extension);
        }
        let stem = self
            .lineage
            .iter()
            .map(|id| format!("{:02}", id))
            .collect::<Vec<_>>()
            .join("-");
        format!("{}.{}", stem, extension)
    }

    fn save_debug_output(&self, context: &PipelineContext, step_name: &str) -> Result<()> {
        let Some(output_dir) = context.debug_dir() else {
            return Ok(());
        };

        let dir_name = step_dir_name(self.current_step_index, step_name);
        let step_dir = output_dir.join(&dir_name);
        std::fs::create_dir_all(&step_dir)?;
        let filename = self.lineage_filename("png");
        save_image(&self.data.image, &step_dir.join(&filename))?;

        if context.verbose {
            println!("  Debug: saved {}/{}", dir_name, filename);
        }
        Ok(())
    }

    /// Apply the next step; every grid it returns becomes a child item.
    pub fn process_next_step(&mut self, context: &PipelineContext) -> Result<Vec<WorkItem>> {
        let Some((step, rest)) = self.remaining_steps.split_first() else {
            return Ok(Vec::new());
        };

        let outputs = step.process(vec![self.data.clone()], context)?;
        let mut children = Vec::with_capacity(outputs.len());
        for (idx, data) in outputs.into_iter().enumerate() {
            let mut lineage = self.lineage.clone();
            lineage.push(idx + 1);
            let child = WorkItem {
                data,
                remaining_steps: rest.to_vec(),
                current_step_index: self.current_step_index + 1,
                lineage,
            };
            child.save_debug_output(context, step.name())?;
            children.push(child);
        }
        Ok(children)
    }
}

/// Runs work items on a pool of scoped worker threads.
///
/// Jobs go out on one channel and each worker answers with the items its
/// step produced; the dispatching thread keeps the pending count and
/// collects finished items. Results come back ordered by lineage, so the
/// output does not depend on thread scheduling.
pub struct PipelineExecutor {
    context: PipelineContext,
    workers: usize,
}

impl PipelineExecutor {
    /// Executor with one worker per available core
    pub fn new(context: PipelineContext) -> Self {
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        Self { context, workers }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Process items until every one has run out of steps
    pub fn execute(&self, initial_items: Vec<WorkItem>) -> Result<Vec<PipelineData>> {
        let (job_tx, job_rx) = mpsc::channel::<WorkItem>();
        let (done_tx, done_rx) = mpsc::channel::<Result<Vec<WorkItem>>>();
        let job_rx = Mutex::new(job_rx);
        let mut finished = Vec::new();

        thread::scope(|scope| -> Result<()> {
            for _ in 0..self.workers {
                let done_tx = done_tx.clone();
                let job_rx = &job_rx;
                let context = &self.context;
                scope.spawn(move || {
                    loop {
                        let job = match job_rx.lock() {
                            Ok(rx) => rx.recv(),
                            Err(_) => break,
                        };
                        let Ok(mut item) = job else { break };
                        if done_tx.send(item.process_next_step(context)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            let mut pending = 0usize;
            let outcome = (|| -> Result<()> {
                for item in initial_items {
                    dispatch(&job_tx, item, &mut pending, &mut finished)?;
                }
                while pending > 0 {
                    let produced = done_rx
                        .recv()
                        .map_err(|e| anyhow::anyhow!("Pipeline workers stopped early: {}", e))??;
                    pending -= 1;
                    for item in produced {
                        dispatch(&job_tx, item, &mut pending, &mut finished)?;
                    }
                }
                Ok(())
            })();

            // Closing the job channel lets the workers exit.
            drop(job_tx);
            outcome
        })?;

        finished.sort_by(|a: &WorkItem, b: &WorkItem| a.lineage.cmp(&b.lineage));
        Ok(finished.into_iter().map(|item| item.data).collect())
    }
}

/// Queue an item for the next step, or keep it if it has none left
fn dispatch(
    jobs: &Sender<WorkItem>,
    item: WorkItem,
    pending: &mut usize,
    finished: &mut Vec<WorkItem>,
) -> Result<()> {
    if item.is_complete() {
        finished.push(item);
        return Ok(());
    }
    jobs.send(item)
        .map_err(|e| anyhow::anyhow!("Failed to queue work item: {}", e))?;
    *pending += 1;
    Ok(())
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of steps in the pipeline
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn save_debug_input(&self, input: &DynamicImage) -> Result<()> {
        if let Some(output_dir) = self.context.debug_dir() {
            let input_dir = output_dir.join("00_input");
            std::fs::create_dir_all(&input_dir)?;
            save_image(input, &input_dir.join("01.png"))?;
            if self.context.verbose {
                println!("  Debug: saved 00_input/01.png");
            }
        }
        Ok(())
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline on the worker-pool executor
    pub fn run_with_executor(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.save_debug_input(&input)?;

        let initial_data = PipelineData::from_image(input);
        let initial_item = WorkItem::new(initial_data, self.steps.clone());

        let executor = PipelineExecutor::new(self.context.clone());
        executor.execute(vec![initial_item])
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        self.save_debug_input(&input)?;

        let mut data = vec![PipelineData::from_image(input)];

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            if self.context.verbose {
                println!("Running step {}: {} (processing {} items)", step_idx + 1, step.name(), data.len());
            }

            data = step.process(data, &self.context)?;

            if let Some(output_dir) = self.context.debug_dir() {
                let dir_name = step_dir_name(step_idx + 1, step.name());
                let step_dir = output_dir.join(&dir_name);
                std::fs::create_dir_all(&step_dir)?;

                for (idx, item) in data.iter().enumerate() {
                    save_image(&item.image, &step_dir.join(format!("{:02}.png", idx + 1)))?;
                }

                if self.context.verbose {
                    println!("  Debug: saved {} images to {}/", data.len(), dir_name);
                }
            }

            if self.context.verbose {
                println!("  → {} items", data.len());
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
