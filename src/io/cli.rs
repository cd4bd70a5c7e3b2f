//! Command-line interface for tiling images and inspecting score vectors

use crate::analysis::histogram::Histogram;
use crate::analysis::ranking::{Labels, top_k};
use crate::io::configuration::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_LOG_FILTER, DEFAULT_PAD_SIZE, DEFAULT_PAD_VALUE, DEFAULT_TOP_K,
    DIRECTORY_OUTPUT_NAME, IMAGE_EXTENSIONS, OUTPUT_SUFFIX, VERBOSE_LOG_FILTER,
};
use crate::io::error::{Result, file_system, invalid_input, invalid_parameter};
use crate::io::features::read_values;
use crate::io::image::{export_canvas_png, load_batch_with_progress};
use crate::io::progress::ProgressManager;
use crate::tiling::{TileOptions, tile_with};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "filtergrid")]
#[command(
    author,
    version,
    about = "Tile filters and activations into grid images"
)]
/// Command-line arguments for the grid tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Tile images from a file or directory into one grid PNG
    Tile(TileArgs),
    /// Print the highest-scoring classes of a score vector
    Rank(RankArgs),
    /// Print a histogram of a value vector
    Histogram(HistogramArgs),
}

/// Arguments for `tile`
#[derive(Args)]
pub struct TileArgs {
    /// Input image file or directory of images
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Border width after every cell
    #[arg(short, long, default_value_t = DEFAULT_PAD_SIZE)]
    pub pad_size: usize,

    /// Fill value for borders and unused cells
    #[arg(long, default_value_t = DEFAULT_PAD_VALUE, allow_hyphen_values = true)]
    pub pad_value: f64,

    /// Tile only the first N images
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for `rank`
#[derive(Args)]
pub struct RankArgs {
    /// File of scores separated by commas or whitespace
    #[arg(value_name = "SCORES")]
    pub scores: PathBuf,

    /// Class label file, one label per line
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Number of classes to print
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top: usize,
}

/// Arguments for `histogram`
#[derive(Args)]
pub struct HistogramArgs {
    /// File of values separated by commas or whitespace
    #[arg(value_name = "VALUES")]
    pub values: PathBuf,

    /// Number of equal-width bins
    #[arg(short, long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Include zero and negative values
    #[arg(short, long)]
    pub all: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log filter used when `RUST_LOG` is unset
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

/// Executes a parsed command line
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected subcommand
    ///
    /// # Errors
    ///
    /// Returns an error if input collection, parsing or output fails
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Command::Tile(args) => self.run_tile(args),
            Command::Rank(args) => Self::run_rank(args),
            Command::Histogram(args) => Self::run_histogram(args),
        }
    }

    fn run_tile(&self, args: &TileArgs) -> Result<()> {
        let mut files = collect_images(&args.target)?;
        if let Some(limit) = args.limit {
            if limit == 0 {
                return Err(invalid_parameter("limit", &limit, &"must be positive"));
            }
            files.truncate(limit);
        }

        let progress = if self.cli.should_show_progress() {
            ProgressManager::new(files.len(), "images")
        } else {
            ProgressManager::hidden(files.len())
        };
        let batch = load_batch_with_progress(&files, &progress)?;
        progress.finish();

        let canvas = tile_with(
            &batch,
            &TileOptions {
                pad_size: args.pad_size,
                pad_value: args.pad_value as f32,
            },
        )?;

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.target));
        export_canvas_png(&canvas, &output)?;

        info!(
            images = batch.len(),
            side = canvas.grid_side(),
            path = %output.display(),
            "wrote grid"
        );
        Ok(())
    }

    // Allow print for command output
    #[allow(clippy::print_stdout)]
    fn run_rank(args: &RankArgs) -> Result<()> {
        let scores = read_values(&args.scores)?;
        match &args.labels {
            Some(path) => {
                let labels = Labels::from_path(path)?;
                for ranked in labels.rank(&scores, args.top)? {
                    println!("{:>6} {:.6} {}", ranked.index, ranked.score, ranked.label);
                }
            }
            None => {
                for index in top_k(&scores, args.top) {
                    let score = scores.get(index).copied().unwrap_or(f64::NAN);
                    println!("{index:>6} {score:.6}");
                }
            }
        }
        Ok(())
    }

    // Allow print for command output
    #[allow(clippy::print_stdout)]
    fn run_histogram(args: &HistogramArgs) -> Result<()> {
        let values = read_values(&args.values)?;
        let histogram = if args.all {
            Histogram::of_values(&values, args.bins)?
        } else {
            Histogram::of_positive(&values, args.bins)?
        };
        for (low, high, count) in histogram.bins() {
            println!("{low:.6}..{high:.6} {count}");
        }
        Ok(())
    }
}

/// Collect image files from a file or directory target
///
/// Directory entries are sorted by path. Previously written grids are skipped.
///
/// # Errors
///
/// Returns an error if the target is missing, is an unsupported file, or the
/// directory holds no images
pub fn collect_images(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        if has_image_extension(target) {
            Ok(vec![target.to_path_buf()])
        } else {
            Err(invalid_input(&format!(
                "'{}' is not a supported image ({})",
                target.display(),
                IMAGE_EXTENSIONS.join(", ")
            )))
        }
    } else if target.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(target).map_err(file_system(target, "read directory"))? {
            let path = entry.map_err(file_system(target, "read directory"))?.path();
            if path.is_file() && has_image_extension(&path) && !is_grid_output(&path) {
                files.push(path);
            }
        }
        files.sort();
        if files.is_empty() {
            return Err(invalid_input(&format!(
                "no images found in '{}'",
                target.display()
            )));
        }
        Ok(files)
    } else {
        Err(invalid_input(&format!(
            "target '{}' must be an image file or directory",
            target.display()
        )))
    }
}

/// Default output location for a tile target
pub fn default_output_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        return target.join(DIRECTORY_OUTPUT_NAME);
    }

    let stem = target.file_stem().unwrap_or_default();
    let output_name = format!("{}{OUTPUT_SUFFIX}.png", stem.to_string_lossy());

    if let Some(parent) = target.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn is_grid_output(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    name == DIRECTORY_OUTPUT_NAME || stem.ends_with(OUTPUT_SUFFIX)
}
