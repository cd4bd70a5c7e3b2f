//! Constants and runtime configuration defaults

// Tiling defaults
/// Border width appended to the right and bottom of every cell
pub const DEFAULT_PAD_SIZE: usize = 1;
/// Fill value for borders and unused cells
pub const DEFAULT_PAD_VALUE: f64 = 0.0;

// Analysis defaults
/// Number of equal-width bins for activation histograms
pub const DEFAULT_HISTOGRAM_BINS: usize = 100;
/// Number of predictions reported by ranking
pub const DEFAULT_TOP_K: usize = 5;

// Feature dump settings
/// Number of processed items between progress log lines
pub const PROGRESS_REPORT_INTERVAL: usize = 100;
/// Decimal places written per feature value
pub const FEATURE_PRECISION: usize = 6;
/// Extension of the images named by an id list
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

// Input discovery
/// File extensions accepted when collecting images from a directory
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// Output settings
/// Suffix added to output filenames for single-file targets
pub const OUTPUT_SUFFIX: &str = "_grid";
/// Output filename for directory targets
pub const DIRECTORY_OUTPUT_NAME: &str = "grid.png";
/// Log filter applied when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "filtergrid=info";
/// Log filter applied with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "filtergrid=debug";
