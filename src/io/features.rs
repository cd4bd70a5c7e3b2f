//! Feature-vector dumping for lists of images
//!
//! An id list names which images to run through an extractor. Each result is
//! written as one CSV line keyed by the mapped id, so downstream tools can join
//! features back to items without knowing the original image names.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::io::configuration::{
    DEFAULT_IMAGE_EXTENSION, FEATURE_PRECISION, PROGRESS_REPORT_INTERVAL,
};
use crate::io::error::{GridError, Result, file_system};
use crate::io::progress::ProgressManager;

/// One line of an id list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPair {
    /// Identifier used in the image filename
    pub item_id: u64,
    /// Identifier written as the feature key
    pub mapped_id: u64,
}

/// Produces a feature vector for an image file
///
/// Implemented by whatever inference engine is available; the dumper treats
/// it as opaque.
pub trait FeatureExtractor {
    /// Extract the feature vector of one image
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be read or the engine fails
    fn extract(&mut self, image: &Path) -> Result<Vec<f32>>;
}

impl<F> FeatureExtractor for F
where
    F: FnMut(&Path) -> Result<Vec<f32>>,
{
    fn extract(&mut self, image: &Path) -> Result<Vec<f32>> {
        self(image)
    }
}

/// Outcome of a dump run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Records written, including zero-filled ones
    pub written: usize,
    /// Items whose extraction failed
    pub failed: usize,
}

/// Drives an extractor over an id list and writes CSV records
#[derive(Debug, Clone)]
pub struct FeatureDumper {
    image_dir: PathBuf,
    extension: String,
    fallback_dim: Option<usize>,
    show_progress: bool,
}

impl FeatureDumper {
    /// Dumper reading `<item_id>.jpg` files from `image_dir`
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            fallback_dim: None,
            show_progress: false,
        }
    }

    /// Use a different image file extension
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        extension.trim_start_matches('.').clone_into(&mut self.extension);
        self
    }

    /// Zero-vector length for failures before any extraction has succeeded
    #[must_use]
    pub const fn with_fallback_dim(mut self, dim: usize) -> Self {
        self.fallback_dim = Some(dim);
        self
    }

    /// Show a progress bar while dumping
    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Path of the image for an item
    pub fn image_path(&self, item_id: u64) -> PathBuf {
        self.image_dir.join(format!("{item_id}.{}", self.extension))
    }

    /// Extract and write features for every id
    ///
    /// A failed extraction is logged and replaced by a zero vector of the
    /// last successful dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Extraction fails before any vector length is known and no fallback
    ///   dimension is configured
    /// - Writing to `writer` fails
    pub fn dump<E, W>(
        &self,
        ids: &[IdPair],
        extractor: &mut E,
        writer: &mut W,
    ) -> Result<DumpSummary>
    where
        E: FeatureExtractor + ?Sized,
        W: Write,
    {
        let mut summary = DumpSummary::default();
        let mut last_dim = self.fallback_dim;
        let progress = self.show_progress.then(|| ProgressManager::new(ids.len(), "features"));

        for (index, pair) in ids.iter().enumerate() {
            if index % PROGRESS_REPORT_INTERVAL == 0 {
                info!(index, total = ids.len(), "dumping features");
            }

            let path = self.image_path(pair.item_id);
            let values = match extractor.extract(&path) {
                Ok(values) => {
                    last_dim = Some(values.len());
                    values
                }
                Err(error) => {
                    let dim = last_dim.ok_or_else(|| GridError::Extraction {
                        path: path.clone(),
                        reason: format!("{error} (no feature length known for zero fill)"),
                    })?;
                    warn!(item = pair.item_id, %error, "extraction failed, writing zeros");
                    summary.failed += 1;
                    vec![0.0; dim]
                }
            };

            write_record(writer, pair, &values)?;
            summary.written += 1;
            if let Some(ref pm) = progress {
                pm.advance();
            }
        }

        if let Some(ref pm) = progress {
            pm.finish();
        }
        info!(
            written = summary.written,
            failed = summary.failed,
            "feature dump finished"
        );
        Ok(summary)
    }
}

/// Write one `mapped_id,item_id,f1,...,fk` line
///
/// # Errors
///
/// Returns an error if writing fails
pub fn write_record<W: Write>(writer: &mut W, pair: &IdPair, values: &[f32]) -> Result<()> {
    write!(writer, "{},{},", pair.mapped_id, pair.item_id)?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            writer.write_all(b",")?;
        }
        write!(writer, "{value:.precision$}", precision = FEATURE_PRECISION)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

/// Read `item_id,mapped_id` pairs
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is malformed
pub fn read_id_list<P: AsRef<Path>>(path: P) -> Result<Vec<IdPair>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(file_system(path, "open id list"))?;

    let mut pairs = Vec::new();
    for (index, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.map_err(file_system(path, "read id list"))?;
        let parse_error = |reason: String| GridError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        };

        let fields: Vec<&str> = tokens(&line).collect();
        match fields.as_slice() {
            [] => {}
            [item, mapped] => pairs.push(IdPair {
                item_id: parse_id(item).map_err(parse_error)?,
                mapped_id: parse_id(mapped).map_err(parse_error)?,
            }),
            other => {
                return Err(parse_error(format!(
                    "expected 2 fields, found {}",
                    other.len()
                )));
            }
        }
    }
    Ok(pairs)
}

/// Read every number in a comma- or whitespace-separated file
///
/// # Errors
///
/// Returns an error if the file cannot be read or a token is not a number
pub fn read_values<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(file_system(path, "read values"))?;

    let mut values = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let parsed = parse_numbers(line).map_err(|reason| GridError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        })?;
        values.extend(parsed);
    }
    Ok(values)
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

fn parse_numbers(line: &str) -> std::result::Result<Vec<f64>, String> {
    tokens(line)
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|e| format!("'{token}' is not a number: {e}"))
        })
        .collect()
}

// Id lists are often written as floats ("123.0")
fn parse_id(token: &str) -> std::result::Result<u64, String> {
    if let Ok(id) = token.parse::<u64>() {
        return Ok(id);
    }
    let value = token
        .parse::<f64>()
        .map_err(|e| format!("'{token}' is not a number: {e}"))?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(format!("'{token}' is not a non-negative integer id"))
    }
}
