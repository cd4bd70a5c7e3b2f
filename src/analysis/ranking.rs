//! Class ranking over score vectors and label lookup

use num_traits::Float;
use std::cmp::Ordering;
use std::io::BufRead;
use std::path::Path;

use crate::io::error::{GridError, Result, file_system, invalid_input};

/// Index of the first maximum score, ignoring NaN
pub fn argmax<T: Float>(scores: &[T]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best: Option<(usize, T)>, (index, &score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((index, score)),
        })
        .map(|(index, _)| index)
}

/// Indices of the `k` highest scores in descending order
///
/// Ties keep ascending index order; NaN scores sort last.
pub fn top_k<T: Float>(scores: &[T], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let (left, right) = (
            scores.get(a).copied().unwrap_or_else(T::nan),
            scores.get(b).copied().unwrap_or_else(T::nan),
        );
        descending(left, right)
    });
    order.truncate(k);
    order
}

// Stable sort keeps index order among equal scores
fn descending<T: Float>(left: T, right: T) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
    }
}

/// One ranked prediction
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLabel {
    /// Class index into the score vector
    pub index: usize,
    /// Score at that index
    pub score: f64,
    /// Human-readable class label
    pub label: String,
}

/// Class labels, one per score index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    entries: Vec<String>,
}

impl Labels {
    /// Wrap an existing label list
    pub const fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Read labels from a text file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(file_system(path, "open labels"))?;
        Self::from_reader(std::io::BufReader::new(file)).map_err(|error| match error {
            GridError::FileSystem {
                operation, source, ..
            } => GridError::FileSystem {
                path: path.to_path_buf(),
                operation,
                source,
            },
            other => other,
        })
    }

    /// Read labels line by line
    ///
    /// Blank lines are skipped. Only the first tab-separated field of a line
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let label = line.split('\t').next().unwrap_or_default().trim();
            if !label.is_empty() {
                entries.push(label.to_string());
            }
        }
        Ok(Self { entries })
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no labels were loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for a class index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Top `k` predictions paired with their labels
    ///
    /// # Errors
    ///
    /// Returns an error if a ranked index has no label
    pub fn rank<T: Float>(&self, scores: &[T], k: usize) -> Result<Vec<RankedLabel>> {
        top_k(scores, k)
            .into_iter()
            .map(|index| {
                let label = self.get(index).ok_or_else(|| {
                    invalid_input(&format!(
                        "class {index} has no label ({} labels loaded)",
                        self.len()
                    ))
                })?;
                Ok(RankedLabel {
                    index,
                    score: scores
                        .get(index)
                        .and_then(|score| score.to_f64())
                        .unwrap_or(f64::NAN),
                    label: label.to_string(),
                })
            })
            .collect()
    }
}
