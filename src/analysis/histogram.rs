//! Equal-width histograms of activation vectors

use num_traits::Float;

use crate::io::error::{Result, invalid_input, invalid_parameter};

/// Bin counts with `counts.len() + 1` edges
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Number of values falling into each bin
    pub counts: Vec<usize>,
    /// Bin boundaries in ascending order
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Histogram of finite values over their own range
    ///
    /// An empty input spans [0, 1]. A constant input spans one unit centred on
    /// the value. Every bin is half-open except the last, which also holds the
    /// maximum.
    ///
    /// # Errors
    ///
    /// Returns an error if `bins` is zero or the value range overflows
    pub fn of_values<T: Float>(values: &[T], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(invalid_parameter("bins", &bins, &"must be positive"));
        }

        let finite: Vec<f64> = values
            .iter()
            .filter_map(|value| value.to_f64())
            .filter(|value| value.is_finite())
            .collect();

        let (low, high) = match finite.iter().copied().fold(None, |range, value| {
            Some(range.map_or((value, value), |(lo, hi): (f64, f64)| {
                (lo.min(value), hi.max(value))
            }))
        }) {
            None => (0.0, 1.0),
            #[allow(clippy::float_cmp)]
            Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
            Some(range) => range,
        };

        let span = high - low;
        if !span.is_finite() {
            return Err(invalid_input(&"histogram value range is not finite"));
        }
        let width = span / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|edge| {
                if edge == bins {
                    high
                } else {
                    width.mul_add(edge as f64, low)
                }
            })
            .collect();

        let mut counts = vec![0usize; bins];
        for value in finite {
            let bin = (((value - low) / width) as usize).min(bins - 1);
            if let Some(count) = counts.get_mut(bin) {
                *count += 1;
            }
        }

        Ok(Self { counts, edges })
    }

    /// Histogram of the strictly positive entries only
    ///
    /// Rectified activations are mostly zero; dropping them keeps the shape of
    /// the active tail visible.
    ///
    /// # Errors
    ///
    /// Returns an error if `bins` is zero
    pub fn of_positive<T: Float>(values: &[T], bins: usize) -> Result<Self> {
        let positive: Vec<T> = values
            .iter()
            .copied()
            .filter(|value| *value > T::zero())
            .collect();
        Self::of_values(&positive, bins)
    }

    /// Total number of counted values
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterate over `(low, high, count)` per bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| {
                (
                    edge.first().copied().unwrap_or_default(),
                    edge.get(1).copied().unwrap_or_default(),
                    count,
                )
            })
    }
}
