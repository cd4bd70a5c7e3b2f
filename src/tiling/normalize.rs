//! Batch-wide min-max normalization
//!
//! The range is taken over the entire batch, never per image, so relative
//! brightness between tiles survives. Normalizing twice is not a no-op in
//! general: the second pass stretches to [0, 1] again, and only a batch that
//! already spans exactly [0, 1] comes back unchanged.

use num_traits::Float;

use crate::batch::ImageBatch;
use crate::io::error::{GridError, Result, invalid_input};

/// Global (min, max) over every element, ignoring NaN
///
/// Returns `None` when the batch holds nothing but NaN.
pub fn value_range<T: Float>(batch: &ImageBatch<T>) -> Option<(T, T)> {
    batch
        .as_array()
        .iter()
        .filter(|value| !value.is_nan())
        .fold(None, |range, &value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Rescale a copy of the batch to [0, 1] using its global range
///
/// # Errors
///
/// Returns `DegenerateBatch` if every comparable element shares one value,
/// or `InvalidInput` if the range is infinite
pub fn normalize<T: Float>(batch: &ImageBatch<T>) -> Result<ImageBatch<T>> {
    let (min, max) = value_range(batch).ok_or(GridError::DegenerateBatch { value: f64::NAN })?;

    let span = max - min;
    if !span.is_finite() {
        return Err(invalid_input(&"batch value range is not finite"));
    }
    if span <= T::zero() {
        return Err(GridError::DegenerateBatch {
            value: min.to_f64().unwrap_or(f64::NAN),
        });
    }

    Ok(batch.map_values(|value| (value - min) / span))
}
