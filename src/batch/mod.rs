//! Image batches and blob layout conversions

/// Validated batch container
pub mod image_batch;
/// Conversions from engine tensor layouts
pub mod reshape;

pub use image_batch::ImageBatch;
