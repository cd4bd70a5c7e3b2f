//! Grid visualization of convolutional filters and activations
//!
//! Batches of same-shaped images are normalized over the whole batch and laid
//! out on a square grid with constant padding. Helpers around the tiler cover
//! blob layout conversion, class ranking, activation histograms and feature
//! dumps.

#![deny(unsafe_code)]

/// Statistical summaries of score and activation vectors
pub mod analysis;
/// Image batch container and blob layout conversions
pub mod batch;
/// Input/output operations and error handling
pub mod io;
/// Normalization and square grid layout
pub mod tiling;

pub use batch::ImageBatch;
pub use io::error::{GridError, Result};
pub use tiling::{Canvas, TileOptions, tile, tile_with};
