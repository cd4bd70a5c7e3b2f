//! Grid tiling of image batches
//!
//! This module contains:
//! - Batch-wide min-max normalization
//! - Square grid layout with constant padding

/// Square grid layout and canvas type
pub mod grid;
/// Batch-wide normalization to [0, 1]
pub mod normalize;

pub use grid::{Canvas, TileOptions, tile, tile_with};
