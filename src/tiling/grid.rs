//! Square grid layout of a normalized image batch
//!
//! A batch of N images lands on an n×n grid with n = ceil(sqrt(N)). Each cell
//! holds one image in its top-left corner followed by a `pad_size` strip on the
//! right and bottom. The strip after the last row and column is kept, so the
//! canvas is always exactly n·(H + pad) by n·(W + pad).

use ndarray::{Array3, ArrayD, ArrayView3, Axis, s};
use num_traits::Float;
use tracing::{debug, warn};

use crate::batch::ImageBatch;
use crate::io::configuration::DEFAULT_PAD_SIZE;
use crate::io::error::{GridError, Result, invalid_parameter};
use crate::tiling::normalize::normalize;

/// Padding applied between and after cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileOptions<T> {
    /// Border width appended to the right and bottom of every cell
    pub pad_size: usize,
    /// Fill for borders and unused cells
    pub pad_value: T,
}

impl<T: Float> Default for TileOptions<T> {
    fn default() -> Self {
        Self {
            pad_size: DEFAULT_PAD_SIZE,
            pad_value: T::zero(),
        }
    }
}

/// Composite image produced by [`tile`]
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas<T> {
    data: Array3<T>,
    channel_axis: bool,
    grid_side: usize,
    cell_dims: (usize, usize),
    image_dims: (usize, usize),
}

impl<T: Float> Canvas<T> {
    /// Canvas height in pixels
    pub fn rows(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Canvas width in pixels
    pub fn cols(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Channel count (1 for gray canvases)
    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// Whether the canvas is reported as (rows, cols, C)
    pub const fn has_channel_axis(&self) -> bool {
        self.channel_axis
    }

    /// Number of cells along each side of the grid
    pub const fn grid_side(&self) -> usize {
        self.grid_side
    }

    /// Canvas shape as the display surface expects it
    pub fn shape(&self) -> Vec<usize> {
        if self.channel_axis {
            vec![self.rows(), self.cols(), self.channels()]
        } else {
            vec![self.rows(), self.cols()]
        }
    }

    /// Value at a pixel, `None` when out of bounds
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<T> {
        self.data.get((row, col, channel)).copied()
    }

    /// Image region of the cell at grid position (`grid_row`, `grid_col`)
    ///
    /// The view excludes the cell's padding strips.
    pub fn cell(&self, grid_row: usize, grid_col: usize) -> Option<ArrayView3<'_, T>> {
        if grid_row >= self.grid_side || grid_col >= self.grid_side {
            return None;
        }
        let top = grid_row * self.cell_dims.0;
        let left = grid_col * self.cell_dims.1;
        Some(self.data.slice(s![
            top..top + self.image_dims.0,
            left..left + self.image_dims.1,
            ..
        ]))
    }

    /// Underlying (rows, cols, C) storage
    pub const fn as_array(&self) -> &Array3<T> {
        &self.data
    }

    /// Canvas as a 2-D or 3-D array matching [`Canvas::shape`]
    pub fn into_dyn(self) -> ArrayD<T> {
        if self.channel_axis {
            self.data.into_dyn()
        } else {
            self.data.index_axis_move(Axis(2), 0).into_dyn()
        }
    }
}

/// Smallest n with n² ≥ count
pub const fn grid_side(count: usize) -> usize {
    let root = count.isqrt();
    if root * root < count { root + 1 } else { root }
}

// Element count and byte size must both stay addressable
fn fits_allocation<T>(rows: usize, cols: usize, channels: usize) -> bool {
    rows.checked_mul(cols)
        .and_then(|pixels| pixels.checked_mul(channels))
        .and_then(|elements| elements.checked_mul(size_of::<T>()))
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

/// Tile a batch onto a square grid canvas
///
/// # Errors
///
/// Returns an error if the canvas dimensions overflow
pub fn tile<T: Float>(batch: &ImageBatch<T>, pad_size: usize, pad_value: T) -> Result<Canvas<T>> {
    tile_with(
        batch,
        &TileOptions {
            pad_size,
            pad_value,
        },
    )
}

/// Tile a batch using an options struct
///
/// A constant batch cannot be normalized; the result is then a canvas filled
/// entirely with the pad value.
///
/// # Errors
///
/// Returns an error if the canvas dimensions overflow or the batch range is
/// not finite
pub fn tile_with<T: Float>(batch: &ImageBatch<T>, options: &TileOptions<T>) -> Result<Canvas<T>> {
    let side = grid_side(batch.len());
    let (height, width) = (batch.height(), batch.width());

    let cell_dims = (
        height.checked_add(options.pad_size),
        width.checked_add(options.pad_size),
    );
    let canvas_dims = match cell_dims {
        (Some(cell_h), Some(cell_w)) => side
            .checked_mul(cell_h)
            .zip(side.checked_mul(cell_w))
            .filter(|&(rows, cols)| fits_allocation::<T>(rows, cols, batch.channels()))
            .map(|dims| (dims, (cell_h, cell_w))),
        _ => None,
    };
    let ((rows, cols), cell_dims) = canvas_dims.ok_or_else(|| {
        invalid_parameter(
            "pad_size",
            &options.pad_size,
            &"canvas dimensions overflow",
        )
    })?;

    debug!(
        images = batch.len(),
        side, rows, cols, "allocating grid canvas"
    );
    let mut data = Array3::from_elem((rows, cols, batch.channels()), options.pad_value);

    match normalize(batch) {
        Ok(normalized) => {
            for (index, image) in normalized.as_array().outer_iter().enumerate() {
                let top = (index / side) * cell_dims.0;
                let left = (index % side) * cell_dims.1;
                data.slice_mut(s![top..top + height, left..left + width, ..])
                    .assign(&image);
            }
        }
        Err(GridError::DegenerateBatch { value }) => {
            warn!(value, "constant batch, emitting pad-filled canvas");
        }
        Err(error) => return Err(error),
    }

    Ok(Canvas {
        data,
        channel_axis: batch.has_channel_axis(),
        grid_side: side,
        cell_dims,
        image_dims: (height, width),
    })
}
