//! Conversions from engine blob layouts into image batches
//!
//! Weight blobs arrive channel-first, (N, C, H, W). Viewing them as pictures
//! needs channel-last order, and multi-channel kernels beyond RGB are easier to
//! read once every (output, input) pair becomes its own gray tile.

use ndarray::{Array4, ArrayD, Axis, Ix2, Ix3, Ix4, Slice};
use num_traits::Float;
use tracing::debug;

use crate::batch::ImageBatch;
use crate::io::error::{Result, invalid_input};

impl<T: Float> ImageBatch<T> {
    /// Build a batch from a channel-first (N, C, H, W) blob
    ///
    /// Single-channel blobs become gray batches without a channel axis.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero
    pub fn from_nchw(blob: Array4<T>) -> Result<Self> {
        let channels = blob.len_of(Axis(1));
        let data = blob
            .permuted_axes([0, 2, 3, 1])
            .as_standard_layout()
            .into_owned();
        Self::from_parts(data, channels != 1)
    }

    /// Flatten an (O, I, H, W) kernel bank into O·I gray images
    ///
    /// `limit` keeps only the first outputs before flattening, so a bank of
    /// 256 kernels over 48 inputs with a limit of 48 yields 48² tiles.
    ///
    /// # Errors
    ///
    /// Returns an error if `limit` is zero or the bank has a zero-sized dimension
    pub fn from_kernel_bank(bank: &Array4<T>, limit: Option<usize>) -> Result<Self> {
        let (outputs, inputs, height, width) = bank.dim();
        let kept = match limit {
            Some(0) => return Err(invalid_input(&"kernel limit must be positive")),
            Some(limit) => limit.min(outputs),
            None => outputs,
        };

        let flat = bank
            .slice_axis(Axis(0), Slice::from(0..kept))
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((kept * inputs, height, width))
            .map_err(|e| invalid_input(&e))?;

        debug!(kept, inputs, height, width, "flattened kernel bank");
        Self::from_stack(flat)
    }

    /// Build a batch from a blob of any supported rank
    ///
    /// - 2-D: one gray image
    /// - 3-D: (N, H, W) gray stack
    /// - 4-D: (N, H, W, C) batch
    ///
    /// # Errors
    ///
    /// Returns an error for other ranks or zero-sized dimensions
    pub fn from_dyn(blob: ArrayD<T>) -> Result<Self> {
        match blob.ndim() {
            2 => {
                let image = blob
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| invalid_input(&e))?;
                Self::from_stack(image.insert_axis(Axis(0)))
            }
            3 => Self::from_stack(
                blob.into_dimensionality::<Ix3>()
                    .map_err(|e| invalid_input(&e))?,
            ),
            4 => Self::from_nhwc(
                blob.into_dimensionality::<Ix4>()
                    .map_err(|e| invalid_input(&e))?,
            ),
            rank => Err(invalid_input(&format!(
                "blob of rank {rank} cannot be viewed as an image batch"
            ))),
        }
    }
}
