//! Validated container for a batch of same-shaped images
//!
//! Every image is stored as one slab of an (N, H, W, C) array. Gray images use
//! a single channel and remember that the caller never asked for a channel axis,
//! so shapes reported back match what went in.

use ndarray::{Array2, Array3, Array4, ArrayView3, Axis};
use num_traits::Float;

use crate::io::error::{Result, invalid_input};

/// Ordered batch of N images sharing height, width and channel count
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch<T> {
    data: Array4<T>,
    channel_axis: bool,
}

impl<T: Float> ImageBatch<T> {
    /// Build a batch from an (N, H, W, C) array, keeping the channel axis
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero
    pub fn from_nhwc(data: Array4<T>) -> Result<Self> {
        Self::from_parts(data, true)
    }

    /// Build a gray batch from an (N, H, W) stack
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero
    pub fn from_stack(stack: Array3<T>) -> Result<Self> {
        Self::from_parts(stack.insert_axis(Axis(3)), false)
    }

    /// Build a gray batch from individual (H, W) images
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or the images differ in shape
    pub fn from_images(images: &[Array2<T>]) -> Result<Self> {
        let first = images
            .first()
            .ok_or_else(|| invalid_input(&"batch must contain at least one image"))?;
        check_shapes(images.iter().map(Array2::shape), first.shape())?;

        let views: Vec<_> = images.iter().map(Array2::view).collect();
        let stack = ndarray::stack(Axis(0), &views).map_err(|e| invalid_input(&e))?;
        Self::from_stack(stack)
    }

    /// Build a batch from individual (H, W, C) images
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or the images differ in shape
    pub fn from_color_images(images: &[Array3<T>]) -> Result<Self> {
        let first = images
            .first()
            .ok_or_else(|| invalid_input(&"batch must contain at least one image"))?;
        check_shapes(images.iter().map(Array3::shape), first.shape())?;

        let views: Vec<_> = images.iter().map(Array3::view).collect();
        let data = ndarray::stack(Axis(0), &views).map_err(|e| invalid_input(&e))?;
        Self::from_nhwc(data)
    }

    pub(crate) fn from_parts(data: Array4<T>, channel_axis: bool) -> Result<Self> {
        let (count, height, width, channels) = data.dim();
        if count == 0 {
            return Err(invalid_input(&"batch must contain at least one image"));
        }
        if height == 0 || width == 0 || channels == 0 {
            return Err(invalid_input(&format!(
                "image shape {height}x{width}x{channels} has a zero-sized dimension"
            )));
        }
        Ok(Self { data, channel_axis })
    }

    /// Number of images in the batch
    pub fn len(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Always false; construction rejects empty batches
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// Channel count (1 for gray batches)
    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    /// Whether images are reported as (H, W, C) rather than (H, W)
    pub const fn has_channel_axis(&self) -> bool {
        self.channel_axis
    }

    /// Shape of one image as the caller sees it
    pub fn image_shape(&self) -> Vec<usize> {
        if self.channel_axis {
            vec![self.height(), self.width(), self.channels()]
        } else {
            vec![self.height(), self.width()]
        }
    }

    /// View of image `index` as (H, W, C)
    pub fn image(&self, index: usize) -> Option<ArrayView3<'_, T>> {
        (index < self.len()).then(|| self.data.index_axis(Axis(0), index))
    }

    /// Underlying (N, H, W, C) storage
    pub const fn as_array(&self) -> &Array4<T> {
        &self.data
    }

    /// Keep only the first `count` images
    ///
    /// Counts beyond the batch length keep every image.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero
    pub fn truncated(&self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(invalid_input(&"cannot truncate a batch to zero images"));
        }
        let keep = count.min(self.len());
        let data = self
            .data
            .slice_axis(Axis(0), ndarray::Slice::from(0..keep))
            .to_owned();
        Self::from_parts(data, self.channel_axis)
    }

    /// Apply `f` to every element, returning a new batch
    pub(crate) fn map_values(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            data: self.data.mapv(f),
            channel_axis: self.channel_axis,
        }
    }
}

fn check_shapes<'a>(shapes: impl Iterator<Item = &'a [usize]>, expected: &[usize]) -> Result<()> {
    for (index, shape) in shapes.enumerate() {
        if shape != expected {
            return Err(invalid_input(&format!(
                "image {index} has shape {shape:?}, expected {expected:?}"
            )));
        }
    }
    Ok(())
}
