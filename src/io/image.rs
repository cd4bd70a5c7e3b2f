//! Image file decoding into batches and PNG export of canvases

use image::{ColorType, DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{Array2, Array3};
use num_traits::Float;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::batch::ImageBatch;
use crate::io::error::{GridError, Result, invalid_input};
use crate::io::progress::ProgressManager;
use crate::tiling::Canvas;

/// Decode image files into one batch with values in [0, 1]
///
/// When every file is single-channel the batch is gray; otherwise all images
/// are read as RGB.
///
/// # Errors
///
/// Returns an error if:
/// - No paths are given
/// - A file cannot be decoded
/// - The images differ in size
pub fn load_batch<P: AsRef<Path>>(paths: &[P]) -> Result<ImageBatch<f32>> {
    load_batch_with_progress(paths, &ProgressManager::hidden(paths.len()))
}

/// Decode image files into one batch, advancing `progress` per file
///
/// # Errors
///
/// Same conditions as [`load_batch`]
pub fn load_batch_with_progress<P: AsRef<Path>>(
    paths: &[P],
    progress: &ProgressManager,
) -> Result<ImageBatch<f32>> {
    let mut decoded = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| GridError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        decoded.push((path.to_path_buf(), img));
        progress.advance();
    }

    let first_dims = decoded
        .first()
        .map(|(_, img)| (img.width(), img.height()))
        .ok_or_else(|| invalid_input(&"no images to load"))?;
    if let Some((path, img)) = decoded
        .iter()
        .find(|(_, img)| (img.width(), img.height()) != first_dims)
    {
        return Err(invalid_input(&format!(
            "'{}' is {}x{}, expected {}x{}",
            path.display(),
            img.width(),
            img.height(),
            first_dims.0,
            first_dims.1
        )));
    }

    let gray = decoded.iter().all(|(_, img)| is_single_channel(img));
    debug!(count = decoded.len(), gray, "decoded image batch");

    if gray {
        let images: Vec<Array2<f32>> = decoded.iter().map(|(_, img)| luma_array(img)).collect();
        ImageBatch::from_images(&images)
    } else {
        let images: Vec<Array3<f32>> = decoded.iter().map(|(_, img)| rgb_array(img)).collect();
        ImageBatch::from_color_images(&images)
    }
}

fn is_single_channel(img: &DynamicImage) -> bool {
    matches!(
        img.color(),
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16
    )
}

fn luma_array(img: &DynamicImage) -> Array2<f32> {
    let luma = img.to_luma32f();
    let (width, height) = (luma.width() as usize, luma.height() as usize);
    Array2::from_shape_fn((height, width), |(row, col)| {
        luma.get_pixel(col as u32, row as u32).0[0]
    })
}

fn rgb_array(img: &DynamicImage) -> Array3<f32> {
    let rgb = img.to_rgb32f();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    Array3::from_shape_fn((height, width, 3), |(row, col, channel)| {
        rgb.get_pixel(col as u32, row as u32)
            .0
            .get(channel)
            .copied()
            .unwrap_or_default()
    })
}

/// Export a canvas as an 8-bit PNG
///
/// Values are clamped to [0, 1] before scaling.
///
/// # Errors
///
/// Returns an error if:
/// - The canvas has a channel count other than 1, 3 or 4
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_canvas_png<T: Float>(canvas: &Canvas<T>, output_path: &Path) -> Result<()> {
    let (width, height) = (canvas.cols() as u32, canvas.rows() as u32);
    let sample = |x: u32, y: u32, channel: usize| {
        to_byte(canvas.get(y as usize, x as usize, channel).unwrap_or_else(T::zero))
    };

    let img = match canvas.channels() {
        1 => DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
            image::Luma([sample(x, y, 0)])
        })),
        3 => DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([sample(x, y, 0), sample(x, y, 1), sample(x, y, 2)])
        })),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([
                sample(x, y, 0),
                sample(x, y, 1),
                sample(x, y, 2),
                sample(x, y, 3),
            ])
        })),
        channels => {
            return Err(invalid_input(&format!(
                "cannot export a canvas with {channels} channels as PNG"
            )));
        }
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GridError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| GridError::ImageExport {
            path: PathBuf::from(output_path),
            source: e,
        })?;

    debug!(path = %output_path.display(), width, height, "exported canvas");
    Ok(())
}

fn to_byte<T: Float>(value: T) -> u8 {
    let unit = value.to_f64().unwrap_or(0.0);
    let unit = if unit.is_nan() { 0.0 } else { unit.clamp(0.0, 1.0) };
    (unit * 255.0).round() as u8
}
