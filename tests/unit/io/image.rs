//! Tests for image decoding into batches and PNG export of canvases

#[cfg(test)]
mod tests {
    use filtergrid::io::image::{export_canvas_png, load_batch};
    use filtergrid::{GridError, ImageBatch, tile};
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use ndarray::Array4;
    use std::path::{Path, PathBuf};

    fn write_gray(dir: &Path, name: &str, value: u8, size: u32) -> PathBuf {
        let path = dir.join(name);
        GrayImage::from_pixel(size, size, Luma([value]))
            .save(&path)
            .unwrap();
        path
    }

    fn write_rgb(dir: &Path, name: &str, value: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(2, 2, Rgb(value)).save(&path).unwrap();
        path
    }

    // Tests gray files load as a gray batch scaled to [0, 1]
    // Verified by loading every file as RGB
    #[test]
    fn test_load_gray_batch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_gray(dir.path(), "a.png", 0, 2),
            write_gray(dir.path(), "b.png", 255, 2),
        ];

        let batch = load_batch(&paths).unwrap();

        assert_eq!(batch.len(), 2);
        assert!(!batch.has_channel_axis());
        assert_eq!(batch.image_shape(), vec![2, 2]);
        let second = batch.image(1).unwrap();
        assert!(second.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    // Tests any color file promotes the whole batch to RGB
    // Verified by deciding color from the first file only
    #[test]
    fn test_load_mixed_batch_is_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_gray(dir.path(), "a.png", 128, 2),
            write_rgb(dir.path(), "b.png", [255, 0, 0]),
        ];

        let batch = load_batch(&paths).unwrap();

        assert!(batch.has_channel_axis());
        assert_eq!(batch.channels(), 3);
        let red = batch.image(1).unwrap();
        assert_eq!(red.get((0, 0, 0)), Some(&1.0));
        assert_eq!(red.get((0, 0, 1)), Some(&0.0));
    }

    // Tests images of different sizes are rejected with the offending path
    // Verified by skipping the size comparison
    #[test]
    fn test_load_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_gray(dir.path(), "a.png", 0, 2),
            write_gray(dir.path(), "big.png", 0, 3),
        ];

        let error = load_batch(&paths).unwrap_err();

        assert!(matches!(error, GridError::InvalidInput { .. }));
        assert!(error.to_string().contains("big.png"));
    }

    // Tests missing files and empty lists fail
    // Verified by skipping undecodable files
    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = vec![dir.path().join("missing.png")];
        assert!(matches!(
            load_batch(&missing),
            Err(GridError::ImageLoad { .. })
        ));

        let none: Vec<PathBuf> = Vec::new();
        assert!(load_batch(&none).is_err());
    }

    // Tests gray canvases export as 8-bit PNG with matching dimensions
    // Verified by swapping width and height
    #[test]
    fn test_export_gray_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let stack = ndarray::Array3::from_shape_fn((3, 2, 4), |(n, _, c)| (n * 4 + c) as f64);
        let batch = ImageBatch::from_stack(stack).unwrap();
        let canvas = tile(&batch, 1, 1.0).unwrap();
        let output = dir.path().join("nested").join("grid.png");

        export_canvas_png(&canvas, &output).unwrap();

        let written = image::open(&output).unwrap().to_luma8();
        assert_eq!(written.dimensions(), (10, 6));
        assert_eq!(written.get_pixel(0, 0).0, [0]);
        assert_eq!(written.get_pixel(4, 0).0, [255]);
        assert_eq!(written.get_pixel(9, 5).0, [255]);
    }

    // Tests RGB canvases keep three channels
    // Verified by exporting only the first channel
    #[test]
    fn test_export_rgb_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let data =
            Array4::from_shape_fn((2, 1, 1, 3), |(n, _, _, c)| if n == c { 1.0 } else { 0.0 });
        let batch = ImageBatch::from_nhwc(data).unwrap();
        let canvas = tile(&batch, 0, 0.0).unwrap();
        let output = dir.path().join("rgb.png");

        export_canvas_png(&canvas, &output).unwrap();

        let written = image::open(&output).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (2, 2));
        assert_eq!(written.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(written.get_pixel(1, 0).0, [0, 255, 0]);
    }

    // Tests canvases with unrenderable channel counts are rejected
    // Verified by exporting the first channel as gray
    #[test]
    fn test_export_two_channel_canvas_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let data = Array4::from_shape_fn((1, 2, 2, 2), |(_, r, _, c)| (r + c) as f64);
        let batch = ImageBatch::from_nhwc(data).unwrap();
        let canvas = tile(&batch, 1, 0.0).unwrap();

        let result = export_canvas_png(&canvas, &dir.path().join("two.png"));

        assert!(matches!(result, Err(GridError::InvalidInput { .. })));
    }
}
