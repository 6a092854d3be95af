//! Thumbnail processor - generates thumbnails from original images
//!
//! Takes an image, bounds its width to the configured maximum while
//! maintaining aspect ratio, and encodes it as JPEG with configurable
//! quality. Originals already within the bound are re-encoded as-is, never
//! upscaled.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use crate::error::{AppError, Result};
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Configuration for thumbnail generation
#[derive(Clone, Debug)]
pub struct ThumbnailConfig {
    /// Maximum width in pixels
    pub max_width: u32,
    /// JPEG quality (0-100)
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            quality: 85,
        }
    }
}

/// Result of thumbnail generation
#[derive(Debug)]
pub struct ThumbnailResult {
    /// The thumbnail image data as JPEG
    pub data: Bytes,
    /// Width of the thumbnail
    pub width: u32,
    /// Height of the thumbnail
    pub height: u32,
}

/// Thumbnail processor
pub struct ThumbnailProcessor {
    config: ThumbnailConfig,
}

impl ThumbnailProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Create a processor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ThumbnailConfig::default())
    }

    /// Generate a thumbnail from the given image data (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `generate_async` instead.
    pub fn generate(&self, original_data: &[u8]) -> Result<ThumbnailResult> {
        let img = image::load_from_memory(original_data)
            .map_err(|e| AppError::ImageError(format!("Failed to decode image: {e}")))?;

        // JPEG has no alpha channel; flatten RGBA and friends to RGB first
        let img = if img.color().has_alpha() {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        };

        let (orig_w, orig_h) = img.dimensions();
        debug!(
            original_width = orig_w,
            original_height = orig_h,
            "Processing image for thumbnail"
        );

        // Already within the bound: re-encode without resampling
        if orig_w <= self.config.max_width {
            let data = self.encode_jpeg(&img)?;
            return Ok(ThumbnailResult {
                data,
                width: orig_w,
                height: orig_h,
            });
        }

        let (new_w, new_h) = self.calculate_dimensions(orig_w, orig_h);

        // Resize with high-quality filter
        let resized = img.resize_exact(new_w.max(1), new_h.max(1), FilterType::Lanczos3);

        let data = self.encode_jpeg(&resized)?;

        debug!(
            width = new_w,
            height = new_h,
            size = data.len(),
            "Thumbnail generated"
        );

        Ok(ThumbnailResult {
            data,
            width: new_w,
            height: new_h,
        })
    }

    /// Generate a thumbnail asynchronously using a blocking thread pool
    ///
    /// This method offloads the CPU-intensive image processing to a dedicated
    /// thread pool, preventing the async runtime from being blocked.
    pub async fn generate_async(self: Arc<Self>, original_data: Bytes) -> Result<ThumbnailResult> {
        let processor = self.clone();

        tokio::task::spawn_blocking(move || processor.generate(&original_data))
            .await
            .map_err(|e| AppError::Internal(format!("Thumbnail task panicked: {e}")))?
    }

    /// Calculate new dimensions, scaling both axes by `max_width / width`
    /// with the height rounded to the nearest pixel.
    fn calculate_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let ratio = self.config.max_width as f32 / width as f32;
        (
            self.config.max_width,
            ((height as f32) * ratio).round() as u32,
        )
    }

    /// Encode image as JPEG
    fn encode_jpeg(&self, img: &DynamicImage) -> Result<Bytes> {
        let mut buf = Vec::new();
        let mut cursor = Cursor::new(&mut buf);

        img.write_to(&mut cursor, ImageOutputFormat::Jpeg(self.config.quality))
            .map_err(|e| AppError::ImageError(format!("Failed to encode JPEG: {e}")))?;

        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 200, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .expect("encode test png");
        buf
    }

    #[test]
    fn test_calculate_dimensions_wide() {
        let processor = ThumbnailProcessor::with_defaults();
        let (w, h) = processor.calculate_dimensions(1200, 800);
        assert_eq!(w, 400);
        assert_eq!(h, 267);
    }

    #[test]
    fn test_calculate_dimensions_tall() {
        let processor = ThumbnailProcessor::with_defaults();
        let (w, h) = processor.calculate_dimensions(1000, 2000);
        assert_eq!(w, 400);
        assert_eq!(h, 800);
    }

    #[test]
    fn test_calculate_dimensions_rounds_height() {
        let processor = ThumbnailProcessor::with_defaults();
        // 333 * 400 / 777 = 171.43.. -> 171
        let (w, h) = processor.calculate_dimensions(777, 333);
        assert_eq!(w, 400);
        assert_eq!(h, 171);
    }

    #[test]
    fn resizes_wide_original_down_to_max_width() {
        let processor = ThumbnailProcessor::with_defaults();
        let result = processor.generate(&png_bytes(1000, 2000)).unwrap();
        assert_eq!((result.width, result.height), (400, 800));

        let thumb = image::load_from_memory(&result.data).unwrap();
        assert_eq!(thumb.dimensions(), (400, 800));
    }

    #[test]
    fn never_upscales_small_original() {
        let processor = ThumbnailProcessor::with_defaults();
        let result = processor.generate(&png_bytes(300, 180)).unwrap();
        assert_eq!((result.width, result.height), (300, 180));
    }

    #[test]
    fn flattens_alpha_before_jpeg_encode() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            600,
            400,
            Rgba([255, 0, 0, 128]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .expect("encode test png");

        let processor = ThumbnailProcessor::with_defaults();
        let result = processor.generate(&buf).unwrap();
        assert_eq!((result.width, result.height), (400, 267));

        let thumb = image::load_from_memory(&result.data).unwrap();
        assert!(!thumb.color().has_alpha());
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let processor = ThumbnailProcessor::with_defaults();
        let err = processor.generate(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::ImageError(_)));
    }

    #[test]
    fn generate_async_matches_blocking_result() {
        let processor = Arc::new(ThumbnailProcessor::with_defaults());
        let result = tokio_test::block_on(
            processor.generate_async(Bytes::from(png_bytes(800, 600))),
        )
        .unwrap();
        assert_eq!((result.width, result.height), (400, 300));
    }
}
