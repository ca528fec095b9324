//! Synthetic image and upload builders for testing.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Builder for creating synthetic test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Raw Images ===

    /// Creates a solid-color RGB image.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// Creates a diagonal color gradient.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let r = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            let g = ((u32::from(u8::MAX) * y) / height.max(1)) as u8;
            Rgb([r, g, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// Creates a grayscale checkerboard (decodes to RGB with equal channels).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let img = image::GrayImage::from_fn(width, height, |x, y| {
            if (x / cell_size + y / cell_size) % 2 == 0 {
                image::Luma([255u8])
            } else {
                image::Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    // === Encoded Uploads ===

    /// Encodes an image as PNG bytes.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which only happens on allocation failure.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("PNG encoding of an in-memory image");
        bytes
    }

    /// Encodes an image as JPEG bytes.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn jpeg(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .expect("JPEG encoding of an in-memory image");
        bytes
    }

    /// Returns bytes that carry a PNG signature but are not a valid image.
    #[must_use]
    pub fn corrupt_png() -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(b"this is not a real chunk stream");
        bytes
    }

    /// Returns a small PNG suitable for most upload tests.
    #[must_use]
    pub fn sample_png() -> Vec<u8> {
        Self::png(&Self::gradient(64, 48))
    }
}
