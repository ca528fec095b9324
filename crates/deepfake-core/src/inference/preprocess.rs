//! Image decoding and normalization into network input tensors.

// Pixel coordinates are bounded by INPUT_SIZE
#![allow(clippy::cast_possible_truncation)]

use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::RgbImage;

use crate::domain::DetectError;

/// Input width and height expected by the network.
pub const INPUT_SIZE: usize = 224;

/// Per-channel ImageNet means (RGB).
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel ImageNet standard deviations (RGB).
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decodes raw upload bytes into an 8-bit RGB image.
///
/// The format is guessed from the bytes; the declared content type plays no role.
///
/// # Errors
///
/// Returns [`DetectError::DecodeFailure`] with the decoder's message if the
/// bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DetectError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| DetectError::DecodeFailure(e.to_string()))
}

/// Converts an RGB image into a normalized `(1, 3, 224, 224)` tensor.
///
/// The image is resized to exactly 224x224 with bilinear filtering, ignoring
/// its aspect ratio. Values are scaled to `[0, 1]` and normalized with
/// [`IMAGENET_MEAN`] and [`IMAGENET_STD`], channel-major.
///
/// # Errors
///
/// Returns an error if the tensor cannot be created on `device`.
pub fn to_input_tensor(image: &RgbImage, device: &Device) -> candle_core::Result<Tensor> {
    let resized = image::imageops::resize(
        image,
        INPUT_SIZE as u32,
        INPUT_SIZE as u32,
        FilterType::Triangle,
    );

    let plane = INPUT_SIZE * INPUT_SIZE;
    let mut data = vec![0.0f32; 3 * plane];

    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = y as usize * INPUT_SIZE + x as usize;
        for channel in 0..3 {
            let value = f32::from(pixel[channel]) / 255.0;
            data[channel * plane + offset] =
                (value - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel];
        }
    }

    Tensor::from_vec(data, (1, 3, INPUT_SIZE, INPUT_SIZE), device)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_output_shape_independent_of_input_size() {
        for (w, h) in [(1, 1), (17, 300), (640, 480), (224, 224)] {
            let img = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
            let tensor = to_input_tensor(&img, &Device::Cpu).expect("tensor");
            assert_eq!(tensor.dims(), &[1, 3, INPUT_SIZE, INPUT_SIZE]);
        }
    }

    #[test]
    fn test_normalization_per_channel() {
        let img = RgbImage::from_pixel(8, 8, Rgb([255, 0, 128]));
        let tensor = to_input_tensor(&img, &Device::Cpu).expect("tensor");
        let values = tensor
            .squeeze(0)
            .and_then(|t| t.to_vec3::<f32>())
            .expect("values");

        let red = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let green = (0.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
        let blue = (128.0 / 255.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2];

        assert!((values[0][100][100] - red).abs() < 1e-5);
        assert!((values[1][0][223] - green).abs() < 1e-5);
        assert!((values[2][223][0] - blue).abs() < 1e-5);
    }

    #[test]
    fn test_resize_is_deterministic() {
        let img = RgbImage::from_fn(31, 77, |x, y| Rgb([(x * 8) as u8, (y * 3) as u8, 7]));
        let a = to_input_tensor(&img, &Device::Cpu)
            .and_then(|t| t.flatten_all()?.to_vec1::<f32>())
            .expect("first");
        let b = to_input_tensor(&img, &Device::Cpu)
            .and_then(|t| t.flatten_all()?.to_vec1::<f32>())
            .expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(b"not an image at all").expect_err("garbage must fail");
        assert!(matches!(err, DetectError::DecodeFailure(_)));
    }

    #[test]
    fn test_decode_converts_to_rgb() {
        let gray = image::GrayImage::from_pixel(4, 3, image::Luma([200]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(gray)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode");

        let rgb = decode_image(&bytes).expect("decode");
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([200, 200, 200]));
    }
}
