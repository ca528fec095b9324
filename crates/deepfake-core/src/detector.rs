//! Detection pipeline: bytes in, prediction out.
//!
//! Independent of any transport so the HTTP handler and the CLI share it.

use candle_core::{DType, Tensor};
use tracing::debug;

use crate::domain::{DetectError, Prediction, NUM_CLASSES};
use crate::inference::{decode_image, softmax, to_input_tensor};
use crate::ports::Classifier;

/// Prefix every accepted content type must start with.
const IMAGE_MIME_PREFIX: &str = "image/";

/// Checks the client-declared content type of an upload.
///
/// Only the declared value is inspected; the bytes are not sniffed.
///
/// # Errors
///
/// Returns [`DetectError::InvalidContentType`] if the type is absent or does
/// not start with `image/`.
pub fn validate_content_type(declared: Option<&str>) -> Result<(), DetectError> {
    match declared {
        Some(ct) if ct.starts_with(IMAGE_MIME_PREFIX) => Ok(()),
        other => Err(DetectError::InvalidContentType {
            declared: other.unwrap_or("<none>").to_string(),
        }),
    }
}

/// Decodes, normalizes and classifies an encoded image.
///
/// # Errors
///
/// Returns [`DetectError::DecodeFailure`] for undecodable bytes and
/// [`DetectError::InferenceFailure`] if tensor conversion or the forward pass fails.
pub fn detect(classifier: &dyn Classifier, bytes: &[u8]) -> Result<Prediction, DetectError> {
    let image = decode_image(bytes)?;
    debug!(
        width = image.width(),
        height = image.height(),
        "Decoded upload"
    );

    let input = to_input_tensor(&image, classifier.device())
        .map_err(|e| DetectError::InferenceFailure(e.to_string()))?;

    classify(classifier, &input)
}

/// Runs an already preprocessed input through the classifier.
///
/// # Errors
///
/// Returns [`DetectError::InferenceFailure`] if the forward pass fails or
/// produces anything other than two finite scores.
pub fn classify(classifier: &dyn Classifier, input: &Tensor) -> Result<Prediction, DetectError> {
    let logits = classifier
        .logits(input)
        .map_err(|e| DetectError::InferenceFailure(format!("{e:#}")))?;

    let scores = logits_to_scores(&logits)?;
    let probs = softmax(&scores);
    let prediction = Prediction::from_probabilities([probs[0], probs[1]]);

    debug!(
        classifier = classifier.name(),
        label = %prediction.label,
        confidence = prediction.confidence,
        "Classified image"
    );
    Ok(prediction)
}

/// Extracts the two scores from a `(1, 2)` logits tensor.
fn logits_to_scores(logits: &Tensor) -> Result<[f32; NUM_CLASSES], DetectError> {
    if logits.dims() != [1, NUM_CLASSES] {
        return Err(DetectError::InferenceFailure(format!(
            "expected logits of shape [1, {NUM_CLASSES}], got {:?}",
            logits.dims()
        )));
    }

    let values = logits
        .to_dtype(DType::F32)
        .and_then(|t| t.flatten_all())
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(|e| DetectError::InferenceFailure(e.to_string()))?;

    if values.iter().any(|v| !v.is_finite()) {
        return Err(DetectError::InferenceFailure(format!(
            "non-finite logits: {values:?}"
        )));
    }

    Ok([values[0], values[1]])
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::Label;
    use candle_core::Device;

    struct Fixed([f32; 2], Device);

    impl Fixed {
        const fn new(logits: [f32; 2]) -> Self {
            Self(logits, Device::Cpu)
        }
    }

    impl Classifier for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn device(&self) -> &Device {
            &self.1
        }

        fn logits(&self, _input: &Tensor) -> anyhow::Result<Tensor> {
            Ok(Tensor::new(&[self.0], &self.1)?)
        }
    }

    struct WrongShape(Device);

    impl Classifier for WrongShape {
        fn name(&self) -> &'static str {
            "wrong-shape"
        }

        fn device(&self) -> &Device {
            &self.0
        }

        fn logits(&self, _input: &Tensor) -> anyhow::Result<Tensor> {
            Ok(Tensor::new(&[0.1f32, 0.2, 0.7], &Device::Cpu)?)
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(10, 6, image::Rgb([1, 2, 3]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode");
        bytes
    }

    #[test]
    fn test_content_type_prefix() {
        assert!(validate_content_type(Some("image/png")).is_ok());
        assert!(validate_content_type(Some("image/x-anything")).is_ok());
        assert!(validate_content_type(Some("text/plain")).is_err());
        assert!(validate_content_type(Some("IMAGE/PNG")).is_err());
        assert!(validate_content_type(None).is_err());
    }

    #[test]
    fn test_index_one_maps_to_fake() {
        let p = detect(&Fixed::new([-1.0, 3.0]), &png_bytes()).expect("prediction");
        assert_eq!(p.label, Label::Fake);
        assert!(p.confidence > 50.0 && p.confidence <= 100.0);
    }

    #[test]
    fn test_index_zero_maps_to_real() {
        let p = detect(&Fixed::new([4.0, 0.0]), &png_bytes()).expect("prediction");
        assert_eq!(p.label, Label::Real);
        let sum: f32 = p.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_failure_surfaces() {
        let err = detect(&Fixed::new([0.0, 0.0]), b"\x89PNG\r\n\x1a\ngarbage").expect_err("corrupt");
        assert!(matches!(err, DetectError::DecodeFailure(_)));
    }

    #[test]
    fn test_wrong_logits_shape_is_inference_failure() {
        let err = detect(&WrongShape(Device::Cpu), &png_bytes()).expect_err("bad shape");
        assert!(matches!(err, DetectError::InferenceFailure(_)));
    }

    #[test]
    fn test_non_finite_logits_rejected() {
        let err = detect(&Fixed::new([f32::NAN, 0.0]), &png_bytes()).expect_err("nan");
        assert!(matches!(err, DetectError::InferenceFailure(_)));
    }
}
