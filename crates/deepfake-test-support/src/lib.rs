//! Test support utilities for deepfake-detect.
//!
//! Provides stub classifiers, synthetic images and multipart request bodies
//! for exercising the detection pipeline and HTTP API without real weights.
//!
//! # Example
//!
//! ```
//! use deepfake_test_support::{FixedLogitsClassifier, SyntheticImageBuilder};
//!
//! let classifier = FixedLogitsClassifier::fake();
//! let upload = SyntheticImageBuilder::sample_png();
//! let prediction = deepfake_core::detect(&classifier, &upload);
//! assert!(prediction.is_ok());
//! ```

mod builders;
mod mocks;
pub mod multipart;

pub use builders::SyntheticImageBuilder;
pub use mocks::{FailingClassifier, FixedLogitsClassifier, RecordingClassifier};
pub use multipart::MultipartBody;
