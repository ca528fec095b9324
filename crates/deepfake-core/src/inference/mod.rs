//! ML inference engine using Candle.
//!
//! Provides device selection, weight loading, input preprocessing and the
//! ResNet-50 real/fake classifier.

mod device;
mod loader;
pub mod preprocess;
mod resnet;
mod utils;

pub use device::{select_device, DevicePreference};
pub use loader::{load_pth, load_safetensors, load_weights, WeightsFormat};
pub use preprocess::{decode_image, to_input_tensor, INPUT_SIZE};
pub use resnet::{load_classifier, LoadedClassifier, ResNetClassifier, WeightsStatus};
pub use utils::softmax;
