//! Weight loading for safetensors and `PyTorch` state dicts.

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// On-disk encoding of a weights file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightsFormat {
    /// `.safetensors`
    Safetensors,
    /// `.pth`, `.pt` or `.bin` pickled `PyTorch` state dict.
    Pth,
}

impl WeightsFormat {
    /// Detects the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is missing or not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "safetensors" => Ok(Self::Safetensors),
            "pth" | "pt" | "bin" => Ok(Self::Pth),
            _ => anyhow::bail!(
                "Unsupported weights format for {}: expected .safetensors, .pth, .pt or .bin",
                path.display()
            ),
        }
    }
}

/// Opens a weights file and creates a `VarBuilder` over its tensors.
///
/// # Errors
///
/// Returns an error if the format is unsupported or the file cannot be parsed.
pub fn load_weights(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    match WeightsFormat::from_path(path)? {
        WeightsFormat::Safetensors => load_safetensors(path, device),
        WeightsFormat::Pth => load_pth(path, device),
    }
}

/// Loads a pickled `PyTorch` state dict.
///
/// # Errors
///
/// Returns an error if the file cannot be read or unpickled.
pub fn load_pth(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading state dict from {}", path.display());

    VarBuilder::from_pth(path, DType::F32, device)
        .with_context(|| format!("Failed to parse state dict: {}", path.display()))
}

/// Loads a safetensors file onto `device`.
///
/// Every tensor is materialized eagerly so the file is read exactly once.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid safetensors, or
/// holds a dtype candle cannot represent.
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading safetensors from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read weights file: {}", path.display()))?;
    let archive = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))?;

    let tensors = archive
        .tensors()
        .into_iter()
        .map(|(name, view)| {
            let tensor = Tensor::from_raw_buffer(
                view.data(),
                candle_dtype(view.dtype())?,
                view.shape(),
                device,
            )
            .with_context(|| format!("Failed to create tensor '{name}'"))?;
            Ok::<_, anyhow::Error>((name, tensor))
        })
        .collect::<Result<HashMap<String, Tensor>>>()?;

    debug!(count = tensors.len(), "Loaded tensors");
    Ok(VarBuilder::from_tensors(tensors, DType::F32, device))
}

/// Maps a safetensors dtype onto the candle dtype with the same layout.
fn candle_dtype(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype;

    Ok(match dtype {
        Dtype::U8 => DType::U8,
        Dtype::U32 => DType::U32,
        Dtype::I64 => DType::I64,
        Dtype::BF16 => DType::BF16,
        Dtype::F16 => DType::F16,
        Dtype::F32 => DType::F32,
        Dtype::F64 => DType::F64,
        other => anyhow::bail!("Tensor dtype {other:?} has no candle equivalent"),
    })
}
