//! Weights file locating and verification adapter.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default weights filename, looked up relative to the working directory.
pub const DEFAULT_WEIGHTS_FILE: &str = "best_model.pth";

/// Returns the shared weights directory.
///
/// Uses `XDG_DATA_HOME/deepfake-detect/models` or `~/.local/share/deepfake-detect/models`.
#[must_use]
pub fn weights_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deepfake-detect")
        .join("models")
}

/// Resolves which weights file to load.
///
/// An explicit path is returned as-is. Otherwise `best_model.pth` in the
/// working directory wins, then the same filename in [`weights_dir`]. When
/// neither exists the working-directory path is returned so the loader can
/// report it as missing.
#[must_use]
pub fn resolve_weights_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(DEFAULT_WEIGHTS_FILE);
    if local.exists() {
        return local;
    }

    let shared = weights_dir().join(DEFAULT_WEIGHTS_FILE);
    if shared.exists() {
        debug!("Using shared weights at {}", shared.display());
        return shared;
    }

    local
}

/// Computes the lowercase hex SHA-256 of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verifies a weights file against an expected SHA-256.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the digest differs.
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        anyhow::bail!(
            "Checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        );
    }

    info!("Verified checksum of {}", path.display());
    Ok(())
}

/// Returns true if `s` looks like a hex SHA-256 digest.
#[must_use]
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Presence and fingerprint of a weights file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightsInfo {
    /// Path that was inspected.
    pub path: PathBuf,
    /// Size in bytes and SHA-256, if the file exists.
    pub fingerprint: Option<(u64, String)>,
}

/// Inspects a weights file without loading it.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn inspect(path: &Path) -> Result<WeightsInfo> {
    if !path.exists() {
        return Ok(WeightsInfo {
            path: path.to_path_buf(),
            fingerprint: None,
        });
    }

    let size = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    let digest = sha256_file(path)?;

    Ok(WeightsInfo {
        path: path.to_path_buf(),
        fingerprint: Some((size, digest)),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    // SHA-256 of "abc"
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn abc_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"abc").expect("write");
        file
    }

    #[test]
    fn test_weights_dir() {
        let dir = weights_dir();
        assert!(dir.ends_with("deepfake-detect/models"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_weights_path(Some(Path::new("/opt/weights/custom.safetensors")));
        assert_eq!(path, PathBuf::from("/opt/weights/custom.safetensors"));
    }

    #[test]
    fn test_default_path_uses_default_filename() {
        let path = resolve_weights_path(None);
        assert!(path.ends_with(DEFAULT_WEIGHTS_FILE));
    }

    #[test]
    fn test_sha256_file() {
        let file = abc_file();
        assert_eq!(sha256_file(file.path()).expect("hash"), ABC_SHA256);
    }

    #[test]
    fn test_verify_checksum() {
        let file = abc_file();
        assert!(verify_checksum(file.path(), ABC_SHA256).is_ok());
        assert!(verify_checksum(file.path(), &ABC_SHA256.to_uppercase()).is_ok());

        let err = verify_checksum(file.path(), &"0".repeat(64)).expect_err("mismatch");
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(ABC_SHA256));
        assert!(!is_sha256_hex("abc"));
        assert!(!is_sha256_hex(&"g".repeat(64)));
    }

    #[test]
    fn test_inspect() {
        let file = abc_file();
        let info = inspect(file.path()).expect("inspect");
        assert_eq!(info.fingerprint, Some((3, ABC_SHA256.to_string())));

        let missing = inspect(Path::new("/nonexistent/best_model.pth")).expect("inspect");
        assert!(missing.fingerprint.is_none());
    }
}
