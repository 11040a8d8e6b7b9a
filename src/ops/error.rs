//! Domain-specific errors for install operations

use crate::core::resolver::UnsupportedPlatform;
use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;
use crate::types::Sha256Digest;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    #[error("Download failed: {0}")]
    Download(DownloadError),

    #[error("Timed out fetching release artifact")]
    Timeout,

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        expected: Sha256Digest,
        actual: Sha256Digest,
    },

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Smoke test failed for {bin}: {reason}")]
    SmokeTestFailed { bin: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// Whether retrying the same install may succeed.
    ///
    /// Transient network failures are retryable. A checksum mismatch is
    /// never retried automatically: a bad digest means the release is
    /// wrong or tampered with, and refetching the same bytes cannot fix
    /// that.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Download(_) | Self::Timeout)
    }
}

impl From<DownloadError> for InstallError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Timeout => Self::Timeout,
            DownloadError::HashMismatch { expected, actual } => {
                Self::ChecksumMismatch { expected, actual }
            }
            DownloadError::Io(err) => Self::Io(err),
            err => Self::Download(err),
        }
    }
}
