//! a8e-dist - release distribution tooling for a8e
//!
//! Articulate (a8e) ships prebuilt binaries per platform. This crate resolves
//! the right release artifact for a platform/version pair from a pinned
//! manifest, downloads it with checksum verification, and publishes the
//! binary atomically into a bin directory.
//!
//! # Architecture
//!
//! - **Typestate Pattern**: The install flow uses `ReleaseRequest` →
//!   `ResolvedRelease` → `FetchedRelease` → `StagedBinary` → `Installed`
//!   to enforce correct ordering at compile time.
//! - **Newtypes**: `Platform`, `Version`, and `Sha256Digest` provide
//!   type-safe identifiers.
//! - **Reporter injection**: terminal rendering stays out of the pipeline,
//!   so the whole flow runs under test against a mock HTTP server.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.a8e/
//! ├── bin/   # Installed binaries
//! └── tmp/   # Download scratch space (same volume as bin/)
//! ```

pub mod core;
pub mod io;
pub mod ops;
pub mod types;
pub mod ui;

// Re-exports for convenience
pub use self::core::manifest::ReleaseManifest;
pub use self::core::resolver::{ArtifactResolver, ResolvedArtifact};
pub use self::ops::{install, InstallError, InstallOptions, InstallOutcome};
pub use self::types::{Arch, Os, Platform, Sha256Digest, Version};

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the a8e home directory, or None if the user's home cannot be
/// resolved.
pub fn try_dist_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("A8E_DIST_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".a8e"))
}

/// Returns the canonical a8e home directory (`~/.a8e`).
///
/// # Panics
/// Panics if the home directory cannot be determined.
pub fn dist_home() -> PathBuf {
    try_dist_home().expect("Could not determine home directory")
}

/// Binary installation target: ~/.a8e/bin
pub fn bin_path() -> PathBuf {
    dist_home().join("bin")
}

/// Temp path: ~/.a8e/tmp (guaranteed same volume as bin)
pub fn tmp_path() -> PathBuf {
    dist_home().join("tmp")
}

/// Extract the filename from a URL.
///
/// # Example
///
/// ```
/// use a8e_dist::filename_from_url;
///
/// assert_eq!(
///     filename_from_url("https://example.com/v2.3.1/a8e-x86_64-unknown-linux-gnu.tar.bz2"),
///     "a8e-x86_64-unknown-linux-gnu.tar.bz2"
/// );
/// assert_eq!(filename_from_url(""), "");
/// ```
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}

/// Default network timeout for a whole artifact download, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of extra fetch attempts after a retryable failure.
pub const DEFAULT_RETRIES: u32 = 2;

/// User Agent string
pub const USER_AGENT: &str = concat!("a8e-dist/", env!("CARGO_PKG_VERSION"));
