//! Platforms command

use std::path::Path;

use anyhow::{Context, Result};

use a8e_dist::core::manifest::ReleaseManifest;
use a8e_dist::types::Platform;

/// List the platforms the manifest carries artifacts for
pub fn platforms(manifest_path: Option<&Path>) -> Result<()> {
    let manifest = ReleaseManifest::load_or_builtin(manifest_path)
        .context("Failed to load release manifest")?;

    let current = Platform::current();
    for platform in manifest.supported_platforms() {
        if Some(platform) == current {
            println!("{platform} (current)");
        } else {
            println!("{platform}");
        }
    }

    Ok(())
}
