//! Resolve command

use std::path::Path;

use anyhow::{Context, Result};

use a8e_dist::core::manifest::ReleaseManifest;
use a8e_dist::core::resolver::ArtifactResolver;

/// Print the artifact URL and checksum for a platform/version pair
pub fn resolve(
    manifest_path: Option<&Path>,
    version: Option<&str>,
    platform: Option<&str>,
) -> Result<()> {
    let manifest = ReleaseManifest::load_or_builtin(manifest_path)
        .context("Failed to load release manifest")?;
    let resolver = ArtifactResolver::new(manifest);

    let platform = super::parse_platform(platform)?;
    let version = super::parse_version(version, &resolver)?;
    let artifact = resolver.resolve(platform, &version)?;

    println!("{} {} ({})", artifact.name, artifact.version, artifact.platform);
    println!("  url: {}", artifact.url);
    println!("  sha256: {}", artifact.sha256);

    Ok(())
}
