//! Platform-to-artifact resolution.
//!
//! Pure lookup over a release manifest: (platform, version) in, the unique
//! (URL, digest) pair out. All network and filesystem effects live in the
//! layers above.

use thiserror::Error;

use crate::core::manifest::ReleaseManifest;
use crate::types::{Platform, Sha256Digest, Version};

/// The platform has no entry in the release table.
#[derive(Error, Debug, Clone)]
#[error("No release artifact for {platform} (supported: {})", format_platforms(.supported))]
pub struct UnsupportedPlatform {
    /// The platform that was requested.
    pub platform: Platform,
    /// Every platform the manifest does cover.
    pub supported: Vec<Platform>,
}

fn format_platforms(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A fully resolved artifact: the concrete URL and expected digest for one
/// (platform, version) pair, plus what to install from it.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    /// Project identifier, for display.
    pub name: String,
    /// Platform the artifact was resolved for.
    pub platform: Platform,
    /// Release version substituted into the URL.
    pub version: Version,
    /// Concrete download URL.
    pub url: String,
    /// Pinned sha256 for the artifact bytes.
    pub sha256: Sha256Digest,
    /// Binary filename to pull out of the archive.
    pub bin: String,
}

/// Maps (platform, version) onto the manifest's artifact table.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    manifest: ReleaseManifest,
}

impl ArtifactResolver {
    /// Build a resolver over a parsed release manifest.
    pub fn new(manifest: ReleaseManifest) -> Self {
        Self { manifest }
    }

    /// The manifest this resolver reads from.
    pub fn manifest(&self) -> &ReleaseManifest {
        &self.manifest
    }

    /// The version this manifest pins digests for, used as the default when
    /// the caller does not request one explicitly.
    pub fn pinned_version(&self) -> &Version {
        &self.manifest.project.version
    }

    /// Platforms the release table covers, sorted for stable display.
    pub fn supported_platforms(&self) -> Vec<Platform> {
        self.manifest.supported_platforms()
    }

    /// Resolve the unique artifact for a (platform, version) pair.
    ///
    /// Substitutes `version` into the entry's URL template. Fails only when
    /// the platform has no entry; no side effects.
    pub fn resolve(
        &self,
        platform: Platform,
        version: &Version,
    ) -> Result<ResolvedArtifact, UnsupportedPlatform> {
        let spec = self
            .manifest
            .artifact_for(platform)
            .ok_or_else(|| UnsupportedPlatform {
                platform,
                supported: self.supported_platforms(),
            })?;

        Ok(ResolvedArtifact {
            name: self.manifest.project.name.clone(),
            platform,
            version: version.clone(),
            url: spec.url.replace("{version}", version.as_str()),
            sha256: spec.sha256.clone(),
            bin: self.manifest.project.bin.clone(),
        })
    }
}
