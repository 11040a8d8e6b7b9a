//! TOML release manifest parsing
//!
//! A release manifest declares one project's per-platform artifact table for
//! exactly one release: a URL template and a pinned sha256 per platform.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Platform, Sha256Digest, Version};

/// Digest value used by freshly generated manifest templates, before a real
/// release has been pinned.
pub const PLACEHOLDER_SHA256: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project identifier.
    pub name: String,
    /// The release this manifest pins digests for.
    pub version: Version,
    /// Binary filename inside every artifact, installed under that name.
    pub bin: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub license: String,
}

/// One platform's artifact: a URL template plus its pinned digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Download URL with a `{version}` placeholder.
    pub url: String,
    /// Expected sha256 of the artifact bytes.
    pub sha256: Sha256Digest,
}

impl ArtifactSpec {
    /// Whether the digest has been pinned to a real release (templates carry
    /// an all-zero placeholder until `manifest pin` fills them).
    pub fn is_pinned(&self) -> bool {
        self.sha256.as_str() != PLACEHOLDER_SHA256
    }
}

/// Complete release manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub project: ProjectInfo,
    pub artifact: HashMap<Platform, ArtifactSpec>,
}

impl ReleaseManifest {
    /// Parse a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// The release table for a8e, embedded at compile time.
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::from_str(include_str!("../../manifests/a8e.toml"))
    }

    /// Load a manifest from `path`, or fall back to the built-in one.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ManifestError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Get the artifact entry for a platform
    pub fn artifact_for(&self, platform: Platform) -> Option<&ArtifactSpec> {
        self.artifact.get(&platform)
    }

    /// Platforms this manifest covers, sorted for stable display.
    pub fn supported_platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.artifact.keys().copied().collect();
        platforms.sort_by_key(|p| p.to_string());
        platforms
    }

    /// Structural checks beyond what deserialization enforces.
    ///
    /// Platform keys and digest shapes are already validated by their types;
    /// this covers the cross-field rules: a non-empty project/bin name, at
    /// least one artifact, and a `{version}` placeholder in every URL so two
    /// releases can never share a resolved URL.
    fn validate(&self) -> Result<(), ManifestError> {
        if self.project.name.trim().is_empty() {
            return Err(ManifestError::Invalid(
                "project.name must not be empty".to_string(),
            ));
        }

        if self.project.bin.trim().is_empty() {
            return Err(ManifestError::Invalid(
                "project.bin must not be empty".to_string(),
            ));
        }

        if self.project.bin.contains('/') || self.project.bin.contains('\\') {
            return Err(ManifestError::Invalid(format!(
                "project.bin must be a bare filename, got '{}'",
                self.project.bin
            )));
        }

        if self.artifact.is_empty() {
            return Err(ManifestError::Invalid(
                "manifest declares no [artifact.<os>-<arch>] tables".to_string(),
            ));
        }

        for (platform, spec) in &self.artifact {
            if !spec.url.contains("{version}") {
                return Err(ManifestError::Invalid(format!(
                    "artifact.{platform}.url is missing the {{version}} placeholder: '{}'",
                    spec.url
                )));
            }
        }

        Ok(())
    }
}
