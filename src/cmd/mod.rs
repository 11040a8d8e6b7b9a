//! Command modules - one file per CLI command

pub mod completions;
pub mod install;
pub mod manifest;
pub mod platforms;
pub mod resolve;

use anyhow::{Context, Result};

use a8e_dist::core::resolver::ArtifactResolver;
use a8e_dist::types::{Platform, Version};

/// Parse a `--platform` argument, defaulting to the host platform.
pub(crate) fn parse_platform(arg: Option<&str>) -> Result<Platform> {
    match arg {
        Some(s) => s.parse().map_err(anyhow::Error::msg),
        None => Platform::current()
            .context("This host platform has no prebuilt a8e releases; pass --platform explicitly"),
    }
}

/// Parse a `--version` argument, defaulting to the manifest's pinned version.
pub(crate) fn parse_version(arg: Option<&str>, resolver: &ArtifactResolver) -> Result<Version> {
    match arg {
        Some(s) => s.parse().map_err(anyhow::Error::msg),
        None => Ok(resolver.pinned_version().clone()),
    }
}
