//! Manifest authoring commands

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use a8e_dist::core::manifest::{ReleaseManifest, PLACEHOLDER_SHA256};
use a8e_dist::io::{build_client, fetch_digest};
use a8e_dist::types::Platform;
use a8e_dist::ui::{ConsoleReporter, Reporter};
use a8e_dist::DEFAULT_TIMEOUT_SECS;

/// Create a new manifest template
pub fn new(name: &str, output_dir: &Path, quiet: bool) -> Result<()> {
    let filename = format!("{name}.toml");
    let path = output_dir.join(&filename);

    if path.exists() {
        anyhow::bail!("Manifest already exists: {}", path.display());
    }

    let template = format!(
        r#"[project]
name = "{name}"
version = "0.1.0"
bin = "{name}"
description = ""
homepage = ""
license = ""

[artifact.macos-arm64]
url = "https://github.com/OWNER/{name}/releases/download/v{{version}}/{name}-aarch64-apple-darwin.tar.bz2"
sha256 = "{placeholder}"

[artifact.macos-x86_64]
url = "https://github.com/OWNER/{name}/releases/download/v{{version}}/{name}-x86_64-apple-darwin.tar.bz2"
sha256 = "{placeholder}"

[artifact.linux-arm64]
url = "https://github.com/OWNER/{name}/releases/download/v{{version}}/{name}-aarch64-unknown-linux-gnu.tar.bz2"
sha256 = "{placeholder}"

[artifact.linux-x86_64]
url = "https://github.com/OWNER/{name}/releases/download/v{{version}}/{name}-x86_64-unknown-linux-gnu.tar.bz2"
sha256 = "{placeholder}"
"#,
        placeholder = PLACEHOLDER_SHA256
    );

    let reporter = ConsoleReporter::new(quiet);
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&path, template)?;

    reporter.success(&format!("Created manifest template: {}", path.display()));
    reporter.info(&format!(
        "Edit it and run 'a8e-dist manifest check {}' to validate.",
        path.display()
    ));

    Ok(())
}

/// Validate a manifest file
pub fn check(path: &Path, quiet: bool) -> Result<()> {
    let manifest = ReleaseManifest::from_file(path).context("Failed to parse manifest")?;

    let reporter = ConsoleReporter::new(quiet);
    reporter.success("Manifest is valid");
    println!("  Name: {}", manifest.project.name);
    println!("  Version: {}", manifest.project.version);
    println!("  Binary: {}", manifest.project.bin);

    for platform in manifest.supported_platforms() {
        let Some(spec) = manifest.artifact_for(platform) else {
            continue;
        };
        let status = if spec.is_pinned() {
            "pinned"
        } else {
            "PLACEHOLDER"
        };
        println!("  {platform}: {status}");
    }

    match Platform::current() {
        Some(current) if manifest.artifact_for(current).is_none() => {
            reporter.warning(&format!("No artifact for the current platform ({current})"));
        }
        None => reporter.warning("The current host platform is not a release target"),
        _ => {}
    }

    Ok(())
}

/// Download an artifact and pin its checksum into the manifest
pub fn pin(path: &Path, platform: &str, version: Option<&str>, quiet: bool) -> Result<()> {
    let reporter = ConsoleReporter::new(quiet);

    let mut manifest = ReleaseManifest::from_file(path).context("Failed to parse manifest")?;
    let platform: Platform = platform.parse().map_err(anyhow::Error::msg)?;
    let version = match version {
        Some(s) => s.parse().map_err(anyhow::Error::msg)?,
        None => manifest.project.version.clone(),
    };

    let url_template = manifest
        .artifact_for(platform)
        .with_context(|| format!("Manifest has no artifact entry for {platform}"))?
        .url
        .clone();
    let url = url_template.replace("{version}", version.as_str());

    reporter.info(&format!("Downloading {url} to compute checksum..."));
    let client = build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
    let digest = fetch_digest(&client, &url)
        .with_context(|| format!("Failed to download artifact for {platform}"))?;
    reporter.success(&format!("Computed sha256: {digest}"));

    manifest.project.version = version;
    if let Some(spec) = manifest.artifact.get_mut(&platform) {
        spec.sha256 = digest;
    }

    let updated = manifest.to_toml()?;
    std::fs::write(path, updated)?;
    reporter.success(&format!("Successfully updated {}", path.display()));

    Ok(())
}
