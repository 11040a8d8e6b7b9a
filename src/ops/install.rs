//! Release installation driver.
//!
//! Walks an install request through the typestate pipeline:
//!
//! - Resolving the platform/version pair against the release manifest
//! - Downloading and verifying the artifact
//! - Extracting the archive and publishing the binary atomically
//! - Smoke-testing the installed binary
//!
//! The main entry point is [`install`]. Retryable failures (network errors,
//! timeouts) are retried here; a checksum mismatch always aborts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::core::resolver::{ArtifactResolver, ResolvedArtifact};
use crate::io::download::build_client;
use crate::ops::flow::{smoke_test, Installed, ReleaseRequest};
use crate::ops::InstallError;
use crate::types::{Platform, Version};
use crate::ui::Reporter;

/// How an install request should be carried out.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Directory the binary is published into.
    pub bin_dir: PathBuf,
    /// Release version to install.
    pub version: Version,
    /// Platform to resolve the artifact for.
    pub platform: Platform,
    /// Reinstall even when a healthy binary is already in place.
    pub force: bool,
    /// Resolve and report, but move no bytes.
    pub dry_run: bool,
    /// Extra fetch attempts after a retryable failure.
    pub retries: u32,
    /// Network timeout for the whole download.
    pub timeout: Duration,
}

/// What [`install`] ended up doing.
#[derive(Debug, Clone)]
pub enum InstallOutcome {
    /// Fresh binary published and smoke-tested.
    Installed(Installed),
    /// The destination already holds a binary answering with the requested
    /// version; nothing was touched.
    AlreadyInstalled(Installed),
    /// Dry run: resolution succeeded, nothing was downloaded.
    DryRun(ResolvedArtifact),
}

/// Resolves, downloads, verifies, and installs the release binary.
pub fn install<R: Reporter>(
    resolver: &ArtifactResolver,
    opts: &InstallOptions,
    reporter: &R,
) -> Result<InstallOutcome, InstallError> {
    info!(version = %opts.version, platform = %opts.platform, "installing release");

    let resolved = ReleaseRequest::new(opts.platform, opts.version.clone()).resolve(resolver)?;
    let name = resolved.artifact.name.clone();
    let version = resolved.artifact.version.clone();

    if opts.dry_run {
        return Ok(InstallOutcome::DryRun(resolved.artifact));
    }

    // Idempotence: an existing binary that already answers with the
    // requested version is left alone unless --force is given.
    let final_path = opts.bin_dir.join(&resolved.artifact.bin);
    if !opts.force && final_path.exists() {
        match smoke_test(&final_path, &version) {
            Ok(stdout) => {
                return Ok(InstallOutcome::AlreadyInstalled(Installed {
                    path: final_path,
                    version,
                    stdout,
                }));
            }
            Err(err) => {
                debug!(%err, "existing binary failed smoke test, reinstalling");
            }
        }
    }

    let client = build_client(opts.timeout)?;
    let scratch_root = crate::tmp_path();

    let mut attempt = 0;
    let fetched = loop {
        attempt += 1;
        match resolved.clone().fetch(&client, &scratch_root, reporter) {
            Ok(fetched) => break fetched,
            Err(err) if err.is_retryable() && attempt <= opts.retries => {
                reporter.warning(&format!(
                    "{err}, retrying ({attempt}/{})",
                    opts.retries
                ));
            }
            Err(err) => {
                reporter.failed(&name, &version, &err.to_string());
                return Err(err);
            }
        }
    };

    reporter.installing(&name, &version);
    let installed = fetched.unpack()?.install_into(&opts.bin_dir)?;
    reporter.done(&name, &version, "installed");

    perform_ux_checks(&opts.bin_dir, reporter);

    Ok(InstallOutcome::Installed(installed))
}

/// Warns when the destination directory is not on `$PATH`.
pub fn perform_ux_checks(bin_dir: &Path, reporter: &impl Reporter) {
    let path_env = std::env::var_os("PATH").unwrap_or_default();
    let is_in_path = std::env::split_paths(&path_env).any(|p| p == bin_dir);

    if !is_in_path {
        reporter.warning(&format!("{} is not in your PATH.", bin_dir.display()));
        reporter.info(&format!(
            "Add this to your shell profile: export PATH=\"{}:$PATH\"",
            bin_dir.display()
        ));
    }
}
