//! Install command

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use a8e_dist::core::manifest::ReleaseManifest;
use a8e_dist::core::resolver::ArtifactResolver;
use a8e_dist::ops::{self, InstallOptions, InstallOutcome};
use a8e_dist::ui::{ConsoleReporter, Reporter};

/// Everything the install command needs from the CLI.
pub struct InstallArgs {
    pub manifest_path: Option<PathBuf>,
    pub quiet: bool,
    pub version: Option<String>,
    pub platform: Option<String>,
    pub bin_dir: Option<PathBuf>,
    pub force: bool,
    pub dry_run: bool,
    pub timeout: u64,
    pub retries: u32,
}

/// Download, verify, and install the a8e binary.
pub fn install(args: InstallArgs) -> Result<()> {
    let manifest = ReleaseManifest::load_or_builtin(args.manifest_path.as_deref())
        .context("Failed to load release manifest")?;
    let resolver = ArtifactResolver::new(manifest);

    let platform = super::parse_platform(args.platform.as_deref())?;
    let version = super::parse_version(args.version.as_deref(), &resolver)?;
    let bin_dir = args.bin_dir.unwrap_or_else(a8e_dist::bin_path);

    let reporter = ConsoleReporter::new(args.quiet);

    let opts = InstallOptions {
        bin_dir,
        version,
        platform,
        force: args.force,
        dry_run: args.dry_run,
        retries: args.retries,
        timeout: Duration::from_secs(args.timeout),
    };

    match ops::install(&resolver, &opts, &reporter)? {
        InstallOutcome::Installed(installed) => {
            reporter.success(&format!(
                "{} installed to {}",
                installed.stdout.trim(),
                installed.path.display()
            ));
        }
        InstallOutcome::AlreadyInstalled(installed) => {
            reporter.success(&format!(
                "{} already installed at {}",
                installed.stdout.trim(),
                installed.path.display()
            ));
            reporter.info("Pass --force to reinstall.");
        }
        InstallOutcome::DryRun(artifact) => {
            println!("Would download {}", artifact.url);
            println!("  sha256: {}", artifact.sha256);
            println!(
                "Would install {} into {}",
                artifact.bin,
                opts.bin_dir.display()
            );
        }
    }

    Ok(())
}
