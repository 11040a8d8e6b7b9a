//! a8e-dist - release channel CLI for a8e

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "a8e-dist")]
#[command(author, version = env!("A8E_DIST_VERSION"))]
#[command(about = "Fetch, verify, and install official a8e release binaries")]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Release manifest to resolve against (defaults to the built-in one)
    #[arg(long, global = true, value_name = "PATH", env = "A8E_DIST_MANIFEST")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, verify, and install the a8e binary
    Install {
        /// Release version, e.g. 2.3.1 (defaults to the manifest's pinned version)
        #[arg(long)]
        version: Option<String>,
        /// Target platform, e.g. linux-x86_64 (defaults to the current one)
        #[arg(long)]
        platform: Option<String>,
        /// Directory to install the binary into
        #[arg(long, value_name = "DIR")]
        bin_dir: Option<PathBuf>,
        /// Reinstall even if the requested version is already in place
        #[arg(long)]
        force: bool,
        /// Resolve and report without downloading anything
        #[arg(long)]
        dry_run: bool,
        /// Network timeout for the whole download, in seconds
        #[arg(long, default_value_t = a8e_dist::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
        /// Extra fetch attempts after a retryable failure
        #[arg(long, default_value_t = a8e_dist::DEFAULT_RETRIES)]
        retries: u32,
    },
    /// Print the artifact URL and checksum for a platform/version pair
    Resolve {
        /// Release version (defaults to the manifest's pinned version)
        #[arg(long)]
        version: Option<String>,
        /// Target platform, e.g. macos-arm64 (defaults to the current one)
        #[arg(long)]
        platform: Option<String>,
    },
    /// List the platforms the manifest carries artifacts for
    Platforms,
    /// Release manifest authoring commands
    Manifest {
        #[command(subcommand)]
        command: ManifestCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ManifestCommands {
    /// Create a new manifest template
    New {
        /// Project name
        name: String,
        /// Directory to save the manifest in
        #[arg(long, default_value = "manifests")]
        output_dir: PathBuf,
    },
    /// Validate a manifest file
    Check {
        /// Manifest file to check
        path: PathBuf,
    },
    /// Download an artifact and pin its checksum into the manifest
    Pin {
        /// Manifest file to update
        path: PathBuf,
        /// Platform entry to pin, e.g. linux-arm64
        #[arg(long)]
        platform: String,
        /// Release version to pin (defaults to the manifest's version)
        #[arg(long)]
        version: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let quiet = cli.quiet;
    let manifest_path = cli.manifest.clone();

    match cli.command {
        Commands::Install {
            version,
            platform,
            bin_dir,
            force,
            dry_run,
            timeout,
            retries,
        } => cmd::install::install(cmd::install::InstallArgs {
            manifest_path,
            quiet,
            version,
            platform,
            bin_dir,
            force,
            dry_run,
            timeout,
            retries,
        }),
        Commands::Resolve { version, platform } => {
            cmd::resolve::resolve(manifest_path.as_deref(), version.as_deref(), platform.as_deref())
        }
        Commands::Platforms => cmd::platforms::platforms(manifest_path.as_deref()),
        Commands::Manifest { command } => match command {
            ManifestCommands::New { name, output_dir } => {
                cmd::manifest::new(&name, &output_dir, quiet)
            }
            ManifestCommands::Check { path } => cmd::manifest::check(&path, quiet),
            ManifestCommands::Pin {
                path,
                platform,
                version,
            } => cmd::manifest::pin(&path, &platform, version.as_deref(), quiet),
        },
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
