//! Installation Flow Typestate Pattern
//!
//! Models the install pipeline as a series of explicit state transitions:
//! `ReleaseRequest` -> `ResolvedRelease` -> `FetchedRelease` -> `StagedBinary` -> `Installed`
//!
//! This enforces at compile-time that a binary cannot be staged before its
//! archive checksum has been verified, and cannot be published before it has
//! been staged.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tempfile::TempDir;

use crate::core::resolver::{ArtifactResolver, ResolvedArtifact};
use crate::io::download::DownloadRequest;
use crate::io::extract::{self, ExtractError, ExtractedFile};
use crate::ops::InstallError;
use crate::types::{Platform, Version};
use crate::ui::Reporter;

/// Step 1: An install that has been requested but not yet matched against
/// the release manifest.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub platform: Platform,
    pub version: Version,
}

/// Step 2: A release whose artifact URL and pinned checksum are known.
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    pub artifact: ResolvedArtifact,
}

/// Step 3: A release whose archive has been downloaded into a scratch
/// directory and verified against the pinned checksum.
#[derive(Debug)]
pub struct FetchedRelease {
    pub artifact: ResolvedArtifact,
    pub archive_path: PathBuf,
    pub scratch: TempDir,
}

/// Step 4: A release whose binary has been located inside the extracted
/// archive but not yet published to the destination.
#[derive(Debug)]
pub struct StagedBinary {
    pub artifact: ResolvedArtifact,
    pub staged_path: PathBuf,
    pub scratch: TempDir,
}

/// Terminal state: the binary is in place and answered the smoke test.
#[derive(Debug, Clone)]
pub struct Installed {
    pub path: PathBuf,
    pub version: Version,
    /// Stdout captured from `<bin> --version`.
    pub stdout: String,
}

impl ReleaseRequest {
    pub fn new(platform: Platform, version: Version) -> Self {
        Self { platform, version }
    }

    /// Matches the request against the manifest's artifact table.
    pub fn resolve(self, resolver: &ArtifactResolver) -> Result<ResolvedRelease, InstallError> {
        let artifact = resolver.resolve(self.platform, &self.version)?;
        Ok(ResolvedRelease { artifact })
    }
}

impl ResolvedRelease {
    /// Downloads the release archive into a fresh scratch directory under
    /// `scratch_root`, verifying the pinned checksum as the bytes stream in.
    pub fn fetch<R: Reporter>(
        self,
        client: &Client,
        scratch_root: &Path,
        reporter: &R,
    ) -> Result<FetchedRelease, InstallError> {
        fs::create_dir_all(scratch_root)?;
        let scratch = tempfile::Builder::new()
            .prefix("a8e-dist-")
            .tempdir_in(scratch_root)?;

        let archive_path = scratch
            .path()
            .join(crate::filename_from_url(&self.artifact.url));

        DownloadRequest::new(
            client,
            &self.artifact.name,
            &self.artifact.version,
            &self.artifact.url,
            &archive_path,
            &self.artifact.sha256,
            reporter,
        )
        .execute()?;

        Ok(FetchedRelease {
            artifact: self.artifact,
            archive_path,
            scratch,
        })
    }
}

impl FetchedRelease {
    /// Extracts the archive inside the scratch directory and locates the
    /// release binary by name.
    pub fn unpack(self) -> Result<StagedBinary, InstallError> {
        let extract_dir = self.scratch.path().join("extracted");
        fs::create_dir_all(&extract_dir)?;

        let files = extract::extract_auto(&self.archive_path, &extract_dir)?;
        let staged_path = locate_binary(&files, &self.artifact.bin)?
            .absolute_path
            .clone();

        Ok(StagedBinary {
            artifact: self.artifact,
            staged_path,
            scratch: self.scratch,
        })
    }
}

impl StagedBinary {
    /// Publishes the staged binary into `bin_dir` and smoke-tests it.
    ///
    /// The binary is copied to a sibling temp file inside `bin_dir` and then
    /// renamed over the final path, so readers never observe a half-written
    /// executable. If the installed binary fails the smoke test it is
    /// removed again.
    pub fn install_into(self, bin_dir: &Path) -> Result<Installed, InstallError> {
        fs::create_dir_all(bin_dir)?;
        let final_path = bin_dir.join(&self.artifact.bin);

        let mut temp = tempfile::Builder::new()
            .prefix(".a8e-dist-")
            .tempfile_in(bin_dir)?;
        io::copy(&mut File::open(&self.staged_path)?, temp.as_file_mut())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o755))?;
        }

        temp.persist(&final_path)
            .map_err(|e| InstallError::Io(e.error))?;

        let stdout = match smoke_test(&final_path, &self.artifact.version) {
            Ok(stdout) => stdout,
            Err(err) => {
                // Do not leave a binary in place that cannot report its
                // own version.
                fs::remove_file(&final_path).ok();
                return Err(err);
            }
        };

        Ok(Installed {
            path: final_path,
            version: self.artifact.version,
            stdout,
        })
    }
}

/// Runs `<bin> --version` and checks that it exits zero and mentions the
/// expected version. Returns the captured stdout.
pub fn smoke_test(bin: &Path, version: &Version) -> Result<String, InstallError> {
    let failed = |reason: String| InstallError::SmokeTestFailed {
        bin: bin.display().to_string(),
        reason,
    };

    let output = std::process::Command::new(bin)
        .arg("--version")
        .output()
        .map_err(|e| failed(format!("could not launch: {e}")))?;

    if !output.status.success() {
        return Err(failed(match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !stdout.contains(version.as_str()) {
        return Err(failed(format!(
            "reported \"{}\", expected version {version}",
            stdout.trim()
        )));
    }

    Ok(stdout)
}

/// Finds the release binary among the extracted files by exact filename.
/// When an archive nests the binary under a directory, the shallowest match
/// wins.
fn locate_binary<'a>(
    files: &'a [ExtractedFile],
    bin: &str,
) -> Result<&'a ExtractedFile, InstallError> {
    let mut candidates: Vec<&ExtractedFile> = files
        .iter()
        .filter(|f| {
            f.relative_path
                .file_name()
                .is_some_and(|name| name == bin)
        })
        .collect();

    candidates.sort_by_key(|f| f.relative_path.components().count());

    candidates.first().copied().ok_or_else(|| {
        InstallError::Extraction(ExtractError::Archive(format!(
            "archive does not contain a file named {bin}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(path: &str, is_executable: bool) -> ExtractedFile {
        ExtractedFile {
            relative_path: PathBuf::from(path),
            absolute_path: PathBuf::from("/scratch/extracted").join(path),
            is_executable,
        }
    }

    #[test]
    fn test_locate_binary_exact_match() {
        let files = vec![extracted("README.md", false), extracted("a8e", true)];
        let found = locate_binary(&files, "a8e").unwrap();
        assert_eq!(found.relative_path, Path::new("a8e"));
    }

    #[test]
    fn test_locate_binary_prefers_shallowest() {
        let files = vec![
            extracted("a8e-2.3.1/libexec/a8e", true),
            extracted("a8e-2.3.1/a8e", true),
        ];
        let found = locate_binary(&files, "a8e").unwrap();
        assert_eq!(found.relative_path, Path::new("a8e-2.3.1/a8e"));
    }

    #[test]
    fn test_locate_binary_missing() {
        let files = vec![extracted("README.md", false)];
        let err = locate_binary(&files, "a8e").unwrap_err();
        assert!(matches!(err, InstallError::Extraction(_)));
        assert!(err.to_string().contains("a8e"));
    }

    #[test]
    fn test_locate_binary_ignores_prefix_matches() {
        // `a8e.sig` must not satisfy a lookup for `a8e`.
        let files = vec![extracted("a8e.sig", false)];
        assert!(locate_binary(&files, "a8e").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_smoke_test_checks_version_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("a8e");
        fs::write(&bin, "#!/bin/sh\necho a8e 2.3.1\n").unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        let version: Version = "2.3.1".parse().unwrap();
        let stdout = smoke_test(&bin, &version).unwrap();
        assert!(stdout.contains("2.3.1"));

        let wrong: Version = "9.9.9".parse().unwrap();
        let err = smoke_test(&bin, &wrong).unwrap_err();
        assert!(matches!(err, InstallError::SmokeTestFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_smoke_test_nonzero_exit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("a8e");
        fs::write(&bin, "#!/bin/sh\nexit 3\n").unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        let version: Version = "2.3.1".parse().unwrap();
        let err = smoke_test(&bin, &version).unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }
}
