//! Archive extraction module
//!
//! Handles tar.bz2 (the release format), tar.gz, plain tar, and zip.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

/// Recognized archive container formats, detected from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarBz2,
    TarGz,
    Tar,
    Zip,
}

impl ArchiveFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TarBz2 => "tar.bz2",
            Self::TarGz => "tar.gz",
            Self::Tar => "tar",
            Self::Zip => "zip",
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Information about an extracted file
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Path relative to extraction root
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Whether this is an executable
    pub is_executable: bool,
}

/// Detect archive format from file extension
pub fn detect_format(path: &Path) -> Option<ArchiveFormat> {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".tar.bz2") || path_str.ends_with(".tbz2") {
        Some(ArchiveFormat::TarBz2)
    } else if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
        Some(ArchiveFormat::TarGz)
    } else if path_str.ends_with(".tar") {
        Some(ArchiveFormat::Tar)
    } else if path_str.ends_with(".zip") {
        Some(ArchiveFormat::Zip)
    } else {
        None
    }
}

/// Extract an archive, auto-detecting format from the filename
pub fn extract_auto(
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<ExtractedFile>, ExtractError> {
    let format = detect_format(archive_path).ok_or_else(|| {
        ExtractError::UnsupportedFormat(
            archive_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| archive_path.display().to_string()),
        )
    })?;

    match format {
        ArchiveFormat::TarBz2 => extract_tar_bz2(archive_path, dest_dir),
        ArchiveFormat::TarGz => extract_tar_gz(archive_path, dest_dir),
        ArchiveFormat::Tar => {
            let file = File::open(archive_path)?;
            extract_tar(BufReader::new(file), dest_dir)
        }
        ArchiveFormat::Zip => extract_zip(archive_path, dest_dir),
    }
}

/// Extract a tar.bz2 archive to a destination directory
pub fn extract_tar_bz2(
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<ExtractedFile>, ExtractError> {
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let bz_decoder = bzip2::read::BzDecoder::new(reader);

    extract_tar(bz_decoder, dest_dir)
}

/// Extract a tar.gz archive to a destination directory
pub fn extract_tar_gz(
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<ExtractedFile>, ExtractError> {
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let gz_decoder = flate2::read::GzDecoder::new(reader);

    extract_tar(gz_decoder, dest_dir)
}

/// Extract a tar archive from a reader
fn extract_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<Vec<ExtractedFile>, ExtractError> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = tar::Archive::new(reader);
    let mut extracted_files = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?;

        // Skip directories
        if entry.header().entry_type().is_dir() {
            continue;
        }

        let relative_path: PathBuf = entry_path.components().collect();
        let absolute_path = dest_dir.join(&relative_path);

        // Sanitize path to prevent entries escaping the extraction root
        if !absolute_path.starts_with(dest_dir) {
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {}",
                relative_path.display()
            )));
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        entry.unpack(&absolute_path)?;

        // Check if executable (Unix mode has execute bit)
        let is_executable = entry
            .header()
            .mode()
            .map(|m| m & 0o111 != 0)
            .unwrap_or(false);

        extracted_files.push(ExtractedFile {
            relative_path,
            absolute_path,
            is_executable,
        });
    }

    Ok(extracted_files)
}

/// Extract a zip archive
pub fn extract_zip(
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<Vec<ExtractedFile>, ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::Archive(e.to_string()))?;

    fs::create_dir_all(dest_dir)?;
    let mut extracted_files = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ExtractError::Archive(e.to_string()))?;

        // enclosed_name rejects traversal-prone entry names
        let Some(relative_path) = file.enclosed_name() else {
            continue;
        };

        if file.is_dir() {
            fs::create_dir_all(dest_dir.join(&relative_path))?;
            continue;
        }

        let absolute_path = dest_dir.join(&relative_path);
        if let Some(p) = absolute_path.parent() {
            fs::create_dir_all(p)?;
        }

        let mut outfile = File::create(&absolute_path)?;
        io::copy(&mut file, &mut outfile)?;

        #[cfg(unix)]
        let is_executable = if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&absolute_path, fs::Permissions::from_mode(mode))?;
            mode & 0o111 != 0
        } else {
            false
        };
        #[cfg(not(unix))]
        let is_executable = false;

        extracted_files.push(ExtractedFile {
            relative_path,
            absolute_path,
            is_executable,
        });
    }

    Ok(extracted_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn build_tar(entries: &[(&str, &[u8], u32)]) -> Vec<u8> {
        let mut tar_bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut tar_bytes);
            for (path, data, mode) in entries {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(*mode);
                header.set_cksum();
                builder.append_data(&mut header, path, *data).unwrap();
            }
            builder.finish().unwrap();
        }
        tar_bytes
    }

    fn bzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder =
            bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("a8e-x86_64-unknown-linux-gnu.tar.bz2")),
            Some(ArchiveFormat::TarBz2)
        );
        assert_eq!(
            detect_format(Path::new("foo.tbz2")),
            Some(ArchiveFormat::TarBz2)
        );
        assert_eq!(
            detect_format(Path::new("foo.tar.gz")),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(detect_format(Path::new("foo.tgz")), Some(ArchiveFormat::TarGz));
        assert_eq!(detect_format(Path::new("foo.tar")), Some(ArchiveFormat::Tar));
        assert_eq!(detect_format(Path::new("foo.zip")), Some(ArchiveFormat::Zip));
        assert_eq!(detect_format(Path::new("foo.bin")), None);
        assert_eq!(detect_format(Path::new("foo")), None);
    }

    #[test]
    fn test_detect_format_case_insensitive() {
        assert_eq!(
            detect_format(Path::new("FOO.TAR.BZ2")),
            Some(ArchiveFormat::TarBz2)
        );
        assert_eq!(detect_format(Path::new("BAR.ZIP")), Some(ArchiveFormat::Zip));
    }

    #[test]
    fn test_extract_tar_bz2_round_trip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("a8e.tar.bz2");
        let tar = build_tar(&[
            ("a8e", b"#!/bin/sh\necho a8e 2.3.1\n".as_slice(), 0o755),
            ("README.md", b"docs".as_slice(), 0o644),
        ]);
        fs::write(&archive, bzip(&tar)).unwrap();

        let dest = dir.path().join("out");
        let files = extract_auto(&archive, &dest).unwrap();

        assert_eq!(files.len(), 2);
        let bin = files
            .iter()
            .find(|f| f.relative_path == Path::new("a8e"))
            .unwrap();
        assert!(bin.is_executable);
        assert!(bin.absolute_path.starts_with(&dest));
        assert_eq!(
            fs::read(&bin.absolute_path).unwrap(),
            b"#!/bin/sh\necho a8e 2.3.1\n"
        );

        let readme = files
            .iter()
            .find(|f| f.relative_path == Path::new("README.md"))
            .unwrap();
        assert!(!readme.is_executable);
    }

    #[test]
    fn test_extract_tar_gz_with_nested_dirs() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.tar.gz");
        let tar = build_tar(&[("a8e-2.3.1/bin/a8e", b"bits".as_slice(), 0o755)]);
        fs::write(&archive, gzip(&tar)).unwrap();

        let dest = dir.path().join("out");
        let files = extract_auto(&archive, &dest).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0].relative_path,
            Path::new("a8e-2.3.1/bin/a8e")
        );
        assert!(files[0].absolute_path.exists());
    }

    #[test]
    fn test_extract_plain_tar() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.tar");
        fs::write(&archive, build_tar(&[("a8e", b"bits".as_slice(), 0o755)])).unwrap();

        let files = extract_auto(&archive, &dir.path().join("out")).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_extract_zip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.zip");

        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
        writer.start_file("a8e", options).unwrap();
        writer.write_all(b"zipped bits").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        fs::write(&archive, bytes).unwrap();

        let dest = dir.path().join("out");
        let files = extract_zip(&archive, &dest).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, Path::new("a8e"));
        #[cfg(unix)]
        assert!(files[0].is_executable);
        assert_eq!(fs::read(&files[0].absolute_path).unwrap(), b"zipped bits");
    }

    #[test]
    fn test_extract_unknown_format_fails() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.xyz");
        fs::write(&archive, b"not an archive").unwrap();

        let err = extract_auto(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("release.xyz"));
    }

    #[test]
    fn test_extract_corrupt_archive_fails() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.tar.bz2");
        fs::write(&archive, b"definitely not bzip2 data").unwrap();

        assert!(extract_auto(&archive, &dir.path().join("out")).is_err());
    }
}
