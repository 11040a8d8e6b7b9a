//! Blocking download with streaming SHA256 verification.
//!
//! The digest is computed while the body is written to disk, so a mismatch
//! is known the moment the transfer finishes without a second read pass.

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{Sha256Digest, Version};
use crate::ui::Reporter;

const READ_BUF_SIZE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        expected: Sha256Digest,
        actual: Sha256Digest,
    },
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Maps a body-read failure onto the taxonomy.
///
/// The blocking client surfaces mid-body timeouts as `io::Error`, with the
/// transport error boxed inside.
fn classify_read_error(err: std::io::Error) -> DownloadError {
    if err.kind() == std::io::ErrorKind::TimedOut {
        return DownloadError::Timeout;
    }

    if let Some(inner) = err.get_ref().and_then(|e| e.downcast_ref::<reqwest::Error>()) {
        if inner.is_timeout() {
            return DownloadError::Timeout;
        }
    }

    DownloadError::Io(err)
}

/// Build the HTTP client used for artifact fetches.
///
/// `timeout` bounds the whole request, connect through last body byte.
pub fn build_client(timeout: Duration) -> Result<Client, DownloadError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Request for a verified artifact download
pub struct DownloadRequest<'a, R: Reporter> {
    client: &'a Client,
    name: &'a str,
    version: &'a Version,
    url: &'a str,
    dest: &'a Path,
    expected: &'a Sha256Digest,
    reporter: &'a R,
}

impl<'a, R: Reporter> DownloadRequest<'a, R> {
    pub fn new(
        client: &'a Client,
        name: &'a str,
        version: &'a Version,
        url: &'a str,
        dest: &'a Path,
        expected: &'a Sha256Digest,
        reporter: &'a R,
    ) -> Self {
        Self {
            client,
            name,
            version,
            url,
            dest,
            expected,
            reporter,
        }
    }

    /// Download to `dest`, hashing as bytes arrive, and verify the digest.
    ///
    /// On a digest mismatch the partial file is removed before the error is
    /// returned, and the mismatch is never retried here: a corrupted or
    /// tampered artifact must surface to the operator, not be re-fetched
    /// silently.
    pub fn execute(self) -> Result<Sha256Digest, DownloadError> {
        debug!(url = self.url, "starting download");

        let mut response = self
            .client
            .get(self.url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()?
            .error_for_status()?;

        let total_size = response.content_length().unwrap_or(0);
        self.reporter
            .downloading(self.name, self.version, 0, total_size);

        let mut file = std::fs::File::create(self.dest)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; READ_BUF_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            let count = response.read(&mut buffer).map_err(classify_read_error)?;
            if count == 0 {
                break;
            }

            file.write_all(&buffer[..count])?;
            hasher.update(&buffer[..count]);
            downloaded += count as u64;
            self.reporter
                .downloading(self.name, self.version, downloaded, total_size);
        }

        file.flush()?;
        drop(file);

        let actual = Sha256Digest::from_bytes(hasher.finalize().into());

        if !self.expected.constant_time_eq(&actual) {
            warn!(
                url = self.url,
                expected = %self.expected,
                actual = %actual,
                "checksum mismatch, removing partial artifact"
            );
            self.reporter
                .failed(self.name, self.version, "checksum mismatch");
            std::fs::remove_file(self.dest).ok();
            return Err(DownloadError::HashMismatch {
                expected: self.expected.clone(),
                actual,
            });
        }

        debug!(url = self.url, bytes = downloaded, "download verified");
        Ok(actual)
    }
}

/// Fetch a URL and return only the sha256 of its body.
///
/// Used when pinning a release into a manifest, where no expected digest
/// exists yet.
pub fn fetch_digest(client: &Client, url: &str) -> Result<Sha256Digest, DownloadError> {
    let mut response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()?
        .error_for_status()?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; READ_BUF_SIZE];

    loop {
        let count = response.read(&mut buffer).map_err(classify_read_error)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    Ok(Sha256Digest::from_bytes(hasher.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NullReporter;

    fn digest_of(bytes: &[u8]) -> Sha256Digest {
        Sha256Digest::from_bytes(Sha256::digest(bytes).into())
    }

    #[test]
    fn test_download_verifies_and_writes_file() {
        let mut server = mockito::Server::new();
        let body = b"artifact bytes".to_vec();
        let mock = server
            .mock("GET", "/release.tar.bz2")
            .with_status(200)
            .with_body(&body)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("release.tar.bz2");
        let expected = digest_of(&body);
        let client = build_client(Duration::from_secs(5)).unwrap();
        let version = Version::parse("1.0.0").unwrap();

        let actual = DownloadRequest::new(
            &client,
            "a8e",
            &version,
            &format!("{}/release.tar.bz2", server.url()),
            &dest,
            &expected,
            &NullReporter,
        )
        .execute()
        .unwrap();

        mock.assert();
        assert_eq!(actual, expected);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[test]
    fn test_download_mismatch_removes_partial_file() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/release.tar.bz2")
            .with_status(200)
            .with_body(b"tampered bytes".to_vec())
            .create();

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("release.tar.bz2");
        let expected = digest_of(b"original bytes");
        let client = build_client(Duration::from_secs(5)).unwrap();
        let version = Version::parse("1.0.0").unwrap();

        let err = DownloadRequest::new(
            &client,
            "a8e",
            &version,
            &format!("{}/release.tar.bz2", server.url()),
            &dest,
            &expected,
            &NullReporter,
        )
        .execute()
        .unwrap_err();

        assert!(matches!(err, DownloadError::HashMismatch { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_download_http_error_status() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/release.tar.bz2")
            .with_status(404)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("release.tar.bz2");
        let expected = digest_of(b"whatever");
        let client = build_client(Duration::from_secs(5)).unwrap();
        let version = Version::parse("1.0.0").unwrap();

        let err = DownloadRequest::new(
            &client,
            "a8e",
            &version,
            &format!("{}/release.tar.bz2", server.url()),
            &dest,
            &expected,
            &NullReporter,
        )
        .execute()
        .unwrap_err();

        assert!(matches!(err, DownloadError::Http(_)));
    }

    #[test]
    fn test_fetch_digest() {
        let mut server = mockito::Server::new();
        let body = b"pin me".to_vec();
        server
            .mock("GET", "/artifact")
            .with_status(200)
            .with_body(&body)
            .create();

        let client = build_client(Duration::from_secs(5)).unwrap();
        let digest = fetch_digest(&client, &format!("{}/artifact", server.url())).unwrap();

        assert_eq!(digest, digest_of(&body));
    }
}
