//! IO modules - side effects (network, filesystem)

pub mod download;
pub mod extract;

pub use download::{build_client, fetch_digest, DownloadError, DownloadRequest};
pub use extract::{extract_auto, ArchiveFormat, ExtractError, ExtractedFile};
