//! Core modules - pure, stateless logic

pub mod manifest;
pub mod resolver;

pub use manifest::{ManifestError, ReleaseManifest};
pub use resolver::{ArtifactResolver, ResolvedArtifact, UnsupportedPlatform};
