//! Reporter trait for dependency injection
//!
//! This trait allows the install pipeline to report progress and status
//! without being coupled to a specific terminal implementation.

use crate::types::Version;

pub trait Reporter: Send + Sync {
    /// Indicates a new section or phase has started (e.g. "Fetching").
    fn section(&self, title: &str);

    /// Updates the progress of a download.
    fn downloading(&self, name: &str, version: &Version, current: u64, total: u64);

    /// Marks the release as being unpacked and published.
    fn installing(&self, name: &str, version: &Version);

    /// Marks the operation as successfully completed.
    fn done(&self, name: &str, version: &Version, detail: &str);

    /// Marks the operation as failed with a specific reason.
    fn failed(&self, name: &str, version: &Version, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn downloading(&self, name: &str, version: &Version, current: u64, total: u64) {
        (**self).downloading(name, version, current, total);
    }
    fn installing(&self, name: &str, version: &Version) {
        (**self).installing(name, version);
    }
    fn done(&self, name: &str, version: &Version, detail: &str) {
        (**self).done(name, version, detail);
    }
    fn failed(&self, name: &str, version: &Version, reason: &str) {
        (**self).failed(name, version, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
}

/// A no-op reporter for silent operations (e.g., dry runs, testing).
#[derive(Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &str, _: &Version, _: u64, _: u64) {}
    fn installing(&self, _: &str, _: &Version) {}
    fn done(&self, _: &str, _: &Version, _: &str) {}
    fn failed(&self, _: &str, _: &Version, _: &str) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}
