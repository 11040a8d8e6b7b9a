pub mod error;
pub mod flow;
pub mod install;

pub use error::InstallError;
pub use flow::{FetchedRelease, Installed, ReleaseRequest, ResolvedRelease, StagedBinary};
pub use install::{install, InstallOptions, InstallOutcome};
