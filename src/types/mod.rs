pub mod digest;
pub mod platform;
pub mod version;

pub use digest::Sha256Digest;
pub use platform::{Arch, Os, Platform};
pub use version::Version;
