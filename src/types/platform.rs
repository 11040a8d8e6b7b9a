use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Operating system component of a [`Platform`].
///
/// Release artifacts are published for macOS and Linux; the value is used
/// only as half of the artifact lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS (Darwin)
    Macos,
    /// Linux (GNU userland)
    Linux,
}

impl Os {
    /// Get the current operating system.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "macos" => Some(Self::Macos),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Linux => "linux",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}

/// CPU architecture component of a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// ARM64 architecture (Apple Silicon, aarch64 Linux)
    Arm64,
    /// `x86_64` architecture (Intel / AMD)
    X86_64,
}

impl Arch {
    /// Get the current architecture.
    pub fn current() -> Option<Self> {
        match std::env::consts::ARCH {
            "aarch64" => Some(Self::Arm64),
            "x86_64" => Some(Self::X86_64),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
        }
    }

    /// Rust-convention architecture name (`aarch64` / `x86_64`).
    ///
    /// Distinct from [`as_str()`](Self::as_str) which uses platform names
    /// (`arm64`). The value matches `std::env::consts::ARCH` and the
    /// target-triple spelling used in release artifact filenames.
    pub fn rust_name(&self) -> &'static str {
        match self {
            Self::Arm64 => "aarch64",
            Self::X86_64 => "x86_64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}

/// The (operating system, CPU architecture) pair that selects a release
/// artifact.
///
/// Rendered and parsed as `<os>-<arch>`, which is also the table key used
/// in release manifests.
///
/// # Example
///
/// ```
/// use a8e_dist::types::{Arch, Os, Platform};
///
/// let p: Platform = "linux-x86_64".parse().unwrap();
/// assert_eq!(p, Platform::new(Os::Linux, Arch::X86_64));
/// assert_eq!(p.to_string(), "linux-x86_64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system half of the key.
    pub os: Os,
    /// CPU architecture half of the key.
    pub arch: Arch,
}

impl Platform {
    /// Create a platform key from its parts.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform of the running host.
    ///
    /// Returns `None` on hosts outside the supported (os, arch) matrix, so
    /// callers can surface an unsupported-platform error instead of
    /// guessing.
    pub fn current() -> Option<Self> {
        Some(Self::new(Os::current()?, Arch::current()?))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, arch) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid platform '{s}': expected <os>-<arch>"))?;
        Ok(Self::new(os.parse()?, arch.parse()?))
    }
}

impl Serialize for Platform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip() {
        for s in ["macos-arm64", "macos-x86_64", "linux-arm64", "linux-x86_64"] {
            let p: Platform = s.parse().unwrap();
            assert_eq!(p.to_string(), s);
        }
    }

    #[test]
    fn test_platform_aliases() {
        let p: Platform = "darwin-aarch64".parse().unwrap();
        assert_eq!(p, Platform::new(Os::Macos, Arch::Arm64));

        let p: Platform = "Linux-AMD64".parse().unwrap();
        assert_eq!(p, Platform::new(Os::Linux, Arch::X86_64));
    }

    #[test]
    fn test_platform_rejects_malformed() {
        assert!("freebsd-x86_64".parse::<Platform>().is_err());
        assert!("linux-riscv64".parse::<Platform>().is_err());
        assert!("linux".parse::<Platform>().is_err());
        assert!("".parse::<Platform>().is_err());
    }

    #[test]
    fn test_arch_rust_name() {
        assert_eq!(Arch::Arm64.rust_name(), "aarch64");
        assert_eq!(Arch::X86_64.rust_name(), "x86_64");
    }

    #[test]
    fn test_current_platform_is_supported_on_ci_hosts() {
        // Test hosts are macOS or Linux on arm64/x86_64.
        let p = Platform::current();
        if cfg!(any(target_os = "macos", target_os = "linux")) {
            assert!(p.is_some());
        }
    }

    #[test]
    fn test_serde_as_table_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(Platform::new(Os::Linux, Arch::X86_64), 1u8);

        let doc = toml::to_string(&map).unwrap();
        assert_eq!(doc.trim(), "linux-x86_64 = 1");

        let back: std::collections::HashMap<Platform, u8> = toml::from_str(&doc).unwrap();
        assert_eq!(back[&Platform::new(Os::Linux, Arch::X86_64)], 1);
    }
}
