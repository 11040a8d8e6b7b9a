use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated release version.
///
/// Releases are tagged with exact semantic versions (`2.3.1`), so parsing
/// rejects empty strings and anything the `semver` grammar does not accept.
/// The original spelling is preserved for display and URL substitution;
/// ordering follows semver precedence.
///
/// # Example
///
/// ```
/// use a8e_dist::types::Version;
///
/// let version = Version::parse("2.3.1").unwrap();
/// assert_eq!(version.as_str(), "2.3.1");
/// assert!(Version::parse("").is_err());
/// assert!(Version::parse("latest").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    parsed: semver::Version,
}

impl Version {
    /// Parse and validate a version string.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("Version must not be empty".to_string());
        }

        let parsed = semver::Version::parse(s)
            .map_err(|e| format!("Invalid version '{s}': {e}"))?;

        Ok(Self {
            raw: s.to_string(),
            parsed,
        })
    }

    /// Get the version string as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed semver form.
    pub fn semver(&self) -> &semver::Version {
        &self.parsed
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.parsed
            .cmp(&other.parsed)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
