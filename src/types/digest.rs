use serde::{Deserialize, Deserializer, Serialize};

/// A validated SHA-256 digest (64 lowercase hex characters).
///
/// All digests in the system are validated at parse/deserialization time,
/// so malformed hex can never propagate into a verification decision.
/// Accepts an optional `sha256:` prefix and normalizes case.
///
/// # Example
///
/// ```
/// use a8e_dist::types::Sha256Digest;
///
/// let d = Sha256Digest::parse(
///     "sha256:E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
/// )
/// .unwrap();
/// assert!(d.as_str().starts_with("e3b0c442"));
/// assert!(Sha256Digest::parse("deadbeef").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Parse and validate a digest string.
    ///
    /// Returns an error unless the input is exactly 64 hex characters
    /// (after stripping an optional `sha256:` prefix).
    pub fn parse(s: &str) -> Result<Self, String> {
        let hex = s.strip_prefix("sha256:").unwrap_or(s);

        if hex.len() != 64 {
            return Err(format!(
                "Invalid SHA256 digest: expected 64 hex characters, got {} in '{s}'",
                hex.len(),
            ));
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "Invalid SHA256 digest: contains non-hex characters in '{s}'"
            ));
        }

        Ok(Self(hex.to_lowercase()))
    }

    /// Build a digest from raw 32-byte hasher output.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Get the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time equality, for verifying downloaded artifacts.
    ///
    /// Examines every byte regardless of where the first difference occurs,
    /// so the comparison itself leaks nothing about the expected digest.
    pub fn constant_time_eq(&self, other: &Self) -> bool {
        let a = self.0.as_bytes();
        let b = other.0.as_bytes();

        if a.len() != b.len() {
            return false;
        }

        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl std::str::FromStr for Sha256Digest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256 of the empty input.
    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_parse_valid() {
        let d = Sha256Digest::parse(EMPTY).unwrap();
        assert_eq!(d.as_str(), EMPTY);
    }

    #[test]
    fn test_parse_strips_prefix_and_normalizes_case() {
        let upper = EMPTY.to_uppercase();
        let d = Sha256Digest::parse(&format!("sha256:{upper}")).unwrap();
        assert_eq!(d.as_str(), EMPTY);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(Sha256Digest::parse("").is_err());
        assert!(Sha256Digest::parse("deadbeef").is_err());
        assert!(Sha256Digest::parse(&format!("{EMPTY}00")).is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let bad = format!("{}zz", &EMPTY[..62]);
        assert!(Sha256Digest::parse(&bad).is_err());
    }

    #[test]
    fn test_from_bytes_matches_known_vector() {
        use sha2::{Digest, Sha256};

        let digest = Sha256Digest::from_bytes(Sha256::digest(b"").into());
        assert_eq!(digest.as_str(), EMPTY);
    }

    #[test]
    fn test_constant_time_eq() {
        let a = Sha256Digest::parse(EMPTY).unwrap();
        let b = Sha256Digest::parse(&EMPTY.to_uppercase()).unwrap();
        let c = Sha256Digest::from_bytes([0xab; 32]);

        assert!(a.constant_time_eq(&b));
        assert!(!a.constant_time_eq(&c));
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        #[derive(Deserialize)]
        struct Doc {
            #[allow(dead_code)]
            sha256: Sha256Digest,
        }

        assert!(toml::from_str::<Doc>(&format!("sha256 = \"{EMPTY}\"")).is_ok());
        assert!(toml::from_str::<Doc>("sha256 = \"nope\"").is_err());
    }
}
