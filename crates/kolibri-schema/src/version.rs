use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaError;

/// A protocol version layer, ordered by (major, minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: u16,
    pub minor: u16,
}

impl ProtocolVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

impl FromStr for ProtocolVersion {
    type Err = SchemaError;

    /// Accepts `3.1` and `v3.1`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let invalid = || SchemaError::InvalidVersion(input.to_string());
        let (major, minor) = digits.split_once('.').ok_or_else(invalid)?;
        if major.is_empty() || minor.is_empty() || minor.contains('.') {
            return Err(invalid());
        }
        let major = major.parse::<u16>().map_err(|_| invalid())?;
        let minor = minor.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self::new(major, minor))
    }
}

impl Serialize for ProtocolVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProtocolVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_prefix() {
        assert_eq!("3.1".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::new(3, 1));
        assert_eq!("v2.1".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::new(2, 1));
        assert_eq!(" V1.0 ".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::new(1, 0));
    }

    #[test]
    fn rejects_malformed_versions() {
        for input in ["", "3", "v", "3.", ".1", "3.1.2", "a.b", "v-1.0", "70000.0"] {
            assert!(
                matches!(
                    input.parse::<ProtocolVersion>(),
                    Err(SchemaError::InvalidVersion(_))
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn orders_by_major_then_minor() {
        let mut versions = vec![
            ProtocolVersion::new(3, 3),
            ProtocolVersion::new(1, 0),
            ProtocolVersion::new(3, 0),
            ProtocolVersion::new(2, 1),
            ProtocolVersion::new(3, 10),
        ];
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["v1.0", "v2.1", "v3.0", "v3.3", "v3.10"]);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&ProtocolVersion::new(3, 2)).unwrap();
        assert_eq!(json, "\"v3.2\"");
        let back: ProtocolVersion = serde_json::from_str("\"3.2\"").unwrap();
        assert_eq!(back, ProtocolVersion::new(3, 2));
    }
}
