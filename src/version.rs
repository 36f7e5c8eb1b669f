//! Configuration version tag.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Integer tag embedded in a rendered proxy configuration.
///
/// The control plane owns the sequence; a version is injected at render time
/// and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigVersion(pub u64);

impl ConfigVersion {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ConfigVersion {
    fn from(version: u64) -> Self {
        Self(version)
    }
}

impl From<ConfigVersion> for u64 {
    fn from(version: ConfigVersion) -> Self {
        version.0
    }
}

impl FromStr for ConfigVersion {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_decimal() {
        assert_eq!(ConfigVersion(0).to_string(), "0");
        assert_eq!(ConfigVersion(2147483647).to_string(), "2147483647");
    }

    #[test]
    fn test_parse_rejects_negative_and_text() {
        assert_eq!("42".parse::<ConfigVersion>().unwrap(), ConfigVersion(42));
        assert!("-1".parse::<ConfigVersion>().is_err());
        assert!("abc".parse::<ConfigVersion>().is_err());
        assert!(" 42".parse::<ConfigVersion>().is_err());
    }
}
