//! Semantic version value type

use crate::error::{Result, UpdraftError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An immutable `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` version.
///
/// Ordering compares major, minor and patch numerically, puts a pre-release
/// before the release it precedes, and uses build metadata only as a final
/// tie-breaker so the order stays total and agrees with `==`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion(semver::Version);

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse the canonical grammar. Partial versions such as `"11"` or
    /// `"0.3"` are rejected rather than padded.
    pub fn parse(input: &str) -> Result<Self> {
        semver::Version::parse(input)
            .map(Self)
            .map_err(|e| UpdraftError::InvalidVersion {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn pre_release(&self) -> Option<&str> {
        (!self.0.pre.is_empty()).then(|| self.0.pre.as_str())
    }

    pub fn build(&self) -> Option<&str> {
        (!self.0.build.is_empty()).then(|| self.0.build.as_str())
    }

    pub fn is_pre_release(&self) -> bool {
        !self.0.pre.is_empty()
    }
}

impl FromStr for SemanticVersion {
    type Err = UpdraftError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    #[test]
    fn parses_full_grammar() {
        let version = v("1.2.3-beta.1+build.42");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 3);
        assert_eq!(version.pre_release(), Some("beta.1"));
        assert_eq!(version.build(), Some("build.42"));
        assert_eq!(version.to_string(), "1.2.3-beta.1+build.42");
    }

    #[test]
    fn rejects_partial_versions() {
        for input in ["11", "0.3", "0.3-123", "", "1.2.3.4", "v1.2.3", "01.2.3", "1.2.x"] {
            let err = SemanticVersion::parse(input).unwrap_err();
            assert!(
                matches!(err, UpdraftError::InvalidVersion { input: ref got, .. } if got == input),
                "expected InvalidVersion for {input:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn orders_numerically_not_lexically() {
        assert!(v("0.10.0") > v("0.9.9"));
        assert!(v("2.0.0") > v("1.99.99"));
        assert!(v("1.0.10") > v("1.0.2"));
    }

    #[test]
    fn pre_release_sorts_before_release() {
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
        assert!(v("1.0.0-rc.1") > v("0.9.9"));
        assert!(v("1.0.0-rc.1").is_pre_release());
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(v("1.0.0"), v("1.0.0"));
        assert_ne!(v("1.0.0"), v("1.0.0+build"));
        assert_eq!(v("1.0.0").cmp(&v("1.0.0")), Ordering::Equal);
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&v("0.2.1")).unwrap();
        assert_eq!(json, "\"0.2.1\"");

        let parsed: SemanticVersion = serde_json::from_str("\"0.2.1\"").unwrap();
        assert_eq!(parsed, SemanticVersion::new(0, 2, 1));

        assert!(serde_json::from_str::<SemanticVersion>("\"0.2\"").is_err());
    }
}
