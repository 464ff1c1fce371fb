//! Producer version triple recorded alongside sprite metadata.
//!
//! The version is only consulted to choose the origin used when mapping a
//! tight-packing mesh into pixel space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// First producer version that anchors tight meshes at the sprite pivot.
pub const PIVOT_ORIGIN_SINCE: ProducerVersion = ProducerVersion::new(5, 4, 2);

/// Version of the engine that produced a sprite, compared as an ordered
/// `(major, minor, patch)` tuple.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "VersionRepr", into = "[u32; 3]")]
pub struct ProducerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ProducerVersion {
    /// Creates a version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses an engine version string such as `5.4.1p3` or `2020.3.12f1`.
    ///
    /// Release suffixes after the patch number are ignored. A missing patch
    /// component reads as zero.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let invalid = || SpecError::InvalidVersion(text.to_string());

        let mut parts = text.trim().split('.');
        let major = parts.next().and_then(leading_number).ok_or_else(invalid)?;
        let minor = parts.next().and_then(leading_number).ok_or_else(invalid)?;
        let patch = match parts.next() {
            Some(part) => leading_number(part).ok_or_else(invalid)?,
            None => 0,
        };

        Ok(Self::new(major, minor, patch))
    }

    /// True when tight meshes of this version are anchored at the geometric
    /// centre of the sprite rectangle instead of its pivot (5.4.1 and older).
    pub fn uses_center_origin(&self) -> bool {
        *self < PIVOT_ORIGIN_SINCE
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let digits = part.len() - part.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    part[..digits].parse().ok()
}

impl FromStr for ProducerVersion {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProducerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<[u32; 3]> for ProducerVersion {
    fn from(v: [u32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<ProducerVersion> for [u32; 3] {
    fn from(v: ProducerVersion) -> Self {
        [v.major, v.minor, v.patch]
    }
}

/// Accepted JSON shapes: `[5, 4, 1]` or `"5.4.1p3"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Triple([u32; 3]),
    Text(String),
}

impl TryFrom<VersionRepr> for ProducerVersion {
    type Error = SpecError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionRepr::Triple(v) => Ok(v.into()),
            VersionRepr::Text(s) => Self::parse(&s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_suffixes() {
        assert_eq!(
            ProducerVersion::parse("5.4.1p3").unwrap(),
            ProducerVersion::new(5, 4, 1)
        );
        assert_eq!(
            ProducerVersion::parse("2020.3.12f1").unwrap(),
            ProducerVersion::new(2020, 3, 12)
        );
        assert_eq!(
            ProducerVersion::parse("5.6").unwrap(),
            ProducerVersion::new(5, 6, 0)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ProducerVersion::parse("").is_err());
        assert!(ProducerVersion::parse("five.4.1").is_err());
        assert!(ProducerVersion::parse("5").is_err());
        assert!(ProducerVersion::parse("5.x").is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(ProducerVersion::new(4, 9, 9) < ProducerVersion::new(5, 0, 0));
        assert!(ProducerVersion::new(5, 3, 9) < ProducerVersion::new(5, 4, 0));
        assert!(ProducerVersion::new(5, 4, 1) < ProducerVersion::new(5, 4, 2));
        assert!(ProducerVersion::new(5, 5, 0) > ProducerVersion::new(5, 4, 2));
    }

    #[test]
    fn test_center_origin_gate() {
        assert!(ProducerVersion::new(5, 3, 9).uses_center_origin());
        assert!(ProducerVersion::new(5, 4, 1).uses_center_origin());
        assert!(!ProducerVersion::new(5, 4, 2).uses_center_origin());
        assert!(!ProducerVersion::new(5, 5, 0).uses_center_origin());
        assert!(!ProducerVersion::new(2019, 1, 0).uses_center_origin());
    }

    #[test]
    fn test_json_accepts_array_and_string() {
        let a: ProducerVersion = serde_json::from_str("[5, 4, 1]").unwrap();
        let b: ProducerVersion = serde_json::from_str("\"5.4.1p3\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "[5,4,1]");
        assert!(serde_json::from_str::<ProducerVersion>("\"nope\"").is_err());
    }
}
