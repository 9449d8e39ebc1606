//! Flexible-precision version values for constraint comparison.
//!
//! Cluster components report versions in many shapes: `"1.30"`, `"6.8.0"`,
//! `"v1.33.5-eks-3025e55"`. [`Version`] parses all of them down to a
//! three-component numeric core and compares component-wise, so `">= 1.30"`
//! can be evaluated against whatever a snapshot actually contains.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A three-component version with flexible parsing.
///
/// Missing components default to zero: `"1"`, `"1.2"`, and `"1.2.0"` all
/// compare equal. A leading `v`/`V` is stripped, and anything from the first
/// `-` or `+` onward (pre-release tags, vendor suffixes, build metadata) is
/// ignored, so `"v1.33.5-eks-3025e55"` parses as `1.33.5`.
///
/// # Example
///
/// ```
/// use commis_core::Version;
///
/// let server: Version = "v1.33.5-eks-3025e55".parse().unwrap();
/// let floor: Version = "1.30".parse().unwrap();
/// assert!(server > floor);
/// assert_eq!(server.to_string(), "1.33.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
}

impl Version {
    /// Creates a version from explicit components.
    pub const fn of(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Returns the major component.
    pub const fn major(&self) -> u64 {
        self.major
    }

    /// Returns the minor component.
    pub const fn minor(&self) -> u64 {
        self.minor
    }

    /// Returns the patch component.
    pub const fn patch(&self) -> u64 {
        self.patch
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error when a string has no parseable version core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a version")]
pub struct VersionError(pub String);

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let core = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let core = core
            .split_once(['-', '+'])
            .map(|(head, _)| head)
            .unwrap_or(core);

        if core.is_empty() {
            return Err(VersionError(s.to_string()));
        }

        let mut components = [0u64; 3];
        for (idx, part) in core.splitn(3, '.').enumerate() {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return Err(VersionError(s.to_string()));
            }
            components[idx] = digits.parse().map_err(|_| VersionError(s.to_string()))?;
        }

        Ok(Version::of(components[0], components[1], components[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        assert_eq!(v("1"), Version::of(1, 0, 0));
        assert_eq!(v("1.2"), Version::of(1, 2, 0));
        assert_eq!(v("1.2.3"), Version::of(1, 2, 3));
    }

    #[test]
    fn test_vendor_suffix_is_stripped() {
        assert_eq!(v("v1.33.5-eks-3025e55"), Version::of(1, 33, 5));
        assert_eq!(v("1.30.0+k3s1"), Version::of(1, 30, 0));
        assert_eq!(v("V6.8"), Version::of(6, 8, 0));
    }

    #[test]
    fn test_component_accessors() {
        let version = v("v1.33.5-eks-3025e55");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 33);
        assert_eq!(version.patch(), 5);
    }

    #[test]
    fn test_trailing_garbage_in_component_is_dropped() {
        // Digits are taken greedily from the front of each component.
        assert_eq!(v("1.2rc1"), Version::of(1, 2, 0));
    }

    #[test]
    fn test_component_wise_ordering() {
        assert!(v("1.33.5") > v("1.30"));
        assert!(v("1.28.0") < v("1.30"));
        assert!(v("2.0") > v("1.99.99"));
        assert_eq!(v("1.30").cmp(&v("1.30.0")), Ordering::Equal);
    }

    #[test]
    fn test_rejects_non_versions() {
        assert!("".parse::<Version>().is_err());
        assert!("ubuntu".parse::<Version>().is_err());
        assert!("v-eks".parse::<Version>().is_err());
        assert!(".1.2".parse::<Version>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(v("1.2").to_string(), "1.2.0");
        assert_eq!(v("v1.33.5-eks-3025e55").to_string(), "1.33.5");
    }
}
