//! Dotted paths addressing a single reading inside a snapshot.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::measurement::{MeasurementType, UnknownMeasurementType};

/// Error for a path string that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Fewer than three dot-separated segments.
    #[error("malformed path \"{0}\": expected <type>.<subtype>.<key>")]
    Malformed(String),
    /// The first segment is not a known measurement type.
    #[error("malformed path \"{path}\": {source}")]
    UnknownType {
        /// The offending path text.
        path: String,
        /// The underlying type-name error.
        source: UnknownMeasurementType,
    },
}

/// Address of one reading: `<type>.<subtype>.<key>`.
///
/// Splitting stops after the second dot so keys may themselves contain dots,
/// as sysctl names do: `"Sysctl.defaults.net.ipv4.ip_forward"` has subtype
/// `defaults` and key `net.ipv4.ip_forward`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintPath {
    kind: MeasurementType,
    subtype: String,
    key: String,
}

impl ConstraintPath {
    /// Builds a path from its parts.
    pub fn new(kind: MeasurementType, subtype: impl Into<String>, key: impl Into<String>) -> Self {
        ConstraintPath {
            kind,
            subtype: subtype.into(),
            key: key.into(),
        }
    }

    /// The measurement type segment.
    pub fn kind(&self) -> MeasurementType {
        self.kind
    }

    /// The subtype segment.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The key segment, verbatim, embedded dots included.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for ConstraintPath {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.splitn(3, '.');
        let (kind, subtype, key) = match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(subtype), Some(key)) => (kind, subtype, key),
            _ => return Err(PathError::Malformed(text.to_string())),
        };
        if subtype.is_empty() || key.is_empty() {
            return Err(PathError::Malformed(text.to_string()));
        }
        let kind = kind.parse().map_err(|source| PathError::UnknownType {
            path: text.to_string(),
            source,
        })?;
        Ok(ConstraintPath::new(kind, subtype, key))
    }
}

impl fmt::Display for ConstraintPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.kind, self.subtype, self.key)
    }
}
