//! The three-level measurement model: category, named group, key/value.
//!
//! Measurements are the universal currency between snapshots, recipes, and
//! constraints. A [`Measurement`] is one category of configuration (e.g. all
//! Kubernetes settings), a [`Subtype`] is a named group inside it (e.g. the
//! `config` section), and a [`Reading`] is one typed value.
//!
//! All of these types have plain value semantics: a `clone()` is always a
//! deep copy, so collections never alias each other.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed set of measurement categories.
///
/// Each category corresponds to one collector in the snapshotting subsystem.
/// Within any single collection (snapshot, recipe, or rulebook base) there is
/// at most one [`Measurement`] per kind.
///
/// # Example
///
/// ```
/// use commis_core::MeasurementType;
///
/// let kind: MeasurementType = "K8s".parse().unwrap();
/// assert_eq!(kind, MeasurementType::K8s);
/// assert_eq!(kind.to_string(), "K8s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasurementType {
    /// Operating system release facts and settings.
    #[cfg_attr(feature = "serde", serde(rename = "OS"))]
    Os,
    /// Kernel release and boot parameters.
    Kernel,
    /// Kernel runtime tunables (`/proc/sys`).
    Sysctl,
    /// Kernel modules.
    Kmod,
    /// systemd unit state.
    SystemD,
    /// GPU devices and driver settings.
    #[cfg_attr(feature = "serde", serde(rename = "GPU"))]
    Gpu,
    /// Kubernetes cluster facts and settings.
    K8s,
    /// Container image references.
    Image,
}

impl MeasurementType {
    /// Canonical name used in constraint paths and serialized documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Os => "OS",
            MeasurementType::Kernel => "Kernel",
            MeasurementType::Sysctl => "Sysctl",
            MeasurementType::Kmod => "Kmod",
            MeasurementType::SystemD => "SystemD",
            MeasurementType::Gpu => "GPU",
            MeasurementType::K8s => "K8s",
            MeasurementType::Image => "Image",
        }
    }

    /// All known categories, in canonical order.
    pub fn all() -> &'static [MeasurementType] {
        &[
            MeasurementType::Os,
            MeasurementType::Kernel,
            MeasurementType::Sysctl,
            MeasurementType::Kmod,
            MeasurementType::SystemD,
            MeasurementType::Gpu,
            MeasurementType::K8s,
            MeasurementType::Image,
        ]
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when a string names no known measurement category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown measurement type \"{0}\"")]
pub struct UnknownMeasurementType(pub String);

impl FromStr for MeasurementType {
    type Err = UnknownMeasurementType;

    /// Parses a category name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementType::all()
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownMeasurementType(s.to_string()))
    }
}

/// A single typed configuration value.
///
/// Immutable once constructed. `Display` gives the canonical string
/// rendering used by constraint extraction.
///
/// # Example
///
/// ```
/// use commis_core::Reading;
///
/// let r = Reading::from(524288);
/// assert_eq!(r.to_string(), "524288");
/// assert_eq!(r.as_int(), Some(524288));
/// assert_eq!(r.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Reading {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Free-form string.
    Str(String),
}

impl Reading {
    /// Returns the string payload, if this is a string reading.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reading::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean reading.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Reading::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer reading.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reading::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Bool(b) => write!(f, "{b}"),
            Reading::Int(i) => write!(f, "{i}"),
            Reading::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Reading {
    fn from(s: &str) -> Self {
        Reading::Str(s.to_string())
    }
}

impl From<String> for Reading {
    fn from(s: String) -> Self {
        Reading::Str(s)
    }
}

impl From<bool> for Reading {
    fn from(b: bool) -> Self {
        Reading::Bool(b)
    }
}

impl From<i64> for Reading {
    fn from(i: i64) -> Self {
        Reading::Int(i)
    }
}

/// A named group of readings inside a measurement.
///
/// `data` holds configuration values; `context` is optional provenance
/// metadata (human-readable source/reason), kept separate from `data` and
/// merged independently during recipe builds. Subtype names are unique
/// within their enclosing measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subtype {
    /// Group name, unique within the measurement.
    pub name: String,
    /// Configuration values keyed by setting name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: BTreeMap<String, Reading>,
    /// Provenance metadata, orthogonal to `data`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub context: Option<BTreeMap<String, String>>,
}

impl Subtype {
    /// Creates an empty subtype with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Subtype {
            name: name.into(),
            data: BTreeMap::new(),
            context: None,
        }
    }

    /// Adds one data entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Reading>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Adds one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Looks up one data entry by key.
    pub fn get(&self, key: &str) -> Option<&Reading> {
        self.data.get(key)
    }
}

/// One category of configuration: a kind plus its named groups.
///
/// # Example
///
/// ```
/// use commis_core::{Measurement, MeasurementType, Subtype};
///
/// let m = Measurement::new(MeasurementType::K8s)
///     .with_subtype(Subtype::new("config").with_entry("mode", "basic"));
///
/// assert_eq!(m.subtype("config").unwrap().get("mode").unwrap().to_string(), "basic");
/// assert!(m.subtype("other").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Which category this measurement describes.
    pub kind: MeasurementType,
    /// Named groups, unique by name, in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtypes: Vec<Subtype>,
}

impl Measurement {
    /// Creates an empty measurement of the given kind.
    pub fn new(kind: MeasurementType) -> Self {
        Measurement {
            kind,
            subtypes: Vec::new(),
        }
    }

    /// Appends a subtype.
    pub fn with_subtype(mut self, subtype: Subtype) -> Self {
        self.subtypes.push(subtype);
        self
    }

    /// Looks up a subtype by name.
    pub fn subtype(&self, name: &str) -> Option<&Subtype> {
        self.subtypes.iter().find(|s| s.name == name)
    }

    /// Looks up a subtype by name, mutably.
    pub fn subtype_mut(&mut self, name: &str) -> Option<&mut Subtype> {
        self.subtypes.iter_mut().find(|s| s.name == name)
    }
}

/// Finds the measurement of the given kind in a collection.
///
/// Collections hold at most one measurement per kind, so the first hit is
/// the only hit.
pub fn find_measurement(
    measurements: &[Measurement],
    kind: MeasurementType,
) -> Option<&Measurement> {
    measurements.iter().find(|m| m.kind == kind)
}
