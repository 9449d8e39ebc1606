//! Commis Store - The rulebook: baseline measurements plus overlays
//!
//! A [`Rulebook`] is the declarative rule data recipes are resolved from: a
//! `base` sequence of measurements that applies everywhere, and `overlays`
//! that contribute additional measurements when their key matches a query.
//! Overlay order in the document is load-bearing: later overlays overwrite
//! earlier ones value-for-value during a build.
//!
//! The crate ships an embedded rulebook (`data/rulebook.yaml`) which
//! [`Rulebook::shared`] parses exactly once per process. Rulebooks can also
//! be loaded from YAML text or a file, which is how tests build private
//! fixtures.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use commis_core::{Measurement, Query};

/// The rulebook compiled into this crate.
pub const EMBEDDED_RULEBOOK: &str = include_str!("../data/rulebook.yaml");

/// Error loading or parsing a rulebook.
///
/// Carries rendered message text rather than source errors so the one cached
/// by [`Rulebook::shared`] can be cloned out to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The rulebook file could not be read.
    #[error("cannot read rulebook {path}: {message}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Rendered I/O error.
        message: String,
    },
    /// The rulebook text is not valid rule data.
    #[error("cannot parse rulebook: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Parse(err.to_string())
    }
}

/// Measurements contributed when `key` accepts the request query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Which queries this overlay applies to. An absent or empty key matches
    /// every query.
    #[serde(default)]
    pub key: Query,
    /// Measurements merged into the recipe when the key matches.
    #[serde(default)]
    pub types: Vec<Measurement>,
}

/// Parsed rule data: common baseline plus ordered overlays.
///
/// Read-only once parsed. Builds deep-clone out of it and never write back,
/// so one instance can serve any number of concurrent callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rulebook {
    /// Baseline measurements, at most one per measurement kind.
    #[serde(default)]
    pub base: Vec<Measurement>,
    /// Overlays in document order; order is application order.
    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

impl Rulebook {
    /// Parses a rulebook from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Rulebook, StoreError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and parses a rulebook file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Rulebook, StoreError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Rulebook::from_yaml_str(&text)
    }

    /// Parses the embedded rulebook.
    pub fn embedded() -> Result<Rulebook, StoreError> {
        Rulebook::from_yaml_str(EMBEDDED_RULEBOOK)
    }

    /// Returns the process-wide rulebook, parsing the embedded data on
    /// first use.
    ///
    /// The parse happens exactly once; concurrent first callers block until
    /// it completes and then every caller shares the same instance. A parse
    /// failure is cached just like a success and handed to every subsequent
    /// caller, since the embedded data cannot change at runtime and retrying
    /// cannot help.
    pub fn shared() -> Result<&'static Rulebook, StoreError> {
        static SHARED: OnceLock<Result<Rulebook, StoreError>> = OnceLock::new();
        SHARED
            .get_or_init(Rulebook::embedded)
            .as_ref()
            .map_err(Clone::clone)
    }
}
