//! Document header shared by snapshots, recipes, and validation results.

use chrono::{DateTime, Utc};

/// Identifies a serialized document: which schema it follows, which engine
/// version produced it, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// Schema identifier, e.g. `commis.recipe.v1`.
    pub schema: String,
    /// Engine version that produced the document.
    pub version: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Header {
    /// Creates a header for the given schema, stamped with the current engine
    /// version and time.
    pub fn new(schema: impl Into<String>) -> Self {
        Header {
            schema: schema.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
        }
    }
}
