//! Commis Core - Data model for recipe resolution and constraint validation
//!
//! This crate provides the shared vocabulary of the engine:
//! - The measurement model (categories, subtypes, typed readings)
//! - Queries and criteria with wildcard matching
//! - Constraint paths, expressions, and flexible version comparison
//! - Document types: snapshots, recipes, and validation reports

pub mod criteria;
pub mod expr;
pub mod header;
pub mod measurement;
pub mod path;
pub mod query;
pub mod recipe;
pub mod report;
pub mod snapshot;
pub mod version;

pub use criteria::{Accelerator, Criteria, Intent, OsFamily, Provider, UnknownCriterion};
pub use expr::{EvalError, Expression, ExpressionError, Operator};
pub use header::Header;
pub use measurement::{
    find_measurement, Measurement, MeasurementType, Reading, Subtype, UnknownMeasurementType,
};
pub use path::{ConstraintPath, PathError};
pub use query::{Dimension, Query, WILDCARD};
pub use recipe::{Constraint, Recipe, RECIPE_SCHEMA};
pub use report::{
    ConstraintStatus, ConstraintValidation, OverallStatus, ValidationResult, ValidationSummary,
    VALIDATION_SCHEMA,
};
pub use snapshot::{Snapshot, SNAPSHOT_SCHEMA};
pub use version::{Version, VersionError};
