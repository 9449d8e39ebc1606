//! Commis - Recipe resolution and constraint validation for cluster configuration
//!
//! Given a description of a target environment (or a snapshot of a real
//! one), commis layers environment-specific overlays onto a common baseline
//! to produce a recipe, and can later check whether a live environment
//! satisfies the constraints that recipe declares.
//!
//! # Example
//!
//! ```rust
//! use commis::prelude::*;
//!
//! let query = Query::any().with_intent("training");
//! let recipe = commis::recommend(&query).unwrap();
//! assert_eq!(recipe.matched_rules, vec!["intent=training"]);
//! ```

// Data model
pub use commis_core::{
    Accelerator, Constraint, ConstraintPath, ConstraintStatus, ConstraintValidation, Criteria,
    Dimension, EvalError, Expression, ExpressionError, Header, Intent, Measurement,
    MeasurementType, Operator, OsFamily, OverallStatus, PathError, Provider, Query, Reading,
    Recipe, Snapshot, Subtype, ValidationResult, ValidationSummary, Version, VersionError,
};

// Rulebook store
pub use commis_store::{Overlay, Rulebook, StoreError};

// Engine
pub use commis_engine::{
    CancelToken, CriteriaField, Detected, DetectionReport, DetectionRule, Detector, EngineError,
    ExtractError, Provenance, RecipeBuilder, Validator, ValuePattern,
};

mod api;
pub use api::{recommend, recommend_for_snapshot, validate};

pub mod prelude {
    pub use super::{
        CancelToken, Constraint, Criteria, Detector, Dimension, Measurement, MeasurementType,
        OverallStatus, Query, Reading, Recipe, RecipeBuilder, Rulebook, Snapshot, Subtype,
        ValidationResult, Validator,
    };
}
