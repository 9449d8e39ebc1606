//! Commis Engine - Recipe resolution, criteria detection, and validation
//!
//! The three algorithms of the system, over the `commis-core` data model:
//! - [`RecipeBuilder`] layers matching rulebook overlays onto the baseline
//! - [`Detector`] infers criteria from a snapshot via ranked detection rules
//! - [`Validator`] checks a recipe's constraints against a snapshot

pub mod build;
pub mod cancel;
pub mod detect;
pub mod error;
pub mod extract;
pub mod validate;

pub use build::RecipeBuilder;
pub use cancel::CancelToken;
pub use detect::{
    CriteriaField, Detected, DetectionReport, DetectionRule, Detector, Provenance, ValuePattern,
};
pub use error::EngineError;
pub use extract::{extract_value, ExtractError};
pub use validate::Validator;
