//! Validation: checking a recipe's constraints against a snapshot.

use std::time::Instant;

use tracing::{info, trace};

use commis_core::{
    Constraint, ConstraintPath, ConstraintValidation, Expression, Recipe, Snapshot,
    ValidationResult,
};

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::extract::extract_value;

/// Checks every constraint a recipe declares against a snapshot.
///
/// Individual constraint outcomes are data, never errors: a constraint that
/// cannot be checked is Skipped, one whose expression does not hold (or
/// cannot be evaluated) is Failed, and the run always completes — unless a
/// [`CancelToken`] fires, which aborts the whole call and discards partial
/// results so nobody mistakes them for a final verdict.
#[derive(Debug, Default)]
pub struct Validator {
    cancel: Option<CancelToken>,
}

impl Validator {
    pub fn new() -> Self {
        Validator { cancel: None }
    }

    /// Installs a cancellation token, checked once per constraint.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validates `recipe` against `snapshot`.
    ///
    /// # Errors
    ///
    /// Only [`EngineError::Cancelled`], when the installed token fired.
    pub fn validate(
        &self,
        recipe: &Recipe,
        snapshot: &Snapshot,
    ) -> Result<ValidationResult, EngineError> {
        let started = Instant::now();
        let constraints: &[Constraint] = recipe.constraints.as_deref().unwrap_or(&[]);

        let mut results = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            if let Some(cancel) = &self.cancel {
                if cancel.is_cancelled() {
                    return Err(EngineError::Cancelled);
                }
            }
            let result = check(constraint, snapshot);
            trace!(
                constraint = %result.name,
                status = %result.status,
                "constraint checked"
            );
            results.push(result);
        }

        let result = ValidationResult::new(results, started.elapsed().as_millis() as u64);
        info!(
            event = "validation_end",
            total = result.summary.total as u64,
            passed = result.summary.passed as u64,
            failed = result.summary.failed as u64,
            skipped = result.summary.skipped as u64,
            status = %result.summary.status,
            duration_ms = result.summary.duration_ms,
        );
        Ok(result)
    }
}

/// Runs one constraint to its terminal verdict.
///
/// Skip conditions (bad path, absent value, bad expression) end the
/// constraint without failing the run; an expression that evaluates false or
/// errors is a failure.
fn check(constraint: &Constraint, snapshot: &Snapshot) -> ConstraintValidation {
    let name = constraint.name.as_str();
    let expected = constraint.value.as_str();

    let path: ConstraintPath = match name.parse() {
        Ok(path) => path,
        Err(err) => return ConstraintValidation::skipped(name, expected, None, err.to_string()),
    };

    let actual = match extract_value(&path, snapshot) {
        Ok(actual) => actual,
        Err(err) => return ConstraintValidation::skipped(name, expected, None, err.to_string()),
    };

    let expression = match Expression::parse(expected) {
        Ok(expression) => expression,
        Err(err) => {
            return ConstraintValidation::skipped(name, expected, Some(actual), err.to_string())
        }
    };

    match expression.evaluate(&actual) {
        Ok(true) => ConstraintValidation::passed(name, expected, actual),
        Ok(false) => {
            let message = format!("expected {expected}, got {actual}");
            ConstraintValidation::failed(name, expected, actual, message)
        }
        Err(err) => {
            let message = err.to_string();
            ConstraintValidation::failed(name, expected, actual, message)
        }
    }
}
