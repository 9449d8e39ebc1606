//! Engine entry points that hide the store and builder wiring.

use commis_core::{Query, Recipe, Snapshot, ValidationResult};
use commis_engine::{DetectionReport, Detector, EngineError, RecipeBuilder, Validator};
use commis_store::Rulebook;

/// Builds the recipe for a query against the embedded rulebook.
///
/// # Errors
///
/// Fails only when the embedded rulebook cannot be parsed.
pub fn recommend(query: &Query) -> Result<Recipe, EngineError> {
    let rulebook = Rulebook::shared()?;
    Ok(RecipeBuilder::new(rulebook).build(query))
}

/// Detects criteria from a snapshot, then builds the recipe for them.
///
/// The detection report comes back alongside the recipe so callers can see
/// which snapshot signals drove the query.
pub fn recommend_for_snapshot(
    snapshot: &Snapshot,
) -> Result<(Recipe, DetectionReport), EngineError> {
    let rulebook = Rulebook::shared()?;
    let (criteria, report) = Detector::new().detect(snapshot);
    let recipe = RecipeBuilder::new(rulebook).build(&criteria.to_query());
    Ok((recipe, report))
}

/// Checks a recipe's constraints against a snapshot.
///
/// # Errors
///
/// Never fails for this wiring; constraint failures and skips are rows in
/// the returned result. (Cancellation is available through
/// [`Validator::with_cancel`] directly.)
pub fn validate(recipe: &Recipe, snapshot: &Snapshot) -> Result<ValidationResult, EngineError> {
    Validator::new().validate(recipe, snapshot)
}
