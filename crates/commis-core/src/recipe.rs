//! Recipes: the resolved configuration a build produces for one query.

use crate::header::Header;
use crate::measurement::{find_measurement, Measurement, MeasurementType};
use crate::query::Query;

/// Schema identifier written into recipe headers.
pub const RECIPE_SCHEMA: &str = "commis.recipe.v1";

/// One declarative check a recipe carries: a constraint path plus an
/// expression over the value found there.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Dotted constraint path, e.g. `K8s.server.version`.
    pub name: String,
    /// Expression text, e.g. `>= 1.30`.
    pub value: String,
}

impl Constraint {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Constraint {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The result of resolving a query against the rulebook: baseline
/// measurements with every matching overlay merged in, in rulebook order.
///
/// A recipe is created fresh per build and owned solely by its caller; it
/// never aliases rulebook memory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    pub header: Header,
    /// The query this recipe was built for.
    pub request: Query,
    /// Rendered keys of the overlays that matched, in application order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub matched_rules: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub measurements: Vec<Measurement>,
    /// Checks to run against a snapshot of the configured system.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub constraints: Option<Vec<Constraint>>,
}

impl Recipe {
    /// Creates an empty recipe for the given request.
    pub fn new(request: Query) -> Self {
        Recipe {
            header: Header::new(RECIPE_SCHEMA),
            request,
            matched_rules: Vec::new(),
            measurements: Vec::new(),
            constraints: None,
        }
    }

    /// Appends a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints
            .get_or_insert_with(Vec::new)
            .push(constraint);
        self
    }

    /// Looks up the measurement of the given kind.
    pub fn measurement(&self, kind: MeasurementType) -> Option<&Measurement> {
        find_measurement(&self.measurements, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_is_empty() {
        let recipe = Recipe::new(Query::any());
        assert_eq!(recipe.header.schema, RECIPE_SCHEMA);
        assert!(recipe.matched_rules.is_empty());
        assert!(recipe.measurements.is_empty());
        assert!(recipe.constraints.is_none());
    }

    #[test]
    fn test_with_constraint_appends() {
        let recipe = Recipe::new(Query::any())
            .with_constraint(Constraint::new("K8s.server.version", ">= 1.30"))
            .with_constraint(Constraint::new("OS.release.ID", "ubuntu"));

        let constraints = recipe.constraints.as_ref().unwrap();
        assert_eq!(constraints.len(), 2);
        assert_eq!(constraints[0].name, "K8s.server.version");
        assert_eq!(constraints[1].value, "ubuntu");
    }
}
