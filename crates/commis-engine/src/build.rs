//! Recipe builds: layering matching overlays onto the rulebook baseline.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use commis_core::{Measurement, MeasurementType, Query, Recipe};
use commis_store::Rulebook;

/// Resolves queries into recipes against one rulebook.
///
/// A build never mutates the rulebook and never returns anything that
/// aliases it: the baseline is deep-cloned up front and overlay data is
/// cloned in as it merges. Repeated builds for the same query are
/// value-equal, which is what makes lock-free concurrent callers safe.
///
/// # Examples
///
/// ```
/// use commis_core::Query;
/// use commis_engine::RecipeBuilder;
/// use commis_store::Rulebook;
///
/// let rulebook = Rulebook::embedded().unwrap();
/// let recipe = RecipeBuilder::new(&rulebook).build(&Query::any().with_intent("training"));
/// assert_eq!(recipe.matched_rules, vec!["intent=training"]);
/// ```
#[derive(Debug)]
pub struct RecipeBuilder<'a> {
    rulebook: &'a Rulebook,
    keep_context: bool,
}

impl<'a> RecipeBuilder<'a> {
    pub fn new(rulebook: &'a Rulebook) -> Self {
        RecipeBuilder {
            rulebook,
            keep_context: false,
        }
    }

    /// Keeps subtype context maps in the built recipe. By default they are
    /// stripped once, at the end of the build.
    pub fn with_context(mut self, keep_context: bool) -> Self {
        self.keep_context = keep_context;
        self
    }

    /// Builds the recipe for `query`.
    ///
    /// Walks overlays in rulebook order; each overlay whose key accepts the
    /// query has its measurements merged in and its rendered key appended to
    /// `matched_rules`. Later overlays overwrite earlier ones value-for-value
    /// within a subtype.
    pub fn build(&self, query: &Query) -> Recipe {
        let mut measurements: Vec<Measurement> = self.rulebook.base.clone();
        let mut index: HashMap<MeasurementType, usize> = measurements
            .iter()
            .enumerate()
            .map(|(at, m)| (m.kind, at))
            .collect();

        let mut matched_rules = Vec::new();
        for overlay in &self.rulebook.overlays {
            if !overlay.key.accepts(query) {
                continue;
            }
            debug!(rule = %overlay.key, "overlay matched");
            for contributed in &overlay.types {
                match index.get(&contributed.kind) {
                    Some(&at) => merge_into(&mut measurements[at], contributed),
                    None => {
                        // Register so later overlays in the same pass can
                        // target the appended measurement.
                        measurements.push(contributed.clone());
                        index.insert(contributed.kind, measurements.len() - 1);
                    }
                }
            }
            matched_rules.push(overlay.key.to_string());
        }

        if !self.keep_context {
            strip_context(&mut measurements);
        }

        let mut recipe = Recipe::new(query.clone());
        recipe.matched_rules = matched_rules;
        recipe.measurements = measurements;
        recipe
    }
}

/// Merges one overlay measurement into the same-kind target.
///
/// Same-named subtypes union their `data` maps with the overlay winning on
/// key collision; `context` maps union-merge the same way, independently.
/// Subtypes the target does not have yet are appended whole.
fn merge_into(target: &mut Measurement, contributed: &Measurement) {
    for subtype in &contributed.subtypes {
        match target.subtype_mut(&subtype.name) {
            Some(existing) => {
                for (key, value) in &subtype.data {
                    existing.data.insert(key.clone(), value.clone());
                }
                if let Some(context) = &subtype.context {
                    if !context.is_empty() {
                        let merged = existing.context.get_or_insert_with(BTreeMap::new);
                        for (key, value) in context {
                            merged.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            None => target.subtypes.push(subtype.clone()),
        }
    }
}

fn strip_context(measurements: &mut [Measurement]) {
    for measurement in measurements {
        for subtype in &mut measurement.subtypes {
            subtype.context = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use commis_core::{Reading, Subtype};
    use commis_store::Overlay;

    use super::*;

    fn rulebook() -> Rulebook {
        Rulebook {
            base: vec![Measurement::new(MeasurementType::K8s).with_subtype(
                Subtype::new("config")
                    .with_entry("mode", "basic")
                    .with_entry("max_pods", 110),
            )],
            overlays: vec![
                Overlay {
                    key: Query::any().with_intent("training"),
                    types: vec![
                        Measurement::new(MeasurementType::K8s).with_subtype(
                            Subtype::new("config")
                                .with_entry("mode", "training")
                                .with_context("source", "intent=training overlay"),
                        ),
                        Measurement::new(MeasurementType::Sysctl).with_subtype(
                            Subtype::new("defaults").with_entry("net.core.rmem_max", 134217728),
                        ),
                    ],
                },
                Overlay {
                    key: Query::any().with_accelerator("nvidia"),
                    types: vec![Measurement::new(MeasurementType::Sysctl).with_subtype(
                        Subtype::new("defaults").with_entry("net.core.rmem_max", 268435456),
                    )],
                },
            ],
        }
    }

    fn reading<'r>(recipe: &'r Recipe, kind: MeasurementType, subtype: &str, key: &str) -> &'r Reading {
        recipe
            .measurement(kind)
            .unwrap()
            .subtype(subtype)
            .unwrap()
            .get(key)
            .unwrap()
    }

    #[test]
    fn test_no_match_returns_baseline() {
        let rulebook = rulebook();
        let recipe = RecipeBuilder::new(&rulebook).build(&Query::any().with_os("ubuntu"));

        assert!(recipe.matched_rules.is_empty());
        assert_eq!(recipe.measurements.len(), 1);
        assert_eq!(
            reading(&recipe, MeasurementType::K8s, "config", "mode"),
            &Reading::from("basic")
        );
    }

    #[test]
    fn test_overlay_wins_on_collision() {
        let rulebook = rulebook();
        let recipe = RecipeBuilder::new(&rulebook).build(&Query::any().with_intent("training"));

        assert_eq!(recipe.matched_rules, vec!["intent=training"]);
        assert_eq!(
            reading(&recipe, MeasurementType::K8s, "config", "mode"),
            &Reading::from("training")
        );
        // Untouched baseline entries survive the merge.
        assert_eq!(
            reading(&recipe, MeasurementType::K8s, "config", "max_pods"),
            &Reading::from(110)
        );
    }

    #[test]
    fn test_later_overlay_beats_earlier() {
        let rulebook = rulebook();
        let query = Query::any().with_intent("training").with_accelerator("nvidia");
        let recipe = RecipeBuilder::new(&rulebook).build(&query);

        assert_eq!(
            recipe.matched_rules,
            vec!["intent=training", "accelerator=nvidia"]
        );
        assert_eq!(
            reading(&recipe, MeasurementType::Sysctl, "defaults", "net.core.rmem_max"),
            &Reading::from(268435456)
        );
    }

    #[test]
    fn test_new_measurement_registered_for_later_overlays() {
        // The first overlay introduces Sysctl; the second must merge into it
        // rather than append a duplicate.
        let rulebook = rulebook();
        let query = Query::any().with_intent("training").with_accelerator("nvidia");
        let recipe = RecipeBuilder::new(&rulebook).build(&query);

        let sysctl: Vec<_> = recipe
            .measurements
            .iter()
            .filter(|m| m.kind == MeasurementType::Sysctl)
            .collect();
        assert_eq!(sysctl.len(), 1);
        assert_eq!(sysctl[0].subtypes.len(), 1);
    }

    #[test]
    fn test_context_stripped_by_default() {
        let rulebook = rulebook();
        let recipe = RecipeBuilder::new(&rulebook).build(&Query::any().with_intent("training"));

        for measurement in &recipe.measurements {
            for subtype in &measurement.subtypes {
                assert!(subtype.context.is_none());
            }
        }
    }

    #[test]
    fn test_context_kept_and_merged_on_request() {
        let rulebook = rulebook();
        let recipe = RecipeBuilder::new(&rulebook)
            .with_context(true)
            .build(&Query::any().with_intent("training"));

        let context = recipe
            .measurement(MeasurementType::K8s)
            .unwrap()
            .subtype("config")
            .unwrap()
            .context
            .as_ref()
            .unwrap();
        assert_eq!(
            context.get("source").map(String::as_str),
            Some("intent=training overlay")
        );
    }

    #[test]
    fn test_build_does_not_touch_the_rulebook() {
        let rulebook = rulebook();
        let pristine = rulebook.clone();

        let mut recipe = RecipeBuilder::new(&rulebook).build(&Query::any().with_intent("training"));
        recipe
            .measurements[0]
            .subtype_mut("config")
            .unwrap()
            .data
            .insert("mode".into(), Reading::from("mutated"));

        assert_eq!(rulebook, pristine);
    }

    #[test]
    fn test_repeated_builds_are_value_equal() {
        let rulebook = rulebook();
        let builder = RecipeBuilder::new(&rulebook);
        let query = Query::any().with_intent("training");

        let first = builder.build(&query);
        let second = builder.build(&query);
        assert_eq!(first.measurements, second.measurements);
        assert_eq!(first.matched_rules, second.matched_rules);
        assert_eq!(first.request, second.request);
    }
}
