//! End-to-end recommendation flows against the embedded rulebook.

use commis::prelude::*;
use commis_test::snapshots::{eks_training_snapshot, rhel_inference_snapshot};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_training_intent_gets_training_profile() {
    init_tracing();
    let recipe = commis::recommend(&Query::any().with_intent("training")).unwrap();

    assert_eq!(recipe.matched_rules, vec!["intent=training"]);

    let config = recipe
        .measurement(MeasurementType::K8s)
        .unwrap()
        .subtype("config")
        .unwrap();
    assert_eq!(config.get("mode"), Some(&Reading::from("training")));
    assert_eq!(config.get("max_pods"), Some(&Reading::from(110)));

    let sysctl = recipe
        .measurement(MeasurementType::Sysctl)
        .unwrap()
        .subtype("defaults")
        .unwrap();
    assert_eq!(
        sysctl.get("net.core.rmem_max"),
        Some(&Reading::from(134217728))
    );
}

#[test]
fn test_full_training_stack_layers_in_order() {
    init_tracing();
    let query = Query::any()
        .with_intent("training")
        .with_accelerator("nvidia")
        .with_service("eks");
    let recipe = commis::recommend(&query).unwrap();

    assert_eq!(
        recipe.matched_rules,
        vec![
            "intent=training",
            "accelerator=nvidia",
            "service=eks",
            "accelerator=nvidia,intent=training",
        ]
    );

    // The combined overlay is declared last, so its buffer sizes win.
    let sysctl = recipe
        .measurement(MeasurementType::Sysctl)
        .unwrap()
        .subtype("defaults")
        .unwrap();
    assert_eq!(
        sysctl.get("net.core.rmem_max"),
        Some(&Reading::from(268435456))
    );

    // Contributions from each matched overlay.
    let gpu = recipe.measurement(MeasurementType::Gpu).unwrap();
    assert_eq!(
        gpu.subtype("driver").unwrap().get("min_version"),
        Some(&Reading::from("535"))
    );
    let server = recipe
        .measurement(MeasurementType::K8s)
        .unwrap()
        .subtype("server")
        .unwrap();
    assert_eq!(server.get("min_version"), Some(&Reading::from("1.30")));
    let modules = recipe
        .measurement(MeasurementType::Kmod)
        .unwrap()
        .subtype("modules")
        .unwrap();
    assert_eq!(modules.get("nvidia_peermem"), Some(&Reading::from(true)));
}

#[test]
fn test_wildcard_query_gets_baseline_only() {
    init_tracing();
    let recipe = commis::recommend(&Query::any()).unwrap();

    assert!(recipe.matched_rules.is_empty());
    let config = recipe
        .measurement(MeasurementType::K8s)
        .unwrap()
        .subtype("config")
        .unwrap();
    assert_eq!(config.get("mode"), Some(&Reading::from("basic")));
}

#[test]
fn test_context_stripped_unless_requested() {
    init_tracing();
    let query = Query::any().with_intent("training").with_service("eks");

    let stripped = commis::recommend(&query).unwrap();
    for measurement in &stripped.measurements {
        for subtype in &measurement.subtypes {
            assert!(subtype.context.is_none());
        }
    }

    let rulebook = Rulebook::embedded().unwrap();
    let kept = RecipeBuilder::new(&rulebook).with_context(true).build(&query);
    let server_context = kept
        .measurement(MeasurementType::K8s)
        .unwrap()
        .subtype("server")
        .unwrap()
        .context
        .as_ref()
        .unwrap();
    assert_eq!(
        server_context.get("source").map(String::as_str),
        Some("service=eks overlay")
    );
}

#[test]
fn test_snapshot_driven_recommendation() {
    init_tracing();
    let snapshot = eks_training_snapshot();
    let (recipe, report) = commis::recommend_for_snapshot(&snapshot).unwrap();

    assert_eq!(
        recipe.matched_rules,
        vec![
            "intent=training",
            "accelerator=nvidia",
            "service=eks",
            "accelerator=nvidia,intent=training",
        ]
    );

    // Every detectable field, and the explicit provider field outranked the
    // version-string substring for the service.
    assert_eq!(report.provenance.len(), 7);
    let service = report
        .provenance
        .iter()
        .find(|p| p.value == "eks")
        .unwrap();
    assert_eq!(service.source, "cluster provider field");
}

#[test]
fn test_undetectable_environment_gets_baseline() {
    init_tracing();
    let (recipe, report) = commis::recommend_for_snapshot(&rhel_inference_snapshot()).unwrap();

    // rhel/amd/inference match none of the embedded overlays.
    assert!(recipe.matched_rules.is_empty());
    assert_eq!(report.provenance.len(), 5);
    let config = recipe
        .measurement(MeasurementType::K8s)
        .unwrap()
        .subtype("config")
        .unwrap();
    assert_eq!(config.get("mode"), Some(&Reading::from("basic")));
}

#[test]
fn test_recipe_round_trips_through_yaml() {
    init_tracing();
    let recipe = commis::recommend(&Query::any().with_intent("training"))
        .unwrap()
        .with_constraint(Constraint::new("K8s.server.version", ">= 1.30"));

    let yaml = serde_yaml::to_string(&recipe).unwrap();
    let parsed: Recipe = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, recipe);
}
