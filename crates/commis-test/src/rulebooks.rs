//! Small rulebooks exercising overlay precedence and context merging.

use commis_store::Rulebook;

/// Three overlays over a one-measurement baseline. The combined overlay
/// comes last so it overrides the single-dimension ones value-for-value.
pub const LAYERED_RULEBOOK: &str = r#"
base:
  - kind: K8s
    subtypes:
      - name: config
        data:
          mode: basic
          max_pods: 110
      - name: server
        data:
          min_version: "1.28"

overlays:
  - key:
      intent: training
    types:
      - kind: K8s
        subtypes:
          - name: config
            data:
              mode: training
            context:
              source: "intent=training overlay"
  - key:
      accelerator: nvidia
    types:
      - kind: Kmod
        subtypes:
          - name: modules
            data:
              nvidia_peermem: true
  - key:
      intent: training
      accelerator: nvidia
    types:
      - kind: K8s
        subtypes:
          - name: config
            data:
              mode: training-nccl
"#;

/// Parses [`LAYERED_RULEBOOK`].
pub fn layered_rulebook() -> Rulebook {
    Rulebook::from_yaml_str(LAYERED_RULEBOOK).expect("fixture rulebook parses")
}
