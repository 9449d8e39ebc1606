//! Criteria detection: inferring query dimensions from a raw snapshot.
//!
//! Detection runs a ranked list of rules, each tying one snapshot path and
//! one value pattern to one criteria field — a fixed canonical value for the
//! enum dimensions, a capture of the extracted text for the version ones.
//! Rules for authoritative signals (an explicit provider field) carry lower
//! ranks than looser ones (a substring in a version string), and the first
//! rule to set a field wins — later matches for the same field never
//! override.

use tracing::debug;

use commis_core::{
    Accelerator, ConstraintPath, Criteria, Intent, MeasurementType, OsFamily, Provider, Snapshot,
    Version,
};

use crate::extract::extract_value;

/// How a rule tests the value extracted at its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePattern {
    /// Any non-empty value; used by rules that capture the text itself.
    Any,
    /// Full case-insensitive equality.
    Equals(String),
    /// Case-insensitive substring containment.
    Contains(String),
}

impl ValuePattern {
    /// Parses the textual pattern form used in rule definitions:
    /// `*` for any value, `contains:needle` for containment, anything else
    /// for equality.
    pub fn from_spec(spec: &str) -> Self {
        if spec == "*" {
            return ValuePattern::Any;
        }
        match spec.strip_prefix("contains:") {
            Some(needle) => ValuePattern::Contains(needle.to_string()),
            None => ValuePattern::Equals(spec.to_string()),
        }
    }

    /// Tests the pattern against an extracted value.
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            ValuePattern::Any => !actual.trim().is_empty(),
            ValuePattern::Equals(expected) => actual.trim().eq_ignore_ascii_case(expected),
            ValuePattern::Contains(needle) => actual
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
        }
    }
}

/// The criteria field a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriteriaField {
    Os,
    OsVersion,
    Kernel,
    Service,
    K8sVersion,
    Accelerator,
    Intent,
}

impl CriteriaField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriteriaField::Os => "os",
            CriteriaField::OsVersion => "os_version",
            CriteriaField::Kernel => "kernel",
            CriteriaField::Service => "service",
            CriteriaField::K8sVersion => "k8s_version",
            CriteriaField::Accelerator => "accelerator",
            CriteriaField::Intent => "intent",
        }
    }
}

impl std::fmt::Display for CriteriaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a matching rule writes into the criteria.
///
/// One variant per detectable criteria dimension, so a rule can only ever
/// write the field its output belongs to. Enum dimensions carry their fixed
/// canonical value; the version dimensions capture the extracted text
/// instead, since release strings have no closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detected {
    Os(OsFamily),
    Service(Provider),
    Accelerator(Accelerator),
    Intent(Intent),
    /// Captures the trimmed extracted text as the OS release.
    OsVersion,
    /// Captures the trimmed extracted text as the kernel release.
    Kernel,
    /// Captures the release series (`major.minor`) of the extracted text,
    /// or the trimmed text itself when it is not version-shaped.
    K8sVersion,
}

impl Detected {
    /// The field this output writes.
    pub fn field(&self) -> CriteriaField {
        match self {
            Detected::Os(_) => CriteriaField::Os,
            Detected::Service(_) => CriteriaField::Service,
            Detected::Accelerator(_) => CriteriaField::Accelerator,
            Detected::Intent(_) => CriteriaField::Intent,
            Detected::OsVersion => CriteriaField::OsVersion,
            Detected::Kernel => CriteriaField::Kernel,
            Detected::K8sVersion => CriteriaField::K8sVersion,
        }
    }

    /// Writes the target field if it is still unset, returning the value
    /// recorded; `None` when an earlier rule already set the field.
    fn apply(&self, criteria: &mut Criteria, raw: &str) -> Option<String> {
        match self {
            Detected::Os(v) => set_if_unset(&mut criteria.os, *v).then(|| v.as_str().to_string()),
            Detected::Service(v) => {
                set_if_unset(&mut criteria.service, *v).then(|| v.as_str().to_string())
            }
            Detected::Accelerator(v) => {
                set_if_unset(&mut criteria.accelerator, *v).then(|| v.as_str().to_string())
            }
            Detected::Intent(v) => {
                set_if_unset(&mut criteria.intent, *v).then(|| v.as_str().to_string())
            }
            Detected::OsVersion => set_text(&mut criteria.os_version, raw.trim().to_string()),
            Detected::Kernel => set_text(&mut criteria.kernel, raw.trim().to_string()),
            Detected::K8sVersion => set_text(&mut criteria.k8s_version, version_series(raw)),
        }
    }
}

fn set_if_unset<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_none() {
        *slot = Some(value);
        true
    } else {
        false
    }
}

fn set_text(slot: &mut Option<String>, value: String) -> Option<String> {
    if slot.is_none() {
        *slot = Some(value.clone());
        Some(value)
    } else {
        None
    }
}

/// The `major.minor` series of a version-shaped value, or the trimmed text
/// itself when it does not parse.
fn version_series(raw: &str) -> String {
    match raw.trim().parse::<Version>() {
        Ok(version) => format!("{}.{}", version.major(), version.minor()),
        Err(_) => raw.trim().to_string(),
    }
}

/// One detection rule: where to look, what to match, what that implies.
#[derive(Debug, Clone)]
pub struct DetectionRule {
    /// Rank; lower runs earlier. Ordering between rules for the same field
    /// is load-bearing, so ranks are explicit rather than implied by list
    /// position.
    pub priority: u32,
    /// Snapshot location to inspect.
    pub path: ConstraintPath,
    pub pattern: ValuePattern,
    pub output: Detected,
    /// Human-readable description of the signal, recorded as provenance.
    pub source: &'static str,
}

impl DetectionRule {
    pub fn new(
        priority: u32,
        path: ConstraintPath,
        pattern: ValuePattern,
        output: Detected,
        source: &'static str,
    ) -> Self {
        DetectionRule {
            priority,
            path,
            pattern,
            output,
            source,
        }
    }
}

/// Where one detected criteria value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub field: CriteriaField,
    /// Canonical detected value.
    pub value: String,
    /// Description of the signal that matched.
    pub source: String,
    /// The raw extracted string, which may differ from the canonical value
    /// (a full version string vs. a provider tag, say).
    pub raw: String,
}

/// Provenance records for every field that was detected, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionReport {
    pub provenance: Vec<Provenance>,
}

impl DetectionReport {
    /// The provenance record for one field, if that field was detected.
    pub fn for_field(&self, field: CriteriaField) -> Option<&Provenance> {
        self.provenance.iter().find(|p| p.field == field)
    }
}

/// Infers [`Criteria`] from a snapshot by running ranked detection rules.
///
/// # Examples
///
/// ```
/// use commis_core::{Measurement, MeasurementType, Provider, Snapshot, Subtype};
/// use commis_engine::Detector;
///
/// let snapshot = Snapshot::new().with_measurement(
///     Measurement::new(MeasurementType::K8s)
///         .with_subtype(Subtype::new("server").with_entry("version", "v1.33.5-eks-3025e55")),
/// );
///
/// let (criteria, report) = Detector::new().detect(&snapshot);
/// assert_eq!(criteria.service, Some(Provider::Eks));
/// assert_eq!(report.provenance[0].raw, "v1.33.5-eks-3025e55");
/// ```
#[derive(Debug, Clone)]
pub struct Detector {
    rules: Vec<DetectionRule>,
}

impl Detector {
    /// A detector with the built-in rule list.
    pub fn new() -> Self {
        Detector::with_rules(default_rules())
    }

    /// A detector over a custom rule list. Rules are sorted by rank once,
    /// here, so callers may hand them over in any order.
    pub fn with_rules(mut rules: Vec<DetectionRule>) -> Self {
        rules.sort_by_key(|rule| rule.priority);
        Detector { rules }
    }

    /// The rule list in evaluation order.
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    /// Runs every rule in rank order against the snapshot.
    ///
    /// The returned criteria is best-effort: fields stay `None` when nothing
    /// matched for them. A rule whose path is absent from the snapshot is
    /// skipped silently. The first rule to set a field also records its
    /// [`Provenance`]; later matching rules for that field do nothing.
    pub fn detect(&self, snapshot: &Snapshot) -> (Criteria, DetectionReport) {
        let mut criteria = Criteria::none();
        let mut report = DetectionReport::default();

        for rule in &self.rules {
            let Ok(actual) = extract_value(&rule.path, snapshot) else {
                continue;
            };
            if !rule.pattern.matches(&actual) {
                continue;
            }
            if let Some(value) = rule.output.apply(&mut criteria, &actual) {
                debug!(
                    field = %rule.output.field(),
                    value = %value,
                    source = rule.source,
                    "criteria detected"
                );
                report.provenance.push(Provenance {
                    field: rule.output.field(),
                    value,
                    source: rule.source.to_string(),
                    raw: actual,
                });
            }
        }

        (criteria, report)
    }
}

impl Default for Detector {
    fn default() -> Self {
        Detector::new()
    }
}

/// The built-in rules.
///
/// Rank bands group rules by signal: 10s the os-release file (family, then
/// release) and the kernel, 20s provider from the explicit cluster field,
/// 30s the server version string (provider substrings, then the
/// release-series capture), 40s accelerator, 50s intent. The 20s outrank
/// the 30s so the explicit field beats the substring signal when both are
/// present.
fn default_rules() -> Vec<DetectionRule> {
    let os_release = || ConstraintPath::new(MeasurementType::Os, "release", "ID");
    let os_version = || ConstraintPath::new(MeasurementType::Os, "release", "VERSION_ID");
    let kernel_release = || ConstraintPath::new(MeasurementType::Kernel, "release", "version");
    let provider_field = || ConstraintPath::new(MeasurementType::K8s, "cluster", "provider");
    let server_version = || ConstraintPath::new(MeasurementType::K8s, "server", "version");
    let gpu_vendor = || ConstraintPath::new(MeasurementType::Gpu, "device", "vendor");
    let workload = || ConstraintPath::new(MeasurementType::K8s, "cluster", "workload");

    vec![
        DetectionRule::new(
            10,
            os_release(),
            ValuePattern::from_spec("ubuntu"),
            Detected::Os(OsFamily::Ubuntu),
            "os-release ID",
        ),
        DetectionRule::new(
            11,
            os_release(),
            ValuePattern::from_spec("rhel"),
            Detected::Os(OsFamily::Rhel),
            "os-release ID",
        ),
        DetectionRule::new(
            12,
            os_release(),
            ValuePattern::from_spec("amzn"),
            Detected::Os(OsFamily::AmazonLinux),
            "os-release ID",
        ),
        DetectionRule::new(
            13,
            os_version(),
            ValuePattern::from_spec("*"),
            Detected::OsVersion,
            "os-release VERSION_ID",
        ),
        DetectionRule::new(
            14,
            kernel_release(),
            ValuePattern::from_spec("*"),
            Detected::Kernel,
            "kernel release",
        ),
        DetectionRule::new(
            20,
            provider_field(),
            ValuePattern::from_spec("eks"),
            Detected::Service(Provider::Eks),
            "cluster provider field",
        ),
        DetectionRule::new(
            21,
            provider_field(),
            ValuePattern::from_spec("aks"),
            Detected::Service(Provider::Aks),
            "cluster provider field",
        ),
        DetectionRule::new(
            22,
            provider_field(),
            ValuePattern::from_spec("gke"),
            Detected::Service(Provider::Gke),
            "cluster provider field",
        ),
        DetectionRule::new(
            30,
            server_version(),
            ValuePattern::from_spec("contains:eks"),
            Detected::Service(Provider::Eks),
            "server version substring",
        ),
        DetectionRule::new(
            31,
            server_version(),
            ValuePattern::from_spec("contains:aks"),
            Detected::Service(Provider::Aks),
            "server version substring",
        ),
        DetectionRule::new(
            32,
            server_version(),
            ValuePattern::from_spec("contains:gke"),
            Detected::Service(Provider::Gke),
            "server version substring",
        ),
        DetectionRule::new(
            33,
            server_version(),
            ValuePattern::from_spec("*"),
            Detected::K8sVersion,
            "server version",
        ),
        DetectionRule::new(
            40,
            gpu_vendor(),
            ValuePattern::from_spec("contains:nvidia"),
            Detected::Accelerator(Accelerator::Nvidia),
            "GPU vendor",
        ),
        DetectionRule::new(
            41,
            gpu_vendor(),
            ValuePattern::from_spec("contains:amd"),
            Detected::Accelerator(Accelerator::Amd),
            "GPU vendor",
        ),
        DetectionRule::new(
            50,
            workload(),
            ValuePattern::from_spec("training"),
            Detected::Intent(Intent::Training),
            "cluster workload label",
        ),
        DetectionRule::new(
            51,
            workload(),
            ValuePattern::from_spec("inference"),
            Detected::Intent(Intent::Inference),
            "cluster workload label",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use commis_core::{Measurement, Subtype};

    use super::*;

    #[test]
    fn test_pattern_spec_forms() {
        assert_eq!(
            ValuePattern::from_spec("contains:eks"),
            ValuePattern::Contains("eks".to_string())
        );
        assert_eq!(
            ValuePattern::from_spec("ubuntu"),
            ValuePattern::Equals("ubuntu".to_string())
        );
        assert_eq!(ValuePattern::from_spec("*"), ValuePattern::Any);
    }

    #[test]
    fn test_any_pattern_requires_a_value() {
        assert!(ValuePattern::Any.matches("v1.33.5-eks-3025e55"));
        assert!(!ValuePattern::Any.matches("   "));
    }

    #[test]
    fn test_release_series_normalization() {
        assert_eq!(version_series("v1.33.5-eks-3025e55"), "1.33");
        assert_eq!(version_series(" 1.29.7 "), "1.29");
        assert_eq!(version_series("latest"), "latest");
    }

    #[test]
    fn test_pattern_matching_ignores_case() {
        assert!(ValuePattern::from_spec("ubuntu").matches("Ubuntu"));
        assert!(!ValuePattern::from_spec("ubuntu").matches("ubuntu 22.04"));
        assert!(ValuePattern::from_spec("contains:eks").matches("v1.33.5-EKS-3025e55"));
        assert!(!ValuePattern::from_spec("contains:eks").matches("v1.33.5-gke-a1b2"));
    }

    #[test]
    fn test_empty_snapshot_detects_nothing() {
        let (criteria, report) = Detector::new().detect(&Snapshot::new());
        assert!(criteria.is_empty());
        assert!(report.provenance.is_empty());
    }

    #[test]
    fn test_explicit_provider_field_beats_version_substring() {
        let snapshot = Snapshot::new().with_measurement(
            Measurement::new(MeasurementType::K8s)
                .with_subtype(Subtype::new("cluster").with_entry("provider", "eks"))
                .with_subtype(Subtype::new("server").with_entry("version", "v1.33.5-gke-a1b2")),
        );

        let (criteria, report) = Detector::new().detect(&snapshot);
        assert_eq!(criteria.service, Some(Provider::Eks));

        let provenance = report.for_field(CriteriaField::Service).unwrap();
        assert_eq!(provenance.source, "cluster provider field");
        assert_eq!(provenance.raw, "eks");
        // Only one provenance record per field, from the winning rule.
        let service_records = report
            .provenance
            .iter()
            .filter(|p| p.field == CriteriaField::Service)
            .count();
        assert_eq!(service_records, 1);
    }

    #[test]
    fn test_version_substring_used_when_no_provider_field() {
        let snapshot = Snapshot::new().with_measurement(
            Measurement::new(MeasurementType::K8s)
                .with_subtype(Subtype::new("server").with_entry("version", "v1.33.5-eks-3025e55")),
        );

        let (criteria, report) = Detector::new().detect(&snapshot);
        assert_eq!(criteria.service, Some(Provider::Eks));

        let provenance = report.for_field(CriteriaField::Service).unwrap();
        assert_eq!(provenance.value, "eks");
        assert_eq!(provenance.raw, "v1.33.5-eks-3025e55");
        assert_eq!(provenance.source, "server version substring");
    }

    #[test]
    fn test_full_detection() {
        let snapshot = Snapshot::new()
            .with_measurement(
                Measurement::new(MeasurementType::Os)
                    .with_subtype(Subtype::new("release").with_entry("ID", "ubuntu")),
            )
            .with_measurement(
                Measurement::new(MeasurementType::K8s)
                    .with_subtype(
                        Subtype::new("cluster")
                            .with_entry("provider", "eks")
                            .with_entry("workload", "training"),
                    )
                    .with_subtype(
                        Subtype::new("server").with_entry("version", "v1.33.5-eks-3025e55"),
                    ),
            )
            .with_measurement(
                Measurement::new(MeasurementType::Gpu).with_subtype(
                    Subtype::new("device").with_entry("vendor", "NVIDIA Corporation"),
                ),
            );

        let (criteria, report) = Detector::new().detect(&snapshot);
        assert_eq!(criteria.os, Some(OsFamily::Ubuntu));
        assert_eq!(criteria.service, Some(Provider::Eks));
        assert_eq!(criteria.accelerator, Some(Accelerator::Nvidia));
        assert_eq!(criteria.intent, Some(Intent::Training));
        assert_eq!(criteria.k8s_version.as_deref(), Some("1.33"));
        // No VERSION_ID or kernel measurement in this snapshot.
        assert_eq!(criteria.os_version, None);
        assert_eq!(criteria.kernel, None);
        assert_eq!(criteria.nodes, None);
        assert_eq!(report.provenance.len(), 5);
    }

    #[test]
    fn test_version_dimensions_captured() {
        let snapshot = Snapshot::new()
            .with_measurement(
                Measurement::new(MeasurementType::Os).with_subtype(
                    Subtype::new("release")
                        .with_entry("ID", "ubuntu")
                        .with_entry("VERSION_ID", "22.04"),
                ),
            )
            .with_measurement(
                Measurement::new(MeasurementType::Kernel)
                    .with_subtype(Subtype::new("release").with_entry("version", "6.8.0-1021-aws")),
            )
            .with_measurement(
                Measurement::new(MeasurementType::K8s)
                    .with_subtype(
                        Subtype::new("server").with_entry("version", "v1.33.5-eks-3025e55"),
                    ),
            );

        let (criteria, report) = Detector::new().detect(&snapshot);
        assert_eq!(criteria.os_version.as_deref(), Some("22.04"));
        assert_eq!(criteria.kernel.as_deref(), Some("6.8.0-1021-aws"));
        // Captured as the release series, not the raw vendor-suffixed string.
        assert_eq!(criteria.k8s_version.as_deref(), Some("1.33"));

        let provenance = report.for_field(CriteriaField::K8sVersion).unwrap();
        assert_eq!(provenance.value, "1.33");
        assert_eq!(provenance.raw, "v1.33.5-eks-3025e55");
        assert_eq!(provenance.source, "server version");
    }

    #[test]
    fn test_custom_rules_sorted_by_rank() {
        let rules = vec![
            DetectionRule::new(
                30,
                ConstraintPath::new(MeasurementType::K8s, "server", "version"),
                ValuePattern::from_spec("contains:eks"),
                Detected::Service(Provider::Eks),
                "late",
            ),
            DetectionRule::new(
                5,
                ConstraintPath::new(MeasurementType::Os, "release", "ID"),
                ValuePattern::from_spec("ubuntu"),
                Detected::Os(OsFamily::Ubuntu),
                "early",
            ),
        ];

        let detector = Detector::with_rules(rules);
        assert_eq!(detector.rules()[0].priority, 5);
        assert_eq!(detector.rules()[1].priority, 30);
    }
}
