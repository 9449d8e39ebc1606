//! Validation reports: per-constraint verdicts and the overall rollup.

use std::fmt;

use crate::header::Header;

/// Schema identifier written into validation result headers.
pub const VALIDATION_SCHEMA: &str = "commis.validation.v1";

/// Verdict for one constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConstraintStatus {
    /// The expression held for the extracted value.
    Passed,
    /// The expression did not hold, or could not be evaluated.
    Failed,
    /// The constraint could not be checked (bad path, bad expression, or
    /// value absent from the snapshot).
    Skipped,
}

impl ConstraintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintStatus::Passed => "passed",
            ConstraintStatus::Failed => "failed",
            ConstraintStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ConstraintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rollup over all constraint verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OverallStatus {
    /// Every constraint passed.
    Pass,
    /// At least one constraint failed.
    Fail,
    /// Nothing failed, but at least one constraint was skipped.
    Partial,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Pass => "pass",
            OverallStatus::Fail => "fail",
            OverallStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one constraint against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintValidation {
    /// Constraint path text, as the recipe declared it.
    pub name: String,
    /// Expression text the constraint declared.
    pub expected: String,
    /// The value extracted from the snapshot, when extraction got that far.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub actual: Option<String>,
    pub status: ConstraintStatus,
    /// Human-readable explanation for failed and skipped verdicts.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "String::is_empty")
    )]
    pub message: String,
}

impl ConstraintValidation {
    /// A passed verdict.
    pub fn passed(name: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ConstraintValidation {
            name: name.into(),
            expected: expected.into(),
            actual: Some(actual.into()),
            status: ConstraintStatus::Passed,
            message: String::new(),
        }
    }

    /// A failed verdict with an explanation.
    pub fn failed(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConstraintValidation {
            name: name.into(),
            expected: expected.into(),
            actual: Some(actual.into()),
            status: ConstraintStatus::Failed,
            message: message.into(),
        }
    }

    /// A skipped verdict; `actual` is present only when extraction succeeded
    /// before the skip condition was hit.
    pub fn skipped(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        ConstraintValidation {
            name: name.into(),
            expected: expected.into(),
            actual,
            status: ConstraintStatus::Skipped,
            message: message.into(),
        }
    }
}

/// Counts plus the overall verdict for one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub status: OverallStatus,
    /// Wall-clock duration of the whole validation call, in milliseconds.
    pub duration_ms: u64,
}

impl ValidationSummary {
    /// Tallies per-status counts and derives the overall status: `Fail` if
    /// anything failed, else `Partial` if anything was skipped, else `Pass`.
    pub fn tally(results: &[ConstraintValidation], duration_ms: u64) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for result in results {
            match result.status {
                ConstraintStatus::Passed => passed += 1,
                ConstraintStatus::Failed => failed += 1,
                ConstraintStatus::Skipped => skipped += 1,
            }
        }
        let status = if failed > 0 {
            OverallStatus::Fail
        } else if skipped > 0 {
            OverallStatus::Partial
        } else {
            OverallStatus::Pass
        };
        ValidationSummary {
            total: results.len(),
            passed,
            failed,
            skipped,
            status,
            duration_ms,
        }
    }
}

/// Full outcome of one `validate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    pub header: Header,
    #[cfg_attr(feature = "serde", serde(default))]
    pub results: Vec<ConstraintValidation>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    /// Assembles a result from per-constraint verdicts, tallying the summary.
    pub fn new(results: Vec<ConstraintValidation>, duration_ms: u64) -> Self {
        let summary = ValidationSummary::tally(&results, duration_ms);
        ValidationResult {
            header: Header::new(VALIDATION_SCHEMA),
            results,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollup_pass_when_all_pass() {
        let results = vec![
            ConstraintValidation::passed("a.b.c", "x", "x"),
            ConstraintValidation::passed("d.e.f", "y", "y"),
        ];
        let summary = ValidationSummary::tally(&results, 3);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.status, OverallStatus::Pass);
        assert_eq!(summary.duration_ms, 3);
    }

    #[test]
    fn test_rollup_fail_beats_partial() {
        let results = vec![
            ConstraintValidation::passed("a.b.c", "x", "x"),
            ConstraintValidation::skipped("d.e.f", "y", None, "value not found"),
            ConstraintValidation::failed("g.h.i", "z", "w", "expected z, got w"),
        ];
        let summary = ValidationSummary::tally(&results, 0);
        assert_eq!(
            (summary.passed, summary.failed, summary.skipped),
            (1, 1, 1)
        );
        assert_eq!(summary.status, OverallStatus::Fail);
    }

    #[test]
    fn test_rollup_partial_when_only_skips() {
        let results = vec![
            ConstraintValidation::passed("a.b.c", "x", "x"),
            ConstraintValidation::skipped("d.e.f", "y", None, "value not found"),
        ];
        let summary = ValidationSummary::tally(&results, 0);
        assert_eq!(summary.status, OverallStatus::Partial);
    }

    #[test]
    fn test_rollup_empty_is_pass() {
        let summary = ValidationSummary::tally(&[], 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.status, OverallStatus::Pass);
    }

    #[test]
    fn test_result_header_schema() {
        let result = ValidationResult::new(Vec::new(), 1);
        assert_eq!(result.header.schema, VALIDATION_SCHEMA);
        assert_eq!(result.summary.duration_ms, 1);
    }
}
