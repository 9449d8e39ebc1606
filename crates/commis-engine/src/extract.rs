//! Resolving a constraint path to the value a snapshot holds there.

use thiserror::Error;

use commis_core::{ConstraintPath, MeasurementType, Snapshot};

/// A path segment that led nowhere in the snapshot.
///
/// Absent values are a normal condition for both detection and validation —
/// callers treat this as "skip, don't fail" — but the message says which
/// segment was missing so skipped rows stay diagnosable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No measurement of the path's kind in the snapshot.
    #[error("measurement \"{kind}\" not found in snapshot")]
    MeasurementNotFound { kind: MeasurementType },
    /// The measurement exists but has no such subtype.
    #[error("subtype \"{subtype}\" not found under \"{kind}\"")]
    SubtypeNotFound {
        kind: MeasurementType,
        subtype: String,
    },
    /// The subtype exists but has no such key.
    #[error("key \"{key}\" not found under \"{kind}.{subtype}\"")]
    KeyNotFound {
        kind: MeasurementType,
        subtype: String,
        key: String,
    },
}

/// Extracts the value at `path`, rendered canonically as a string.
pub fn extract_value(path: &ConstraintPath, snapshot: &Snapshot) -> Result<String, ExtractError> {
    let measurement =
        snapshot
            .measurement(path.kind())
            .ok_or(ExtractError::MeasurementNotFound {
                kind: path.kind(),
            })?;
    let subtype = measurement
        .subtype(path.subtype())
        .ok_or_else(|| ExtractError::SubtypeNotFound {
            kind: path.kind(),
            subtype: path.subtype().to_string(),
        })?;
    let reading = subtype
        .get(path.key())
        .ok_or_else(|| ExtractError::KeyNotFound {
            kind: path.kind(),
            subtype: path.subtype().to_string(),
            key: path.key().to_string(),
        })?;
    Ok(reading.to_string())
}

#[cfg(test)]
mod tests {
    use commis_core::{Measurement, Subtype};

    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new().with_measurement(
            Measurement::new(MeasurementType::K8s).with_subtype(
                Subtype::new("server")
                    .with_entry("version", "v1.33.5-eks-3025e55")
                    .with_entry("nodes", 12),
            ),
        )
    }

    fn path(text: &str) -> ConstraintPath {
        text.parse().unwrap()
    }

    #[test]
    fn test_extracts_canonical_strings() {
        let snapshot = snapshot();
        assert_eq!(
            extract_value(&path("K8s.server.version"), &snapshot).unwrap(),
            "v1.33.5-eks-3025e55"
        );
        assert_eq!(
            extract_value(&path("K8s.server.nodes"), &snapshot).unwrap(),
            "12"
        );
    }

    #[test]
    fn test_missing_measurement() {
        let err = extract_value(&path("GPU.device.vendor"), &snapshot()).unwrap_err();
        assert_eq!(err.to_string(), "measurement \"GPU\" not found in snapshot");
    }

    #[test]
    fn test_missing_subtype() {
        let err = extract_value(&path("K8s.cluster.provider"), &snapshot()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "subtype \"cluster\" not found under \"K8s\""
        );
    }

    #[test]
    fn test_missing_key() {
        let err = extract_value(&path("K8s.server.endpoint"), &snapshot()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key \"endpoint\" not found under \"K8s.server\""
        );
    }
}
