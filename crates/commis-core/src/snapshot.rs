//! Snapshots: measurements captured from a live system.

use crate::header::Header;
use crate::measurement::{find_measurement, Measurement, MeasurementType};

/// Schema identifier written into snapshot headers.
pub const SNAPSHOT_SCHEMA: &str = "commis.snapshot.v1";

/// A point-in-time collection of measurements from a real system.
///
/// Snapshots are produced by the collector subsystem and treated as read-only
/// here: detection and validation only ever look values up.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub header: Header,
    #[cfg_attr(feature = "serde", serde(default))]
    pub measurements: Vec<Measurement>,
}

impl Snapshot {
    /// Creates an empty snapshot with a fresh header.
    pub fn new() -> Self {
        Snapshot {
            header: Header::new(SNAPSHOT_SCHEMA),
            measurements: Vec::new(),
        }
    }

    /// Appends a measurement.
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurements.push(measurement);
        self
    }

    /// Looks up the measurement of the given kind.
    pub fn measurement(&self, kind: MeasurementType) -> Option<&Measurement> {
        find_measurement(&self.measurements, kind)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::new()
    }
}
