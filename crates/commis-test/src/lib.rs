//! Shared test fixtures for commis crates.
//!
//! This crate provides snapshot and rulebook fixtures for testing. It holds
//! data builders only — no assertions, no engine logic.
//!
//! - [`snapshots`] - Snapshots shaped like real collector output
//! - [`rulebooks`] - Small rulebooks exercising overlay precedence
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! commis-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use commis_test::snapshots::eks_training_snapshot;
//! use commis_test::rulebooks::layered_rulebook;
//! ```

pub mod rulebooks;
pub mod snapshots;

// Re-export commonly used fixtures at crate root for convenience
pub use rulebooks::{layered_rulebook, LAYERED_RULEBOOK};
pub use snapshots::{eks_training_snapshot, rhel_inference_snapshot};
