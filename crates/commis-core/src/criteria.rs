//! Typed criteria: the detection-side counterpart of the free-form [`Query`].
//!
//! [`Criteria`] is what detection produces: environment dimensions with a
//! closed vocabulary are enums, version-like dimensions stay free text, and
//! every field is `None` for "not detected." Matching goes through
//! [`Criteria::to_query`], so both representations share one wildcard
//! semantics.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::query::{Dimension, Query};

/// Error for a token that names no known criterion value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownCriterion {
    kind: &'static str,
    value: String,
}

impl UnknownCriterion {
    fn new(kind: &'static str, value: &str) -> Self {
        UnknownCriterion {
            kind,
            value: value.to_string(),
        }
    }
}

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OsFamily {
    Ubuntu,
    Rhel,
    /// Amazon Linux, identified as `amzn` in os-release data.
    #[cfg_attr(feature = "serde", serde(rename = "amzn"))]
    AmazonLinux,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Ubuntu => "ubuntu",
            OsFamily::Rhel => "rhel",
            OsFamily::AmazonLinux => "amzn",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = UnknownCriterion;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "ubuntu" => Ok(OsFamily::Ubuntu),
            "rhel" => Ok(OsFamily::Rhel),
            "amzn" | "amazon" => Ok(OsFamily::AmazonLinux),
            _ => Err(UnknownCriterion::new("OS family", text)),
        }
    }
}

/// Managed Kubernetes service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Provider {
    Eks,
    Aks,
    Gke,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Eks => "eks",
            Provider::Aks => "aks",
            Provider::Gke => "gke",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = UnknownCriterion;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "eks" => Ok(Provider::Eks),
            "aks" => Ok(Provider::Aks),
            "gke" => Ok(Provider::Gke),
            _ => Err(UnknownCriterion::new("provider", text)),
        }
    }
}

/// Accelerator vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Accelerator {
    Nvidia,
    Amd,
}

impl Accelerator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accelerator::Nvidia => "nvidia",
            Accelerator::Amd => "amd",
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accelerator {
    type Err = UnknownCriterion;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "nvidia" => Ok(Accelerator::Nvidia),
            "amd" => Ok(Accelerator::Amd),
            _ => Err(UnknownCriterion::new("accelerator", text)),
        }
    }
}

/// Workload intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Intent {
    Training,
    Inference,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Training => "training",
            Intent::Inference => "inference",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = UnknownCriterion;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "training" => Ok(Intent::Training),
            "inference" => Ok(Intent::Inference),
            _ => Err(UnknownCriterion::new("intent", text)),
        }
    }
}

/// Typed environment description; `None` means "not detected."
///
/// The version dimensions are free text because release strings have no
/// closed vocabulary; they still match overlays by exact (trimmed,
/// case-insensitive) equality once bridged through [`Criteria::to_query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Criteria {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub os: Option<OsFamily>,
    /// OS release, free text (`"22.04"`, `"9.4"`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub os_version: Option<String>,
    /// Kernel release, free text (`"6.8.0-1021-aws"`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub kernel: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub service: Option<Provider>,
    /// Kubernetes release series, free text (`"1.33"`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub k8s_version: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub accelerator: Option<Accelerator>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub intent: Option<Intent>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub nodes: Option<u32>,
}

impl Criteria {
    /// Criteria with no field detected.
    pub fn none() -> Self {
        Criteria::default()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Criteria::default()
    }

    /// Converts to a [`Query`]: each `None` becomes the wildcard.
    pub fn to_query(&self) -> Query {
        let mut query = Query::any();
        if let Some(os) = self.os {
            query = query.with_os(os.as_str());
        }
        if let Some(os_version) = &self.os_version {
            query = query.with_os_version(os_version.as_str());
        }
        if let Some(kernel) = &self.kernel {
            query = query.with_kernel(kernel.as_str());
        }
        if let Some(service) = self.service {
            query = query.with_service(service.as_str());
        }
        if let Some(k8s_version) = &self.k8s_version {
            query = query.with_k8s_version(k8s_version.as_str());
        }
        if let Some(accelerator) = self.accelerator {
            query = query.with_accelerator(accelerator.as_str());
        }
        if let Some(intent) = self.intent {
            query = query.with_intent(intent.as_str());
        }
        if let Some(nodes) = self.nodes {
            query = query.with_nodes(Dimension::Value(nodes.to_string()));
        }
        query
    }
}
