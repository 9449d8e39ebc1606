//! Queries: the dimensions an overlay key declares and a request selects on.

use std::fmt;

/// Wildcard sentinel accepted in rule data and rendered for [`Dimension::Any`].
pub const WILDCARD: &str = "ALL";

/// One query dimension: either a concrete value or the `ALL` wildcard.
///
/// Stored values keep their original spelling; matching trims and ignores
/// ASCII case, so `"Ubuntu"` and `"ubuntu "` compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Dimension {
    /// Matches any request value.
    #[default]
    Any,
    /// Matches only an equal (case-insensitive) request value.
    Value(String),
}

impl Dimension {
    /// True for the wildcard.
    pub fn is_any(&self) -> bool {
        matches!(self, Dimension::Any)
    }

    /// The concrete value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Dimension::Any => None,
            Dimension::Value(v) => Some(v),
        }
    }

    /// True when `self` (an overlay key's dimension) accepts `request`.
    ///
    /// The wildcard accepts everything; a concrete value accepts only an
    /// equal concrete value. A concrete overlay dimension never accepts a
    /// wildcard request.
    pub fn accepts(&self, request: &Dimension) -> bool {
        match (self, request) {
            (Dimension::Any, _) => true,
            (Dimension::Value(_), Dimension::Any) => false,
            (Dimension::Value(mine), Dimension::Value(theirs)) => {
                mine.trim().eq_ignore_ascii_case(theirs.trim())
            }
        }
    }
}

impl From<String> for Dimension {
    fn from(text: String) -> Self {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case(WILDCARD) {
            Dimension::Any
        } else {
            Dimension::Value(trimmed.to_string())
        }
    }
}

impl From<&str> for Dimension {
    fn from(text: &str) -> Self {
        Dimension::from(text.to_string())
    }
}

impl From<Dimension> for String {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Any => WILDCARD.to_string(),
            Dimension::Value(v) => v,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Any => f.write_str(WILDCARD),
            Dimension::Value(v) => f.write_str(v),
        }
    }
}

/// The full set of dimensions a request or overlay key can name.
///
/// Every field defaults to the wildcard, so `Query::any()` matches every
/// overlay and an overlay key in rule data only lists the dimensions it
/// actually constrains.
///
/// # Examples
///
/// ```
/// use commis_core::Query;
///
/// let request = Query::any().with_intent("training").with_accelerator("nvidia");
/// let overlay_key = Query::any().with_intent("training");
/// assert!(overlay_key.accepts(&request));
/// assert!(!request.accepts(&overlay_key));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Query {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    os: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    os_version: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    kernel: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    service: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    k8s_version: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    accelerator: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    intent: Dimension,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Dimension::is_any"))]
    nodes: Dimension,
}

impl Query {
    /// A query with every dimension set to the wildcard.
    pub fn any() -> Self {
        Query::default()
    }

    /// Sets the operating system family dimension.
    pub fn with_os(mut self, os: impl Into<Dimension>) -> Self {
        self.os = os.into();
        self
    }

    /// Sets the operating system version dimension.
    pub fn with_os_version(mut self, os_version: impl Into<Dimension>) -> Self {
        self.os_version = os_version.into();
        self
    }

    /// Sets the kernel version dimension.
    pub fn with_kernel(mut self, kernel: impl Into<Dimension>) -> Self {
        self.kernel = kernel.into();
        self
    }

    /// Sets the Kubernetes service/provider dimension.
    pub fn with_service(mut self, service: impl Into<Dimension>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the Kubernetes version dimension.
    pub fn with_k8s_version(mut self, k8s_version: impl Into<Dimension>) -> Self {
        self.k8s_version = k8s_version.into();
        self
    }

    /// Sets the accelerator/GPU dimension.
    pub fn with_accelerator(mut self, accelerator: impl Into<Dimension>) -> Self {
        self.accelerator = accelerator.into();
        self
    }

    /// Sets the workload intent dimension.
    pub fn with_intent(mut self, intent: impl Into<Dimension>) -> Self {
        self.intent = intent.into();
        self
    }

    /// Sets the node count dimension.
    pub fn with_nodes(mut self, nodes: impl Into<Dimension>) -> Self {
        self.nodes = nodes.into();
        self
    }

    pub fn os(&self) -> &Dimension {
        &self.os
    }

    pub fn os_version(&self) -> &Dimension {
        &self.os_version
    }

    pub fn kernel(&self) -> &Dimension {
        &self.kernel
    }

    pub fn service(&self) -> &Dimension {
        &self.service
    }

    pub fn k8s_version(&self) -> &Dimension {
        &self.k8s_version
    }

    pub fn accelerator(&self) -> &Dimension {
        &self.accelerator
    }

    pub fn intent(&self) -> &Dimension {
        &self.intent
    }

    pub fn nodes(&self) -> &Dimension {
        &self.nodes
    }

    fn dimensions(&self) -> [(&'static str, &Dimension); 8] {
        [
            ("os", &self.os),
            ("os_version", &self.os_version),
            ("kernel", &self.kernel),
            ("service", &self.service),
            ("k8s_version", &self.k8s_version),
            ("accelerator", &self.accelerator),
            ("intent", &self.intent),
            ("nodes", &self.nodes),
        ]
    }

    /// True when `self` (an overlay key) accepts `request`.
    ///
    /// Every dimension must accept individually; there is no partial match
    /// and no weighting. Overlay precedence comes from declaration order in
    /// the rulebook, not from how specifically a key matched.
    pub fn accepts(&self, request: &Query) -> bool {
        self.dimensions()
            .iter()
            .zip(request.dimensions().iter())
            .all(|((_, mine), (_, theirs))| mine.accepts(theirs))
    }
}

impl fmt::Display for Query {
    /// Renders the concrete dimensions as `name=value` pairs, or `ALL` when
    /// every dimension is the wildcard. This rendering is what recipes record
    /// in `matched_rules`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (name, dimension) in self.dimensions() {
            if let Dimension::Value(v) = dimension {
                if wrote {
                    f.write_str(",")?;
                }
                write!(f, "{name}={v}")?;
                wrote = true;
            }
        }
        if !wrote {
            f.write_str(WILDCARD)?;
        }
        Ok(())
    }
}
