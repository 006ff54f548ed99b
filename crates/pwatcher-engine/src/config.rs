//! Filter policy configuration.
//!
//! Two independent, optional annotation keys gate reconciliation: one
//! checked on the pod itself, one on the pod's namespace. An unset axis
//! means accept-all on that axis. The configuration is read once from the
//! environment at startup and passed by reference into the filter; the
//! filter never consults ambient process state.

use std::env;

/// Environment variable naming the pod-level filter annotation key.
pub const POD_FILTER_ENV: &str = "POD_FILTER_KEY";

/// Environment variable naming the namespace-level filter annotation key.
pub const NAMESPACE_FILTER_ENV: &str = "NAMESPACE_FILTER_KEY";

/// Immutable two-axis filter policy.
///
/// Any non-empty string is taken literally as an annotation key to check
/// for presence; values under those keys are ignored. Both configured axes
/// must pass (AND semantics, see [`crate::filter::EventFilter`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Annotation key required on the pod itself, if set.
    pub pod_filter_key: Option<String>,
    /// Annotation key required on the pod's namespace, if set.
    pub namespace_filter_key: Option<String>,
}

impl FilterConfig {
    /// Reads the policy from `POD_FILTER_KEY` and `NAMESPACE_FILTER_KEY`.
    ///
    /// An unset or empty variable leaves that axis unfiltered.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            pod_filter_key: read_key(POD_FILTER_ENV),
            namespace_filter_key: read_key(NAMESPACE_FILTER_ENV),
        }
    }

    /// A policy with both axes unset: every non-system creation passes.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Sets the pod-level axis.
    #[must_use]
    pub fn with_pod_filter_key(mut self, key: impl Into<String>) -> Self {
        self.pod_filter_key = Some(key.into());
        self
    }

    /// Sets the namespace-level axis.
    #[must_use]
    pub fn with_namespace_filter_key(mut self, key: impl Into<String>) -> Self {
        self.namespace_filter_key = Some(key.into());
        self
    }

    /// Returns true if neither axis is configured.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.pod_filter_key.is_none() && self.namespace_filter_key.is_none()
    }
}

fn read_key(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}
