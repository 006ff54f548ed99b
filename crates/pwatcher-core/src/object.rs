//! Minimal projections of the store's pod and namespace objects.
//!
//! The engine consumes only what its decisions need: identity, the mutable
//! annotation map, the assigned-address signal used as a staleness check, and
//! the store's opaque version token for optimistic concurrency on patch.
//! Everything else about the underlying objects stays with the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::PodRef;

/// The pod projection returned by the store's read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodObject {
    /// The namespace the pod lives in.
    pub namespace: String,
    /// The pod name.
    pub name: String,
    /// The pod's mutable annotation map.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// The pod's assigned address, if scheduling has progressed far enough
    /// to route to it. Presence marks the pod as pre-existing rather than
    /// newly created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    /// Opaque store-assigned version token, the CAS base for patches.
    pub resource_version: String,
}

impl PodObject {
    /// Creates a pod projection with no annotations and no assigned address.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            annotations: BTreeMap::new(),
            pod_ip: None,
            resource_version: String::new(),
        }
    }

    /// Sets an annotation. Builder-style, used heavily by tests.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Sets the assigned address.
    #[must_use]
    pub fn with_pod_ip(mut self, ip: impl Into<String>) -> Self {
        self.pod_ip = Some(ip.into());
        self
    }

    /// Returns the identity reference for this pod.
    #[must_use]
    pub fn pod_ref(&self) -> PodRef {
        PodRef::new(self.namespace.clone(), self.name.clone())
    }

    /// Returns true if the pod has a non-empty assigned address.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.pod_ip.as_deref().is_some_and(|ip| !ip.is_empty())
    }
}

/// The namespace projection consulted read-only by the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceObject {
    /// The namespace name.
    pub name: String,
    /// The namespace's mutable annotation map.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl NamespaceObject {
    /// Creates a namespace projection with no annotations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Sets an annotation. Builder-style, used heavily by tests.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pod_ip_does_not_count_as_assigned() {
        let pod = PodObject::new("ns-a", "pod-1");
        assert!(!pod.is_assigned());

        let pod = pod.with_pod_ip("");
        assert!(!pod.is_assigned());

        let pod = pod.with_pod_ip("10.0.0.12");
        assert!(pod.is_assigned());
    }

    #[test]
    fn pod_ref_carries_identity_only() {
        let pod = PodObject::new("ns-a", "pod-1").with_annotation("team", "payments");
        assert_eq!(pod.pod_ref(), PodRef::new("ns-a", "pod-1"));
    }
}
