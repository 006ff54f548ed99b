//! Identity references for watched pods.
//!
//! A reconciliation request is identity-only: it names a pod by namespace and
//! name and carries no payload. Redelivery is therefore always resolved
//! against freshly fetched store state, never a stale cached snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A namespaced reference to a pod.
///
/// This is the sole content of a reconciliation request and the coalescing
/// key for the request queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodRef {
    /// The namespace the pod lives in.
    pub namespace: String,
    /// The pod name, unique within its namespace.
    pub name: String,
}

impl PodRef {
    /// Creates a new pod reference.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for PodRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Ok(Self::new(namespace, name))
            }
            _ => Err(Error::InvalidInput(format!(
                "pod reference must be namespace/name, got: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        let pod = PodRef::new("ns-a", "pod-1");
        assert_eq!(pod.to_string(), "ns-a/pod-1");
        assert_eq!("ns-a/pod-1".parse::<PodRef>().unwrap(), pod);
    }

    #[test]
    fn rejects_malformed_references() {
        assert!("no-slash".parse::<PodRef>().is_err());
        assert!("/missing-namespace".parse::<PodRef>().is_err());
        assert!("missing-name/".parse::<PodRef>().is_err());
    }
}
