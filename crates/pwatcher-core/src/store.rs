//! Resource store contract and in-memory test double.
//!
//! The store is a networked, versioned object store keyed by namespace+name.
//! The engine consumes three operations: pod read, namespace read, and an
//! annotation-scoped merge patch with optimistic concurrency. The version
//! token is an opaque `String`; backends interpret it according to their own
//! semantics and the engine only carries it from fetch to patch.
//!
//! A version conflict on patch is a normal [`PatchResult`], never an error
//! from the backend itself: losing a race with a concurrent writer is an
//! expected outcome, resolved by redelivery.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::identity::PodRef;
use crate::object::{NamespaceObject, PodObject};

/// Result of a conditional annotation patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchResult {
    /// Patch applied, returns the new version token.
    Applied {
        /// The pod's version token after the write.
        new_version: String,
    },
    /// The pod's version no longer matches the patch base.
    Conflict {
        /// The version token currently held by the store.
        current_version: String,
    },
}

impl PatchResult {
    /// Returns true if the patch was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Read/patch access to the resource store.
///
/// All calls are blocking round trips to the external store and carry the
/// collaborator's own timeout and cancellation semantics; the engine adds no
/// timeout layer of its own.
#[async_trait]
pub trait PodStore: Send + Sync + 'static {
    /// Reads the current pod by identity.
    ///
    /// Returns `Error::PodNotFound` if the pod does not exist.
    async fn get_pod(&self, pod: &PodRef) -> Result<PodObject>;

    /// Reads a namespace by name.
    ///
    /// Returns `Error::NamespaceNotFound` if the namespace does not exist.
    async fn get_namespace(&self, name: &str) -> Result<NamespaceObject>;

    /// Merge-patches a pod's annotation map, conditional on `base_version`.
    ///
    /// The patch is scoped to the annotation map only; the rest of the
    /// object is never replaced, so concurrent unrelated mutations are not
    /// clobbered. Returns `PatchResult::Conflict` if the pod's version no
    /// longer matches `base_version`; that is a normal result, not an
    /// error. Returns `Error::PodNotFound` if the pod vanished entirely.
    async fn patch_pod_annotations(
        &self,
        pod: &PodRef,
        base_version: &str,
        annotations: BTreeMap<String, String>,
    ) -> Result<PatchResult>;
}

/// Which store operation an injected fault should trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// The next `get_pod` call.
    GetPod,
    /// The next `get_namespace` call.
    GetNamespace,
    /// The next `patch_pod_annotations` call.
    Patch,
}

#[derive(Debug, Default)]
struct StoreState {
    pods: HashMap<PodRef, StoredPod>,
    namespaces: HashMap<String, NamespaceObject>,
    faults: HashMap<FaultPoint, u64>,
}

#[derive(Debug, Clone)]
struct StoredPod {
    pod: PodObject,
    /// Numeric version stored internally, exposed as an opaque string.
    version: u64,
}

/// In-memory pod store for testing.
///
/// Thread-safe via `RwLock`. Not suitable for production. Uses numeric
/// versions internally (rendered as strings) to simulate a store-assigned
/// token that advances on every write. Counts patch calls so tests can
/// assert at-most-once patching, and supports one-shot fault injection for
/// transient-error paths.
#[derive(Debug, Default)]
pub struct MemoryPodStore {
    state: RwLock<StoreState>,
    patch_calls: AtomicU64,
}

fn poison_err<T>(_: PoisonError<T>) -> Error {
    Error::store("pod store lock poisoned")
}

fn injected_fault(operation: &str) -> Error {
    Error::store_with_source(
        format!("injected {operation} failure"),
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
    )
}

impl MemoryPodStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a pod, assigning it a fresh version token.
    pub fn put_pod(&self, mut pod: PodObject) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let key = pod.pod_ref();
        let version = state.pods.get(&key).map_or(1, |p| p.version + 1);
        pod.resource_version = version.to_string();
        state.pods.insert(key, StoredPod { pod, version });
    }

    /// Inserts or replaces a namespace.
    pub fn put_namespace(&self, namespace: NamespaceObject) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.namespaces.insert(namespace.name.clone(), namespace);
    }

    /// Deletes a pod if present.
    pub fn delete_pod(&self, pod: &PodRef) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.pods.remove(pod);
    }

    /// Arms `count` consecutive transient failures at the given fault point.
    pub fn inject_faults(&self, point: FaultPoint, count: u64) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.faults.insert(point, count);
    }

    /// Returns the number of patch calls made against this store.
    #[must_use]
    pub fn patch_calls(&self) -> u64 {
        self.patch_calls.load(Ordering::SeqCst)
    }

    /// Returns the current stored pod, if any. Test assertion helper.
    #[must_use]
    pub fn pod(&self, pod: &PodRef) -> Option<PodObject> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.pods.get(pod).map(|p| p.pod.clone())
    }

    fn take_fault(state: &mut StoreState, point: FaultPoint) -> bool {
        match state.faults.get_mut(&point) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl PodStore for MemoryPodStore {
    async fn get_pod(&self, pod: &PodRef) -> Result<PodObject> {
        let mut state = self.state.write().map_err(poison_err)?;
        if Self::take_fault(&mut state, FaultPoint::GetPod) {
            return Err(injected_fault("pod read"));
        }
        state
            .pods
            .get(pod)
            .map(|p| {
                let mut out = p.pod.clone();
                out.resource_version = p.version.to_string();
                out
            })
            .ok_or_else(|| Error::PodNotFound { pod: pod.clone() })
    }

    async fn get_namespace(&self, name: &str) -> Result<NamespaceObject> {
        let mut state = self.state.write().map_err(poison_err)?;
        if Self::take_fault(&mut state, FaultPoint::GetNamespace) {
            return Err(injected_fault("namespace read"));
        }
        state
            .namespaces
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NamespaceNotFound {
                name: name.to_string(),
            })
    }

    async fn patch_pod_annotations(
        &self,
        pod: &PodRef,
        base_version: &str,
        annotations: BTreeMap<String, String>,
    ) -> Result<PatchResult> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.write().map_err(poison_err)?;
        if Self::take_fault(&mut state, FaultPoint::Patch) {
            return Err(injected_fault("patch"));
        }

        let Some(stored) = state.pods.get_mut(pod) else {
            return Err(Error::PodNotFound { pod: pod.clone() });
        };

        if stored.version.to_string() != base_version {
            return Ok(PatchResult::Conflict {
                current_version: stored.version.to_string(),
            });
        }

        stored.pod.annotations = annotations;
        stored.version += 1;
        stored.pod.resource_version = stored.version.to_string();
        Ok(PatchResult::Applied {
            new_version: stored.version.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn patch_with_stale_version_conflicts() {
        let store = MemoryPodStore::new();
        store.put_pod(PodObject::new("ns-a", "pod-1"));

        let pod = PodRef::new("ns-a", "pod-1");
        let fetched = store.get_pod(&pod).await.unwrap();

        // Concurrent writer bumps the version.
        store.put_pod(PodObject::new("ns-a", "pod-1"));

        let result = store
            .patch_pod_annotations(&pod, &fetched.resource_version, BTreeMap::new())
            .await
            .unwrap();
        assert!(matches!(result, PatchResult::Conflict { .. }));
    }

    #[tokio::test]
    async fn patch_advances_the_version_token() {
        let store = MemoryPodStore::new();
        store.put_pod(PodObject::new("ns-a", "pod-1"));

        let pod = PodRef::new("ns-a", "pod-1");
        let fetched = store.get_pod(&pod).await.unwrap();
        let result = store
            .patch_pod_annotations(&pod, &fetched.resource_version, BTreeMap::new())
            .await
            .unwrap();

        let PatchResult::Applied { new_version } = result else {
            panic!("expected applied patch");
        };
        assert_ne!(new_version, fetched.resource_version);
        assert_eq!(store.patch_calls(), 1);
    }

    #[tokio::test]
    async fn injected_fault_carries_an_underlying_cause() {
        let store = MemoryPodStore::new();
        store.put_pod(PodObject::new("ns-a", "pod-1"));
        store.inject_faults(FaultPoint::GetPod, 1);

        let err = store
            .get_pod(&PodRef::new("ns-a", "pod-1"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn injected_fault_trips_exactly_once() {
        let store = MemoryPodStore::new();
        store.put_namespace(NamespaceObject::new("ns-a"));
        store.inject_faults(FaultPoint::GetNamespace, 1);

        assert!(store.get_namespace("ns-a").await.is_err());
        assert!(store.get_namespace("ns-a").await.is_ok());
    }
}
