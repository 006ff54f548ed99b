//! The event filter: accept or reject a lifecycle event before it is queued.
//!
//! Only creation events are eligible; update, delete, and generic events
//! are rejected unconditionally because the engine cares about first
//! observation, not lifecycle drift. System namespaces and pods that already
//! show scheduling progress are excluded before the policy axes run.
//!
//! ## Axis composition
//!
//! Both configured axes must independently pass (AND semantics). The pod
//! axis is checked first because it needs no I/O; the namespace axis costs
//! one store read and is skipped when unconfigured. A failed namespace read,
//! not-found or transient alike, rejects the event (fail-closed): a policy we
//! cannot evaluate is a policy that did not pass.

use std::fmt;
use std::sync::Arc;

use pwatcher_core::event::{EventKind, PodEvent};
use pwatcher_core::store::PodStore;

use crate::config::FilterConfig;

/// Namespaces with this prefix are infrastructure and never observable,
/// regardless of policy.
pub const SYSTEM_NAMESPACE_PREFIX: &str = "kube-";

/// Why an event was rejected. Debug-log detail only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectReason {
    NotCreate,
    SystemNamespace,
    AlreadyAssigned,
    PodAnnotationMissing,
    NamespaceAnnotationMissing,
    NamespaceLookupFailed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotCreate => "event kind is not create",
            Self::SystemNamespace => "system namespace",
            Self::AlreadyAssigned => "pod already has an assigned address",
            Self::PodAnnotationMissing => "pod filter annotation missing",
            Self::NamespaceAnnotationMissing => "namespace filter annotation missing",
            Self::NamespaceLookupFailed => "namespace lookup failed",
        };
        f.write_str(s)
    }
}

/// Decides which creation events are worth a reconciliation request.
///
/// Pure given (event, namespace annotations, policy): repeated evaluation
/// with unchanged inputs returns the same result, and nothing is mutated on
/// either path. The only store access is the namespace read, and only when
/// that axis is configured.
#[derive(Debug, Clone)]
pub struct EventFilter<S> {
    store: Arc<S>,
    config: FilterConfig,
}

impl<S: PodStore> EventFilter<S> {
    /// Creates a filter over the given store read path and policy.
    #[must_use]
    pub fn new(store: Arc<S>, config: FilterConfig) -> Self {
        Self { store, config }
    }

    /// Returns the policy this filter was built with.
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Returns true if the event should be enqueued for reconciliation.
    pub async fn should_enqueue(&self, event: &PodEvent) -> bool {
        match self.evaluate(event).await {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(
                    namespace = %event.pod.namespace,
                    pod = %event.pod.name,
                    kind = ?event.kind,
                    %reason,
                    "event rejected"
                );
                false
            }
        }
    }

    async fn evaluate(&self, event: &PodEvent) -> Result<(), RejectReason> {
        if event.kind != EventKind::Create {
            return Err(RejectReason::NotCreate);
        }

        if event.pod.namespace.starts_with(SYSTEM_NAMESPACE_PREFIX) {
            return Err(RejectReason::SystemNamespace);
        }

        // A routable address means the pod predates this watcher; treating
        // it as newly created would flood the queue with history at startup.
        if event.pod.is_assigned() {
            return Err(RejectReason::AlreadyAssigned);
        }

        if let Some(key) = &self.config.pod_filter_key {
            if !event.pod.annotations.contains_key(key) {
                return Err(RejectReason::PodAnnotationMissing);
            }
        }

        if let Some(key) = &self.config.namespace_filter_key {
            let namespace = self
                .store
                .get_namespace(&event.pod.namespace)
                .await
                .map_err(|_| RejectReason::NamespaceLookupFailed)?;
            if !namespace.annotations.contains_key(key) {
                return Err(RejectReason::NamespaceAnnotationMissing);
            }
        }

        Ok(())
    }
}
