//! The reconciliation engine: converge a pod toward carrying the
//! first-observed timestamp annotation, at most once.
//!
//! Each request runs an explicit terminal-state machine:
//!
//! | State | Condition | Terminal |
//! |-------|-----------|----------|
//! | Fetch | pod not found | `Gone` (ok, no side effect) |
//! | Fetch | read error | `Err` (redelivered later) |
//! | Inspect | annotation present | `AlreadyAnnotated` (ok, no side effect) |
//! | Annotate | patch applied | `Annotated` (ok, one log event) |
//! | Annotate | version conflict | `Err::Conflict` (redelivered later) |
//! | Annotate | write error | `Err` (redelivered later) |
//!
//! There is no internal retry loop: redelivery from the external scheduler
//! is the sole retry mechanism, and a redelivered request re-enters at
//! Fetch against fresh store state. That is what makes at-least-once
//! delivery and concurrent replicas safe: a conflict loser re-fetches and
//! lands in `AlreadyAnnotated` when the winner's annotation is visible.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Instrument;

use pwatcher_core::annotation::{has_timestamp, timestamp_of, with_timestamp};
use pwatcher_core::error::{Error, Result};
use pwatcher_core::identity::PodRef;
use pwatcher_core::observability::reconcile_span;
use pwatcher_core::store::{PatchResult, PodStore};

/// Terminal outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The pod no longer exists. Deletion wins silently.
    Gone,
    /// The annotation was already present; nothing was written.
    AlreadyAnnotated {
        /// The raw annotation value found on the pod.
        value: String,
    },
    /// The annotation was written by this pass.
    Annotated {
        /// The timestamp value that was written.
        timestamp: String,
    },
}

/// Idempotently applies the timestamp annotation to pods.
///
/// Holds no state between invocations; every request is resolved strictly
/// from freshly fetched store state.
#[derive(Debug, Clone)]
pub struct Reconciler<S> {
    store: Arc<S>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: PodStore> Reconciler<S> {
    /// Creates a reconciler over the given store, stamping with `Utc::now`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock. Deterministic-timestamp tests only.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs one reconciliation pass for the given identity.
    ///
    /// # Errors
    ///
    /// Returns `Error::Conflict` when the patch lost a race with a
    /// concurrent writer, and `Error::Store` on transient read or write
    /// failures. Both are retryable: the caller's redelivery policy is
    /// expected to re-invoke with the same identity.
    pub async fn reconcile(&self, pod: &PodRef) -> Result<ReconcileOutcome> {
        self.run(pod).instrument(reconcile_span(pod)).await
    }

    async fn run(&self, pod: &PodRef) -> Result<ReconcileOutcome> {
        // Fetch.
        let current = match self.store.get_pod(pod).await {
            Ok(current) => current,
            Err(Error::PodNotFound { .. }) => {
                tracing::debug!("pod no longer exists");
                return Ok(ReconcileOutcome::Gone);
            }
            Err(err) => return Err(err),
        };

        // Inspect.
        if has_timestamp(&current.annotations) {
            let value = timestamp_of(&current.annotations)
                .unwrap_or_default()
                .to_string();
            return Ok(ReconcileOutcome::AlreadyAnnotated { value });
        }

        // Annotate: merge-patch scoped to the annotation map, conditional on
        // the version token captured at fetch time.
        let stamped = with_timestamp(Some(&current.annotations), (self.clock)());
        let timestamp = timestamp_of(&stamped).unwrap_or_default().to_string();

        match self
            .store
            .patch_pod_annotations(pod, &current.resource_version, stamped)
            .await
        {
            Ok(PatchResult::Applied { .. }) => {
                tracing::info!(
                    namespace = %pod.namespace,
                    pod = %pod.name,
                    timestamp = %timestamp,
                    "first observation recorded"
                );
                Ok(ReconcileOutcome::Annotated { timestamp })
            }
            Ok(PatchResult::Conflict { current_version }) => Err(Error::Conflict {
                pod: pod.clone(),
                current_version,
            }),
            Err(Error::PodNotFound { .. }) => {
                // Deleted between fetch and patch.
                tracing::debug!("pod deleted before patch landed");
                Ok(ReconcileOutcome::Gone)
            }
            Err(err) => Err(err),
        }
    }
}
