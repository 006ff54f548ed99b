//! Request queue abstraction for the scheduling collaborator.
//!
//! Reconciliation requests are identity-only and carry no payload, so the
//! queue may coalesce duplicate identities freely: processing one request
//! against current store state subsumes every earlier delivery for the same
//! pod. Redelivery with backoff after a reconcile error remains the real
//! scheduler's concern; the in-memory queue here is for tests and
//! single-process development.

use std::collections::{HashSet, VecDeque};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use pwatcher_core::error::{Error, Result};
use pwatcher_core::identity::PodRef;

/// Result of enqueuing a reconciliation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    /// The request was added to the queue.
    Enqueued,
    /// An identical request was already queued; this delivery was folded
    /// into it.
    Coalesced,
}

/// Queue of pending reconciliation requests.
///
/// Delivery semantics are at-least-once and possibly coalesced; no ordering
/// is guaranteed between requests for different pods.
#[async_trait]
pub trait RequestQueue: Send + Sync + 'static {
    /// Adds a request, coalescing with an already-queued duplicate.
    async fn enqueue(&self, pod: PodRef) -> Result<EnqueueResult>;

    /// Removes and returns the next request, if any.
    async fn dequeue(&self) -> Result<Option<PodRef>>;
}

#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<PodRef>,
    pending: HashSet<PodRef>,
}

/// In-memory FIFO request queue for testing.
///
/// Coalesces duplicate identities while they wait; a pod dequeued for
/// processing can be enqueued again, which is exactly the redelivery path
/// the reconciler is built to tolerate.
#[derive(Debug, Default)]
pub struct InMemoryRequestQueue {
    state: RwLock<QueueState>,
}

fn poison_err<T>(_: PoisonError<T>) -> Error {
    Error::store("request queue lock poisoned")
}

impl InMemoryRequestQueue {
    /// Creates a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of queued requests.
    #[must_use]
    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.queue.len()
    }

    /// Returns true if no requests are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RequestQueue for InMemoryRequestQueue {
    async fn enqueue(&self, pod: PodRef) -> Result<EnqueueResult> {
        let mut state = self.state.write().map_err(poison_err)?;
        if state.pending.contains(&pod) {
            return Ok(EnqueueResult::Coalesced);
        }
        state.pending.insert(pod.clone());
        state.queue.push_back(pod);
        Ok(EnqueueResult::Enqueued)
    }

    async fn dequeue(&self) -> Result<Option<PodRef>> {
        let mut state = self.state.write().map_err(poison_err)?;
        let next = state.queue.pop_front();
        if let Some(pod) = &next {
            state.pending.remove(pod);
        }
        Ok(next)
    }
}
