//! Lifecycle events delivered by the watch collaborator.
//!
//! The watch subsystem delivers a stream of `(kind, pod)` tuples. The engine
//! classifies them with a single pure predicate over this closed kind set
//! rather than registering per-kind callbacks with the watch machinery.

use serde::{Deserialize, Serialize};

use crate::object::PodObject;

/// The closed set of lifecycle event kinds the watch feed can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The object was created.
    Create,
    /// The object was updated.
    Update,
    /// The object was deleted.
    Delete,
    /// A synthetic event not tied to a store mutation (resync, external
    /// trigger).
    Generic,
}

/// A lifecycle event for a pod, as delivered by the watch feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodEvent {
    /// What happened.
    pub kind: EventKind,
    /// The pod the event concerns, as observed at delivery time.
    pub pod: PodObject,
}

impl PodEvent {
    /// Creates a new pod event.
    #[must_use]
    pub fn new(kind: EventKind, pod: PodObject) -> Self {
        Self { kind, pod }
    }

    /// Shorthand for a creation event, the only kind the filter accepts.
    #[must_use]
    pub fn created(pod: PodObject) -> Self {
        Self::new(EventKind::Create, pod)
    }
}
