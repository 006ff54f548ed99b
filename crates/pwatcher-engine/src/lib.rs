//! # pwatcher-engine
//!
//! The decision core of pwatcher: event filtering and idempotent annotation
//! reconciliation.
//!
//! This crate implements the two contracts exposed to the scheduling
//! collaborator:
//!
//! - **Event Filter**: a pure accept/reject predicate over creation events,
//!   gated by a two-axis annotation policy
//! - **Reconciliation Engine**: an explicit terminal-state machine that
//!   applies the first-observed timestamp annotation at most once per pod
//!
//! ## Guarantees
//!
//! - **Idempotent**: a pod already carrying the timestamp annotation is
//!   never patched again
//! - **Redelivery-safe**: every reconciliation resolves from freshly read
//!   store state, so at-least-once delivery and concurrent replicas converge
//! - **Side-effect-free rejection**: the filter mutates nothing; its only
//!   store access is one read of the pod's namespace
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pwatcher_core::prelude::*;
//! use pwatcher_engine::{EventFilter, FilterConfig, ReconcileOutcome, Reconciler};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pwatcher_core::Result<()> {
//! let store = Arc::new(MemoryPodStore::new());
//! store.put_pod(PodObject::new("ns-a", "pod-1"));
//!
//! let filter = EventFilter::new(Arc::clone(&store), FilterConfig::unfiltered());
//! let event = PodEvent::created(PodObject::new("ns-a", "pod-1"));
//! assert!(filter.should_enqueue(&event).await);
//!
//! let reconciler = Reconciler::new(Arc::clone(&store));
//! let outcome = reconciler.reconcile(&PodRef::new("ns-a", "pod-1")).await?;
//! assert!(matches!(outcome, ReconcileOutcome::Annotated { .. }));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod filter;
pub mod queue;
pub mod reconcile;

pub use config::FilterConfig;
pub use filter::{EventFilter, SYSTEM_NAMESPACE_PREFIX};
pub use queue::{EnqueueResult, InMemoryRequestQueue, RequestQueue};
pub use reconcile::{ReconcileOutcome, Reconciler};
