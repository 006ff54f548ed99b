//! Error types and result alias for pwatcher.
//!
//! The taxonomy mirrors how the engine's caller is expected to react:
//! not-found outcomes are modeled as errors at the store boundary but are
//! converted into successful terminals by the engine, version conflicts are
//! retryable via external redelivery only, and transient store failures are
//! surfaced for backoff-based redelivery. Nothing here is process-fatal.

use crate::identity::PodRef;

/// The result type used throughout pwatcher.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pwatcher operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pod no longer exists in the store.
    ///
    /// The reconciler treats this as a successful terminal (deletion wins
    /// silently); it is an error only at the store boundary.
    #[error("pod not found: {pod}")]
    PodNotFound {
        /// The identity that was looked up.
        pod: PodRef,
    },

    /// The namespace does not exist in the store.
    ///
    /// When a namespace filter axis is configured, the filter treats this as
    /// a fail-closed rejection, never as an engine-fatal condition.
    #[error("namespace not found: {name}")]
    NamespaceNotFound {
        /// The namespace name that was looked up.
        name: String,
    },

    /// A patch lost the race with a concurrent writer.
    ///
    /// Resolved by external redelivery: the redelivered request re-fetches
    /// and observes the concurrent writer's annotation if one was written.
    #[error("version conflict on {pod}: current version is {current_version}")]
    Conflict {
        /// The identity whose patch was rejected.
        pod: PodRef,
        /// The version token the store reported at rejection time.
        current_version: String,
    },

    /// A store read or write failed transiently.
    #[error("store error: {message}")]
    Store {
        /// Description of the store failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid configuration or input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Creates a new transient store error.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error with an underlying cause.
    #[must_use]
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if retrying via redelivery can make progress.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Store { .. })
    }

    /// Returns true if this error means the looked-up object is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PodNotFound { .. } | Self::NamespaceNotFound { .. }
        )
    }
}
