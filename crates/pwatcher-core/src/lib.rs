//! # pwatcher-core
//!
//! Core abstractions for the pwatcher first-observation annotator.
//!
//! This crate provides the foundational types and contracts used by the
//! engine crate:
//!
//! - **Identity**: The namespace/name reference a reconciliation request
//!   carries; identity only, never a payload snapshot
//! - **Object Model**: The minimal pod and namespace projections the engine
//!   consumes from the resource store
//! - **Store Contract**: Abstract read/patch interface with optimistic
//!   concurrency via opaque version tokens
//! - **Annotation Codec**: Pure functions over the timestamp annotation
//! - **Error Types**: Shared error taxonomy and result alias
//!
//! ## Crate Boundary
//!
//! `pwatcher-core` owns every type that crosses the boundary between the
//! engine and its external collaborators (resource store, scheduler). The
//! engine crate contains decision logic only.
//!
//! ## Example
//!
//! ```rust
//! use pwatcher_core::prelude::*;
//!
//! let pod = PodRef::new("ns-a", "pod-1");
//! assert_eq!(pod.to_string(), "ns-a/pod-1");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod annotation;
pub mod error;
pub mod event;
pub mod identity;
pub mod object;
pub mod observability;
pub mod store;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use pwatcher_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotation::{
        format_timestamp, has_timestamp, timestamp_of, with_timestamp, TIMESTAMP_ANNOTATION,
    };
    pub use crate::error::{Error, Result};
    pub use crate::event::{EventKind, PodEvent};
    pub use crate::identity::PodRef;
    pub use crate::object::{NamespaceObject, PodObject};
    pub use crate::store::{MemoryPodStore, PatchResult, PodStore};
}

pub use error::{Error, Result};
pub use identity::PodRef;
