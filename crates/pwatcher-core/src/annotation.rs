//! The timestamp annotation codec.
//!
//! Pure functions over annotation maps. The value format is fixed and
//! sortable: UTC at second precision, rendered as
//! `2024-01-01 00:00:00 +0000 UTC`. Once written the value is opaque to the
//! rest of the system; it is displayed but never parsed back into a time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// The annotation key recording a pod's first-observed timestamp.
pub const TIMESTAMP_ANNOTATION: &str = "pwatcher.io/timestamp";

/// Formats an observation time in the fixed annotation value form.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S +0000 UTC").to_string()
}

/// Returns a new annotation map with the timestamp annotation set to `at`.
///
/// An absent input map yields a fresh single-entry map; the input is never
/// mutated. An existing timestamp entry is overwritten, so callers that
/// guarantee at-most-once writes must check [`has_timestamp`] first; the
/// reconciler does this as its inspect step.
#[must_use]
pub fn with_timestamp(
    annotations: Option<&BTreeMap<String, String>>,
    at: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let mut out = annotations.cloned().unwrap_or_default();
    out.insert(TIMESTAMP_ANNOTATION.to_string(), format_timestamp(at));
    out
}

/// Returns the raw timestamp annotation value, if present.
#[must_use]
pub fn timestamp_of(annotations: &BTreeMap<String, String>) -> Option<&str> {
    annotations.get(TIMESTAMP_ANNOTATION).map(String::as_str)
}

/// Returns true if the timestamp annotation is present.
#[must_use]
pub fn has_timestamp(annotations: &BTreeMap<String, String>) -> bool {
    annotations.contains_key(TIMESTAMP_ANNOTATION)
}
