//! Filter policy tests: event kinds, system namespaces, pre-existing pods,
//! and the two annotation axes with AND composition.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use pwatcher_core::prelude::*;
use pwatcher_core::store::FaultPoint;
use pwatcher_engine::{EventFilter, FilterConfig};

fn unfiltered(store: &Arc<MemoryPodStore>) -> EventFilter<MemoryPodStore> {
    EventFilter::new(Arc::clone(store), FilterConfig::unfiltered())
}

#[tokio::test]
async fn only_create_events_are_eligible() {
    let store = Arc::new(MemoryPodStore::new());
    let filter = unfiltered(&store);
    let pod = PodObject::new("ns-a", "pod-1");

    assert!(filter.should_enqueue(&PodEvent::created(pod.clone())).await);
    for kind in [EventKind::Update, EventKind::Delete, EventKind::Generic] {
        assert!(
            !filter.should_enqueue(&PodEvent::new(kind, pod.clone())).await,
            "{kind:?} events must be rejected"
        );
    }
}

#[tokio::test]
async fn system_namespaces_are_rejected_regardless_of_policy() {
    let store = Arc::new(MemoryPodStore::new());
    store.put_namespace(NamespaceObject::new("kube-system").with_annotation("watched", "true"));

    let filter = unfiltered(&store);
    let event = PodEvent::created(
        PodObject::new("kube-system", "coredns-abc").with_annotation("team", "infra"),
    );
    assert!(!filter.should_enqueue(&event).await);

    let filter = EventFilter::new(
        Arc::clone(&store),
        FilterConfig::unfiltered().with_namespace_filter_key("watched"),
    );
    assert!(!filter.should_enqueue(&event).await);
}

#[tokio::test]
async fn assigned_pods_are_treated_as_pre_existing() {
    let store = Arc::new(MemoryPodStore::new());
    let filter = unfiltered(&store);

    let event = PodEvent::created(PodObject::new("ns-a", "pod-1").with_pod_ip("10.0.0.12"));
    assert!(!filter.should_enqueue(&event).await);

    // An empty address is not scheduling progress.
    let event = PodEvent::created(PodObject::new("ns-a", "pod-1").with_pod_ip(""));
    assert!(filter.should_enqueue(&event).await);
}

#[tokio::test]
async fn pod_axis_requires_the_exact_annotation_key() {
    let store = Arc::new(MemoryPodStore::new());
    let filter = EventFilter::new(
        Arc::clone(&store),
        FilterConfig::unfiltered().with_pod_filter_key("team"),
    );
    assert_eq!(filter.config().pod_filter_key.as_deref(), Some("team"));
    assert!(filter.config().namespace_filter_key.is_none());

    let without = PodEvent::created(PodObject::new("ns-a", "pod-1"));
    assert!(!filter.should_enqueue(&without).await);

    // Value is ignored; presence is what counts.
    let with = PodEvent::created(PodObject::new("ns-a", "pod-1").with_annotation("team", ""));
    assert!(filter.should_enqueue(&with).await);
}

#[tokio::test]
async fn namespace_axis_consults_the_namespace_annotations() {
    let store = Arc::new(MemoryPodStore::new());
    store.put_namespace(NamespaceObject::new("ns-a").with_annotation("watched", "yes"));
    store.put_namespace(NamespaceObject::new("ns-b"));

    let filter = EventFilter::new(
        Arc::clone(&store),
        FilterConfig::unfiltered().with_namespace_filter_key("watched"),
    );

    let in_watched = PodEvent::created(PodObject::new("ns-a", "pod-1"));
    assert!(filter.should_enqueue(&in_watched).await);

    let in_unwatched = PodEvent::created(PodObject::new("ns-b", "pod-1"));
    assert!(!filter.should_enqueue(&in_unwatched).await);
}

#[tokio::test]
async fn namespace_lookup_failure_rejects_fail_closed() {
    let store = Arc::new(MemoryPodStore::new());
    store.put_namespace(NamespaceObject::new("ns-a").with_annotation("watched", "yes"));

    let filter = EventFilter::new(
        Arc::clone(&store),
        FilterConfig::unfiltered().with_namespace_filter_key("watched"),
    );
    let event = PodEvent::created(PodObject::new("ns-a", "pod-1"));

    // Not-found: the namespace itself is missing.
    let missing_ns = PodEvent::created(PodObject::new("ns-gone", "pod-1"));
    assert!(!filter.should_enqueue(&missing_ns).await);

    // Transient read failure on an existing namespace.
    store.inject_faults(FaultPoint::GetNamespace, 1);
    assert!(!filter.should_enqueue(&event).await);

    // Once the store recovers, the same event passes.
    assert!(filter.should_enqueue(&event).await);
}

#[tokio::test]
async fn both_configured_axes_must_pass() {
    let store = Arc::new(MemoryPodStore::new());
    store.put_namespace(NamespaceObject::new("ns-a").with_annotation("watched", "yes"));
    store.put_namespace(NamespaceObject::new("ns-b"));

    let filter = EventFilter::new(
        Arc::clone(&store),
        FilterConfig::unfiltered()
            .with_pod_filter_key("team")
            .with_namespace_filter_key("watched"),
    );

    let both = PodEvent::created(PodObject::new("ns-a", "pod-1").with_annotation("team", "x"));
    assert!(filter.should_enqueue(&both).await);

    let pod_only = PodEvent::created(PodObject::new("ns-b", "pod-1").with_annotation("team", "x"));
    assert!(!filter.should_enqueue(&pod_only).await);

    let namespace_only = PodEvent::created(PodObject::new("ns-a", "pod-1"));
    assert!(!filter.should_enqueue(&namespace_only).await);
}

#[tokio::test]
async fn evaluation_is_pure_and_repeatable() {
    let store = Arc::new(MemoryPodStore::new());
    store.put_namespace(NamespaceObject::new("ns-a").with_annotation("watched", "yes"));
    store.put_pod(PodObject::new("ns-a", "pod-1"));

    let filter = EventFilter::new(
        Arc::clone(&store),
        FilterConfig::unfiltered().with_namespace_filter_key("watched"),
    );
    let event = PodEvent::created(PodObject::new("ns-a", "pod-1"));

    let first = filter.should_enqueue(&event).await;
    let second = filter.should_enqueue(&event).await;
    assert_eq!(first, second);

    // Rejection paths mutate nothing either.
    let rejected = PodEvent::created(PodObject::new("kube-system", "pod-1"));
    assert!(!filter.should_enqueue(&rejected).await);

    let stored = store.pod(&PodRef::new("ns-a", "pod-1")).expect("pod kept");
    assert!(stored.annotations.is_empty());
    assert_eq!(store.patch_calls(), 0);
}
