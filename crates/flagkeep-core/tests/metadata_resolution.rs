//! Integration tests for declarative metadata resolution.

#![allow(clippy::unwrap_used, clippy::panic)]

use flagkeep_core::metadata::FeatureGroup;
use flagkeep_core::{
    AttributePair, CustomMarker, FeatureId, FeatureState, InMemoryStateRepository, Marker,
    MarkerKind, MarkerType, MetadataError, MetadataResolver, StateRepository,
};
use std::sync::Arc;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn feature(name: &str) -> FeatureId {
    FeatureId::new(name).unwrap()
}

fn priority_kind() -> Arc<MarkerKind> {
    MarkerKind::builder("Priority")
        .field_accessor("level")
        .feature_attribute("priority", "level")
        .build()
        .unwrap()
}

fn jira_kind() -> Arc<MarkerKind> {
    MarkerKind::builder("Issue")
        .accessor("key", |marker: &CustomMarker| {
            let project = marker.field("project").ok_or("project missing")?;
            let number = marker.field("number").ok_or("number missing")?;
            Ok(format!("{project}-{number}"))
        })
        .feature_attribute("issue", "key")
        .build()
        .unwrap()
}

/// The declaration table most tests use.
fn store_features() -> FeatureGroup {
    let priority = priority_kind();
    let issue = jira_kind();

    FeatureGroup::builder("StoreFeatures")
        .label("Legacy")
        .info_link("https://docs.example.com/store")
        .marker(CustomMarker::new(&priority).with_field("level", "low"))
        .feature(feature("CHECKOUT_V2"), |f| {
            f.label("Checkout V2")
                .owner("checkout-team")
                .info_link("https://docs.example.com/checkout")
                .enabled_by_default()
                .marker(CustomMarker::new(&priority).with_field("level", "high"))
                .marker(
                    CustomMarker::new(&issue)
                        .with_field("project", "SHOP")
                        .with_field("number", "42"),
                )
        })
        .feature(feature("WISHLIST"), |f| f.owner("growth-team"))
        .plain_feature(feature("DARK_MODE"))
        .build()
}

// =============================================================================
// LABEL / OWNER / INFO LINK
// =============================================================================

#[test]
fn declaration_label_beats_group_label() {
    let group = store_features();
    let id = feature("CHECKOUT_V2");
    assert_eq!(MetadataResolver::label(&group.handle(&id)), "Checkout V2");

    let wishlist = feature("WISHLIST");
    assert_eq!(MetadataResolver::label(&group.handle(&wishlist)), "Legacy");
}

#[test]
fn no_markers_anywhere_falls_back_to_identifier() {
    let group = FeatureGroup::builder("Empty")
        .plain_feature(feature("NEW_SEARCH"))
        .build();
    let id = feature("NEW_SEARCH");
    let handle = group.handle(&id);

    assert_eq!(MetadataResolver::label(&handle), "NEW_SEARCH");
    assert_eq!(MetadataResolver::owner(&handle), None);
    assert_eq!(MetadataResolver::info_link(&handle), None);
}

#[test]
fn declaration_values_win_when_both_levels_define_them() {
    let group = store_features();
    let id = feature("CHECKOUT_V2");
    let handle = group.handle(&id);

    assert_eq!(MetadataResolver::owner(&handle), Some("checkout-team"));
    assert_eq!(
        MetadataResolver::info_link(&handle),
        Some("https://docs.example.com/checkout")
    );

    let dark = feature("DARK_MODE");
    assert_eq!(
        MetadataResolver::info_link(&group.handle(&dark)),
        Some("https://docs.example.com/store")
    );
    assert_eq!(MetadataResolver::owner(&group.handle(&dark)), None);
}

#[test]
fn enabled_by_default_is_presence_only() {
    let group = store_features();
    let checkout = feature("CHECKOUT_V2");
    let wishlist = feature("WISHLIST");

    assert!(MetadataResolver::is_enabled_by_default(&group.handle(&checkout)));
    assert!(!MetadataResolver::is_enabled_by_default(&group.handle(&wishlist)));
}

// =============================================================================
// MARKER SETS AND INTROSPECTION FAILURE
// =============================================================================

#[test]
fn marker_set_is_union_of_both_levels() {
    let group = store_features();
    let id = feature("WISHLIST");
    let markers = MetadataResolver::markers(&group.handle(&id));

    assert!(markers.contains(&Marker::owner("growth-team")));
    assert!(markers.contains(&Marker::label("Legacy")));
    assert!(markers.contains(&Marker::info_link("https://docs.example.com/store")));
    assert_eq!(markers.len(), 4);
}

#[test]
fn generic_lookup_honors_precedence_for_custom_kinds() {
    let group = store_features();
    let id = feature("CHECKOUT_V2");
    let marker = MetadataResolver::marker(&group.handle(&id), MarkerType::Custom("Priority"));

    let level = marker.and_then(Marker::as_custom).and_then(|c| c.field("level"));
    assert_eq!(level, Some("high"));
    assert!(MetadataResolver::is_marker_present(
        &group.handle(&id),
        MarkerType::Custom("Issue")
    ));
}

#[test]
fn undeclared_feature_gets_empty_metadata_not_an_error() {
    let group = store_features();
    let id = feature("NOT_IN_GROUP");
    let metadata = MetadataResolver::metadata(&group.handle(&id)).unwrap();

    assert_eq!(metadata.label, "NOT_IN_GROUP");
    assert_eq!(metadata.owner, None);
    assert_eq!(metadata.info_link, None);
    assert!(!metadata.enabled_by_default);
    assert!(metadata.attributes.is_empty());
}

// =============================================================================
// CUSTOM ATTRIBUTES
// =============================================================================

#[test]
fn priority_marker_yields_attribute_pair() {
    let marker = Marker::from(CustomMarker::new(&priority_kind()).with_field("level", "high"));
    assert_eq!(
        MetadataResolver::feature_attribute(&marker).unwrap(),
        Some(AttributePair::new("priority", "high"))
    );
}

#[test]
fn feature_attribute_overrides_group_attribute() {
    let group = store_features();
    let checkout = feature("CHECKOUT_V2");
    let wishlist = feature("WISHLIST");

    let attributes = MetadataResolver::attributes(&group.handle(&checkout)).unwrap();
    assert_eq!(attributes.get("priority").map(String::as_str), Some("high"));
    assert_eq!(attributes.get("issue").map(String::as_str), Some("SHOP-42"));

    let inherited = MetadataResolver::attributes(&group.handle(&wishlist)).unwrap();
    assert_eq!(inherited.get("priority").map(String::as_str), Some("low"));
    assert_eq!(inherited.len(), 1);
}

#[test]
fn misdeclared_kind_rejected_when_built() {
    let result = MarkerKind::builder("Priority")
        .feature_attribute("priority", "level")
        .build();
    assert!(matches!(result, Err(MetadataError::AccessorNotFound { .. })));
}

#[test]
fn misdeclared_kind_fails_resolution_of_the_whole_feature() {
    let broken = MarkerKind::builder("Broken")
        .feature_attribute("broken", "value")
        .build_unchecked();
    let group = FeatureGroup::builder("G")
        .feature(feature("F"), |f| f.label("ok").marker(CustomMarker::new(&broken)))
        .build();
    let id = feature("F");

    // Plain lookups still work; attribute resolution surfaces the error.
    assert_eq!(MetadataResolver::label(&group.handle(&id)), "ok");
    assert!(matches!(
        MetadataResolver::metadata(&group.handle(&id)),
        Err(MetadataError::AccessorNotFound { ref kind, .. }) if kind == "Broken"
    ));
}

#[test]
fn failing_accessor_surfaces_reason() {
    let issue = jira_kind();
    let marker = Marker::from(CustomMarker::new(&issue).with_field("project", "SHOP"));

    match MetadataResolver::feature_attribute(&marker) {
        Err(MetadataError::AccessorFailed { reason, .. }) => assert_eq!(reason, "number missing"),
        other => panic!("expected accessor failure, got {other:?}"),
    }
}

// =============================================================================
// FACADE-STYLE COMPOSITION
// =============================================================================

#[test]
fn default_state_fills_in_for_missing_repository_state() {
    let group = store_features();
    let repo = InMemoryStateRepository::new();

    let effective: Vec<(String, bool)> = group
        .handles()
        .map(|handle| {
            let metadata = MetadataResolver::metadata(&handle).unwrap();
            let state = repo
                .get_feature_state(handle.id())
                .unwrap()
                .unwrap_or_else(|| metadata.default_state());
            (metadata.label, state.is_enabled())
        })
        .collect();

    assert_eq!(
        effective,
        vec![
            ("Checkout V2".to_string(), true),
            ("Legacy".to_string(), false),
            ("Legacy".to_string(), false),
        ]
    );

    repo.set_feature_state(&FeatureState::disabled(feature("CHECKOUT_V2")))
        .unwrap();
    let id = feature("CHECKOUT_V2");
    assert!(!repo.get_feature_state(&id).unwrap().unwrap().is_enabled());
}

#[test]
fn resolver_is_usable_from_many_threads() {
    let group = Arc::new(store_features());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let group = Arc::clone(&group);
            std::thread::spawn(move || {
                let id = FeatureId::new("CHECKOUT_V2").unwrap();
                MetadataResolver::label(&group.handle(&id)).to_string()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "Checkout V2");
    }
}
