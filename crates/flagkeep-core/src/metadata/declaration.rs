//! Declaration tables: which markers sit on which feature and on the group.

use super::marker::Marker;
use crate::FeatureId;
use std::collections::BTreeMap;

// =============================================================================
// FEATURE GROUP
// =============================================================================

/// A group of declared features (the equivalent of one feature enum).
///
/// Holds group-level markers and, for each declared feature, its own
/// markers. Built once, then read by the
/// [`MetadataResolver`](super::MetadataResolver).
#[derive(Debug, Clone, Default)]
pub struct FeatureGroup {
    name: String,
    markers: Vec<Marker>,
    features: BTreeMap<FeatureId, Vec<Marker>>,
}

impl FeatureGroup {
    pub fn builder(name: impl Into<String>) -> FeatureGroupBuilder {
        FeatureGroupBuilder {
            group: Self {
                name: name.into(),
                ..Self::default()
            },
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group-level markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers on one feature declaration.
    ///
    /// `None` when the feature is not declared in this group, i.e. the
    /// declaration cannot be inspected.
    #[must_use]
    pub fn feature_markers(&self, feature: &FeatureId) -> Option<&[Marker]> {
        self.features.get(feature).map(Vec::as_slice)
    }

    /// Declared feature ids, in order.
    pub fn features(&self) -> impl Iterator<Item = &FeatureId> {
        self.features.keys()
    }

    #[must_use]
    pub fn declares(&self, feature: &FeatureId) -> bool {
        self.features.contains_key(feature)
    }

    /// Handle for resolving metadata of `feature` within this group.
    ///
    /// Works for undeclared ids too; they simply resolve no metadata.
    #[must_use]
    pub fn handle<'a>(&'a self, feature: &'a FeatureId) -> FeatureHandle<'a> {
        FeatureHandle {
            id: feature,
            group: self,
        }
    }

    /// Handles for every declared feature.
    pub fn handles(&self) -> impl Iterator<Item = FeatureHandle<'_>> {
        self.features.keys().map(move |id| self.handle(id))
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Builder for [`FeatureGroup`].
#[derive(Debug)]
pub struct FeatureGroupBuilder {
    group: FeatureGroup,
}

impl FeatureGroupBuilder {
    /// Add a group-level marker.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<Marker>) -> Self {
        self.group.markers.push(marker.into());
        self
    }

    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.marker(Marker::label(label))
    }

    #[must_use]
    pub fn owner(self, owner: impl Into<String>) -> Self {
        self.marker(Marker::owner(owner))
    }

    #[must_use]
    pub fn info_link(self, url: impl Into<String>) -> Self {
        self.marker(Marker::info_link(url))
    }

    /// Declare a feature and its markers. Redeclaring an id replaces the
    /// earlier declaration.
    #[must_use]
    pub fn feature<F>(mut self, id: FeatureId, declare: F) -> Self
    where
        F: FnOnce(FeatureDeclaration) -> FeatureDeclaration,
    {
        let declaration = declare(FeatureDeclaration::default());
        self.group.features.insert(id, declaration.markers);
        self
    }

    /// Declare a feature without markers.
    #[must_use]
    pub fn plain_feature(mut self, id: FeatureId) -> Self {
        self.group.features.insert(id, Vec::new());
        self
    }

    #[must_use]
    pub fn build(self) -> FeatureGroup {
        self.group
    }
}

/// Markers attached to a single feature declaration.
#[derive(Debug, Default)]
pub struct FeatureDeclaration {
    markers: Vec<Marker>,
}

impl FeatureDeclaration {
    #[must_use]
    pub fn marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.marker(Marker::label(label))
    }

    #[must_use]
    pub fn owner(self, owner: impl Into<String>) -> Self {
        self.marker(Marker::owner(owner))
    }

    #[must_use]
    pub fn info_link(self, url: impl Into<String>) -> Self {
        self.marker(Marker::info_link(url))
    }

    #[must_use]
    pub fn enabled_by_default(self) -> Self {
        self.marker(Marker::EnabledByDefault)
    }
}

// =============================================================================
// FEATURE HANDLE
// =============================================================================

/// A feature id together with the group it is declared in.
#[derive(Debug, Clone, Copy)]
pub struct FeatureHandle<'a> {
    id: &'a FeatureId,
    group: &'a FeatureGroup,
}

impl<'a> FeatureHandle<'a> {
    #[must_use]
    pub fn new(group: &'a FeatureGroup, id: &'a FeatureId) -> Self {
        group.handle(id)
    }

    #[must_use]
    pub fn id(&self) -> &'a FeatureId {
        self.id
    }

    #[must_use]
    pub fn group(&self) -> &'a FeatureGroup {
        self.group
    }

    /// Feature-level markers, or `None` if the declaration cannot be found.
    #[must_use]
    pub fn declared_markers(&self) -> Option<&'a [Marker]> {
        self.group.feature_markers(self.id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
