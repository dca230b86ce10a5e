//! Marker lookup with feature-over-group precedence.

use super::declaration::FeatureHandle;
use super::marker::{Marker, MarkerType};
use crate::error::MetadataError;
use crate::{FeatureId, FeatureState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RESOLVED VALUES
// =============================================================================

/// Name and value contributed by a custom marker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributePair {
    pub name: String,
    pub value: String,
}

impl AttributePair {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything the resolver knows about one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub id: FeatureId,
    pub label: String,
    pub owner: Option<String>,
    pub info_link: Option<String>,
    pub enabled_by_default: bool,
    pub attributes: BTreeMap<String, String>,
}

impl FeatureMetadata {
    /// The state to assume while no state has been stored.
    #[must_use]
    pub fn default_state(&self) -> FeatureState {
        FeatureState::new(self.id.clone(), self.enabled_by_default)
    }
}

// =============================================================================
// METADATA RESOLVER
// =============================================================================

/// Resolves declared metadata for a [`FeatureHandle`].
///
/// Stateless: every call reads the declaration table and keeps nothing, so
/// it is safe to call from any number of threads.
///
/// Lookup rules:
/// - a feature-level marker wins over a group-level marker of the same type
/// - a feature that is not declared in its group resolves no markers at all,
///   not even group-level ones
pub struct MetadataResolver;

impl MetadataResolver {
    /// First marker of `marker_type`, feature level first, then group level.
    pub fn marker<'a>(handle: &FeatureHandle<'a>, marker_type: MarkerType<'_>) -> Option<&'a Marker> {
        let declared = handle.declared_markers()?;
        declared
            .iter()
            .find(|m| m.is_type(marker_type))
            .or_else(|| {
                handle
                    .group()
                    .markers()
                    .iter()
                    .find(|m| m.is_type(marker_type))
            })
    }

    #[must_use]
    pub fn is_marker_present(handle: &FeatureHandle<'_>, marker_type: MarkerType<'_>) -> bool {
        Self::marker(handle, marker_type).is_some()
    }

    /// Label text, or the raw feature id when no label is declared.
    #[must_use]
    pub fn label<'a>(handle: &FeatureHandle<'a>) -> &'a str {
        Self::text(handle, MarkerType::Label).unwrap_or_else(|| handle.id().as_str())
    }

    #[must_use]
    pub fn owner<'a>(handle: &FeatureHandle<'a>) -> Option<&'a str> {
        Self::text(handle, MarkerType::Owner)
    }

    #[must_use]
    pub fn info_link<'a>(handle: &FeatureHandle<'a>) -> Option<&'a str> {
        Self::text(handle, MarkerType::InfoLink)
    }

    /// Whether the feature declaration itself carries `EnabledByDefault`.
    ///
    /// Group-level `EnabledByDefault` markers are not consulted.
    #[must_use]
    pub fn is_enabled_by_default(handle: &FeatureHandle<'_>) -> bool {
        handle
            .declared_markers()
            .is_some_and(|markers| markers.contains(&Marker::EnabledByDefault))
    }

    /// Union of feature-level and group-level markers. Equal markers appear once.
    #[must_use]
    pub fn markers<'a>(handle: &FeatureHandle<'a>) -> BTreeSet<&'a Marker> {
        let Some(declared) = handle.declared_markers() else {
            return BTreeSet::new();
        };
        declared
            .iter()
            .chain(handle.group().markers())
            .collect()
    }

    /// Attribute contributed by `marker`.
    ///
    /// `Ok(None)` if the marker's kind contributes nothing. An error means
    /// the kind is misdeclared and must be fixed, not ignored.
    pub fn feature_attribute(marker: &Marker) -> Result<Option<AttributePair>, MetadataError> {
        let Some(custom) = marker.as_custom() else {
            return Ok(None);
        };
        let kind = custom.kind();
        let Some(attribute) = kind.feature_attribute() else {
            return Ok(None);
        };

        let accessor = kind
            .accessor(attribute.accessor())
            .ok_or_else(|| MetadataError::AccessorNotFound {
                kind: kind.name().to_string(),
                accessor: attribute.accessor().to_string(),
            })?;

        let value = accessor(custom).map_err(|reason| MetadataError::AccessorFailed {
            kind: kind.name().to_string(),
            accessor: attribute.accessor().to_string(),
            reason,
        })?;

        Ok(Some(AttributePair::new(attribute.name(), value)))
    }

    /// All contributed attributes. A feature-level attribute overrides a
    /// group-level attribute with the same name.
    pub fn attributes(handle: &FeatureHandle<'_>) -> Result<BTreeMap<String, String>, MetadataError> {
        let mut attributes = BTreeMap::new();
        let Some(declared) = handle.declared_markers() else {
            return Ok(attributes);
        };

        for marker in handle.group().markers().iter().chain(declared) {
            if let Some(pair) = Self::feature_attribute(marker)? {
                attributes.insert(pair.name, pair.value);
            }
        }
        Ok(attributes)
    }

    /// Resolve everything at once.
    pub fn metadata(handle: &FeatureHandle<'_>) -> Result<FeatureMetadata, MetadataError> {
        Ok(FeatureMetadata {
            id: handle.id().clone(),
            label: Self::label(handle).to_string(),
            owner: Self::owner(handle).map(str::to_string),
            info_link: Self::info_link(handle).map(str::to_string),
            enabled_by_default: Self::is_enabled_by_default(handle),
            attributes: Self::attributes(handle)?,
        })
    }

    fn text<'a>(handle: &FeatureHandle<'a>, marker_type: MarkerType<'_>) -> Option<&'a str> {
        Self::marker(handle, marker_type).and_then(Marker::text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
