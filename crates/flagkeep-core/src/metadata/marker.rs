//! Declarative markers and custom marker kinds.

use crate::error::MetadataError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// ACCESSORS
// =============================================================================

/// Zero-argument value reader registered on a [`MarkerKind`].
///
/// Receives the marker instance and renders the value as text. An `Err`
/// carries the reason the value could not be produced.
pub type Accessor = Arc<dyn Fn(&CustomMarker) -> Result<String, String> + Send + Sync>;

/// Declaration that a marker kind contributes a feature attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureAttribute {
    name: String,
    accessor: String,
}

impl FeatureAttribute {
    /// Display name of the attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the accessor producing the attribute value.
    #[must_use]
    pub fn accessor(&self) -> &str {
        &self.accessor
    }
}

// =============================================================================
// MARKER KIND
// =============================================================================

/// Definition of a custom marker: its name, its accessors, and optionally
/// the feature attribute it contributes.
///
/// Kind names are the identity of a kind: two kinds with the same name are
/// treated as the same kind when markers are compared.
pub struct MarkerKind {
    name: String,
    attribute: Option<FeatureAttribute>,
    accessors: BTreeMap<String, Accessor>,
}

impl MarkerKind {
    pub fn builder(name: impl Into<String>) -> MarkerKindBuilder {
        MarkerKindBuilder {
            name: name.into(),
            attribute: None,
            accessors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute contributed by markers of this kind, if any.
    #[must_use]
    pub fn feature_attribute(&self) -> Option<&FeatureAttribute> {
        self.attribute.as_ref()
    }

    #[must_use]
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// Registered accessor names, in order.
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }
}

impl fmt::Debug for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerKind")
            .field("name", &self.name)
            .field("attribute", &self.attribute)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`MarkerKind`].
pub struct MarkerKindBuilder {
    name: String,
    attribute: Option<FeatureAttribute>,
    accessors: BTreeMap<String, Accessor>,
}

impl MarkerKindBuilder {
    /// Register a named accessor.
    #[must_use]
    pub fn accessor<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&CustomMarker) -> Result<String, String> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(accessor));
        self
    }

    /// Register an accessor that returns the marker field of the same name.
    #[must_use]
    pub fn field_accessor(self, field: impl Into<String>) -> Self {
        let field = field.into();
        let key = field.clone();
        self.accessor(key, move |marker: &CustomMarker| {
            marker
                .field(&field)
                .map(str::to_string)
                .ok_or_else(|| format!("field `{field}` is not set"))
        })
    }

    /// Declare that markers of this kind contribute attribute `name`, whose
    /// value is produced by the accessor called `accessor`.
    #[must_use]
    pub fn feature_attribute(mut self, name: impl Into<String>, accessor: impl Into<String>) -> Self {
        self.attribute = Some(FeatureAttribute {
            name: name.into(),
            accessor: accessor.into(),
        });
        self
    }

    /// Finish the kind, checking that a declared attribute accessor exists.
    pub fn build(self) -> Result<Arc<MarkerKind>, MetadataError> {
        if let Some(attribute) = &self.attribute {
            if !self.accessors.contains_key(&attribute.accessor) {
                return Err(MetadataError::AccessorNotFound {
                    kind: self.name,
                    accessor: attribute.accessor.clone(),
                });
            }
        }
        Ok(self.build_unchecked())
    }

    /// Finish the kind without validation.
    ///
    /// A broken attribute declaration then surfaces when the attribute is
    /// extracted.
    #[must_use]
    pub fn build_unchecked(self) -> Arc<MarkerKind> {
        Arc::new(MarkerKind {
            name: self.name,
            attribute: self.attribute,
            accessors: self.accessors,
        })
    }
}

// =============================================================================
// CUSTOM MARKER
// =============================================================================

/// An instance of a custom [`MarkerKind`] with its field values.
#[derive(Clone)]
pub struct CustomMarker {
    kind: Arc<MarkerKind>,
    fields: BTreeMap<String, String>,
}

impl CustomMarker {
    #[must_use]
    pub fn new(kind: &Arc<MarkerKind>) -> Self {
        Self {
            kind: Arc::clone(kind),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

impl fmt::Debug for CustomMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMarker")
            .field("kind", &self.kind.name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl PartialEq for CustomMarker {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CustomMarker {}

impl Ord for CustomMarker {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind.name(), &self.fields).cmp(&(other.kind.name(), &other.fields))
    }
}

impl PartialOrd for CustomMarker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// =============================================================================
// MARKER
// =============================================================================

/// Metadata tag attached to a feature or to its group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Marker {
    /// Human-readable name.
    Label(String),
    /// Responsible person or team.
    Owner(String),
    /// Link to documentation or a tracking issue.
    InfoLink(String),
    /// Presence means the feature is on until a state is stored.
    EnabledByDefault,
    /// Third-party marker.
    Custom(CustomMarker),
}

/// The kind of a [`Marker`], used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerType<'a> {
    Label,
    Owner,
    InfoLink,
    EnabledByDefault,
    /// A custom kind, by name.
    Custom(&'a str),
}

impl Marker {
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    pub fn owner(owner: impl Into<String>) -> Self {
        Self::Owner(owner.into())
    }

    pub fn info_link(url: impl Into<String>) -> Self {
        Self::InfoLink(url.into())
    }

    #[must_use]
    pub fn marker_type(&self) -> MarkerType<'_> {
        match self {
            Self::Label(_) => MarkerType::Label,
            Self::Owner(_) => MarkerType::Owner,
            Self::InfoLink(_) => MarkerType::InfoLink,
            Self::EnabledByDefault => MarkerType::EnabledByDefault,
            Self::Custom(custom) => MarkerType::Custom(custom.kind().name()),
        }
    }

    #[must_use]
    pub fn is_type(&self, marker_type: MarkerType<'_>) -> bool {
        self.marker_type() == marker_type
    }

    /// Text payload of label, owner and info-link markers.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Label(text) | Self::Owner(text) | Self::InfoLink(text) => Some(text),
            Self::EnabledByDefault | Self::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn as_custom(&self) -> Option<&CustomMarker> {
        match self {
            Self::Custom(custom) => Some(custom),
            _ => None,
        }
    }
}

impl From<CustomMarker> for Marker {
    fn from(custom: CustomMarker) -> Self {
        Self::Custom(custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_missing_attribute_accessor() {
        let result = MarkerKind::builder("Priority")
            .feature_attribute("priority", "level")
            .build();

        assert_eq!(
            result.err(),
            Some(MetadataError::AccessorNotFound {
                kind: "Priority".to_string(),
                accessor: "level".to_string(),
            })
        );
    }

    #[test]
    fn build_accepts_registered_accessor() {
        let kind = MarkerKind::builder("Priority")
            .field_accessor("value")
            .feature_attribute("priority", "value")
            .build();

        assert!(kind.is_ok());
        let names: Vec<String> = kind
            .map(|k| k.accessor_names().map(str::to_string).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["value"]);
    }

    #[test]
    fn field_accessor_reads_field() {
        let kind = MarkerKind::builder("Team").field_accessor("name").build_unchecked();
        let marker = CustomMarker::new(&kind).with_field("name", "payments");

        let value = kind.accessor("name").map(|read| read(&marker));
        assert_eq!(value, Some(Ok("payments".to_string())));
    }

    #[test]
    fn field_accessor_reports_missing_field() {
        let kind = MarkerKind::builder("Team").field_accessor("name").build_unchecked();
        let marker = CustomMarker::new(&kind);

        let value = kind.accessor("name").map(|read| read(&marker));
        assert!(matches!(value, Some(Err(_))));
    }

    #[test]
    fn custom_markers_compare_by_kind_name_and_fields() {
        let kind = MarkerKind::builder("Team").build_unchecked();
        let same_name = MarkerKind::builder("Team").build_unchecked();

        let a = CustomMarker::new(&kind).with_field("name", "payments");
        let b = CustomMarker::new(&same_name).with_field("name", "payments");
        let c = CustomMarker::new(&kind).with_field("name", "search");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn marker_type_and_text() {
        let kind = MarkerKind::builder("Team").build_unchecked();
        let custom = Marker::from(CustomMarker::new(&kind));

        assert_eq!(Marker::label("L").marker_type(), MarkerType::Label);
        assert_eq!(Marker::label("L").text(), Some("L"));
        assert!(custom.is_type(MarkerType::Custom("Team")));
        assert!(custom.text().is_none());
        assert!(Marker::EnabledByDefault.text().is_none());
    }
}
