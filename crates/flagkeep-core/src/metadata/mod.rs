//! # Metadata Module
//!
//! Declarative metadata for features, resolved without touching storage.
//!
//! Markers are attached at two scopes through a [`FeatureGroup`]:
//!
//! ```text
//! FeatureGroup "Shop"            Label("Legacy"), Owner("platform")
//!   ├── CHECKOUT                 Label("Checkout V2"), EnabledByDefault
//!   └── SEARCH                   (none)
//! ```
//!
//! [`MetadataResolver`] applies the precedence rules. Custom markers are
//! instances of a [`MarkerKind`]; a kind may declare that it contributes a
//! feature attribute, read through one of its registered accessors.
//!
//! Missing markers, and features that are not declared at all, resolve to
//! "no metadata". Only a misdeclared attribute accessor is an error.

mod declaration;
mod marker;
mod resolver;

pub use declaration::{FeatureDeclaration, FeatureGroup, FeatureGroupBuilder, FeatureHandle};
pub use marker::{
    Accessor, CustomMarker, FeatureAttribute, Marker, MarkerKind, MarkerKindBuilder, MarkerType,
};
pub use resolver::{AttributePair, FeatureMetadata, MetadataResolver};
