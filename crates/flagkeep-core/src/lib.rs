//! # flagkeep-core
//!
//! Feature state storage and declarative feature metadata.
//!
//! Two independent paths:
//!
//! - **State**: a [`StateRepository`] reads and writes [`FeatureState`]s.
//!   Cross-cutting behavior is layered by wrapping: [`LoggingStateRepository`]
//!   and [`CachingStateRepository`] implement the same trait around an inner
//!   repository. Backends: [`InMemoryStateRepository`] and
//!   [`RedbStateRepository`].
//! - **Metadata**: a [`MetadataResolver`] reads labels, owners, info links,
//!   the enabled-by-default flag and custom attributes from a
//!   [`FeatureGroup`] declaration table.
//!
//! The two never call each other; a facade combines them, for example by
//! falling back to [`FeatureMetadata::default_state`] when a repository has
//! no stored state.
//!
//! ```rust,ignore
//! use flagkeep_core::{FeatureId, FeatureState, InMemoryStateRepository, StateRepository, StateRepositoryExt};
//!
//! let repo = InMemoryStateRepository::new().logged_with("Flag {1} is now {2}");
//! let checkout = FeatureId::new("CHECKOUT")?;
//! repo.set_feature_state(&FeatureState::enabled(checkout.clone()))?;
//! ```

pub mod cache;
pub mod error;
pub mod feature;
pub mod formats;
pub mod logging;
pub mod metadata;
pub mod repository;
pub mod state;
pub mod storage;

pub use cache::{CacheConfig, CacheStats, CachingStateRepository};
pub use error::{FeatureIdError, MetadataError, RepositoryError};
pub use feature::FeatureId;
pub use logging::{LogSink, LoggingStateRepository, MessageTemplate, TracingSink};
pub use metadata::{
    AttributePair, CustomMarker, FeatureGroup, FeatureHandle, FeatureMetadata, Marker, MarkerKind,
    MarkerType, MetadataResolver,
};
pub use repository::{InMemoryStateRepository, StateRepository, StateRepositoryExt};
pub use state::{FeatureState, Strategy};
pub use storage::RedbStateRepository;
