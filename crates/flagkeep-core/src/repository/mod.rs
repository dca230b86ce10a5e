//! # Repository Module
//!
//! The storage contract every backend and every decorator implements.
//!
//! A chain is built by explicit construction, outer wraps inner:
//!
//! ```text
//! LoggingStateRepository
//!   └── CachingStateRepository
//!         └── RedbStateRepository      (or any other backend)
//! ```
//!
//! Decorators hold exactly one delegate and never know which concrete
//! backend sits at the bottom.

mod memory;

pub use memory::InMemoryStateRepository;

use crate::cache::{CacheConfig, CachingStateRepository};
use crate::error::RepositoryError;
use crate::logging::{LoggingStateRepository, MessageTemplate};
use crate::{FeatureId, FeatureState};
use std::sync::Arc;

// =============================================================================
// STATE REPOSITORY TRAIT
// =============================================================================

/// Persistence contract for feature state.
pub trait StateRepository: Send + Sync {
    /// Read the current state of `feature`.
    ///
    /// A pure read. `Ok(None)` means no state was ever written; callers
    /// decide the fallback (usually the declared default state).
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError>;

    /// Replace the stored state of `state.feature()`.
    ///
    /// Must be atomic per feature: a concurrent reader sees either the old
    /// or the new state, never a mix.
    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError>;
}

impl<R: StateRepository + ?Sized> StateRepository for &R {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        (**self).get_feature_state(feature)
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        (**self).set_feature_state(state)
    }
}

impl<R: StateRepository + ?Sized> StateRepository for Box<R> {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        (**self).get_feature_state(feature)
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        (**self).set_feature_state(state)
    }
}

impl<R: StateRepository + ?Sized> StateRepository for Arc<R> {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        (**self).get_feature_state(feature)
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        (**self).set_feature_state(state)
    }
}

// =============================================================================
// COMPOSITION HELPERS
// =============================================================================

/// Builder-style wrapping for any repository.
///
/// Each method consumes `self` and returns the decorator holding it, so
/// `repo.cached(config).logged()` logs first and caches underneath.
pub trait StateRepositoryExt: StateRepository + Sized {
    /// Wrap in a [`LoggingStateRepository`] using the default message.
    fn logged(self) -> LoggingStateRepository<Self> {
        LoggingStateRepository::new(self)
    }

    /// Wrap in a [`LoggingStateRepository`] using a custom message template.
    fn logged_with(self, template: impl Into<MessageTemplate>) -> LoggingStateRepository<Self> {
        LoggingStateRepository::with_template(self, template)
    }

    /// Wrap in a [`CachingStateRepository`].
    fn cached(self, config: CacheConfig) -> CachingStateRepository<Self> {
        CachingStateRepository::new(self, config)
    }
}

impl<R: StateRepository> StateRepositoryExt for R {}

// =============================================================================
// TESTS
// =============================================================================
