//! In-process backend, used by tests and by applications that do not need
//! state to survive a restart.

use super::StateRepository;
use crate::error::RepositoryError;
use crate::{FeatureId, FeatureState};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// `StateRepository` backed by a `BTreeMap` behind an `RwLock`.
///
/// Each write replaces the whole entry under the write lock, so readers
/// never observe a partial state. Unknown features read as `None`.
#[derive(Debug, Default)]
pub struct InMemoryStateRepository {
    states: RwLock<BTreeMap<FeatureId, FeatureState>>,
}

impl InMemoryStateRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of features with stored state.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.states.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.states.read()?.is_empty())
    }

    /// Forget the stored state of one feature.
    pub fn remove(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        Ok(self.states.write()?.remove(feature))
    }

    /// Ids with stored state, in order.
    pub fn feature_ids(&self) -> Result<Vec<FeatureId>, RepositoryError> {
        Ok(self.states.read()?.keys().cloned().collect())
    }
}

impl StateRepository for InMemoryStateRepository {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        Ok(self.states.read()?.get(feature).cloned())
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        self.states
            .write()?
            .insert(state.feature().clone(), state.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
