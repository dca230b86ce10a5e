//! redb adapter for [`StateRepository`].
//!
//! One table maps the feature id to an encoded state record
//! (see [`crate::formats`]).

use crate::error::RepositoryError;
use crate::formats::{decode_state, encode_state};
use crate::repository::StateRepository;
use crate::{FeatureId, FeatureState};
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// feature id -> encoded `FeatureState`
const FEATURE_STATES: TableDefinition<&str, &[u8]> = TableDefinition::new("feature_states");

/// `StateRepository` persisted in a redb database.
pub struct RedbStateRepository {
    db: Database,
}

impl std::fmt::Debug for RedbStateRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStateRepository").finish_non_exhaustive()
    }
}

impl RedbStateRepository {
    /// Open an existing database file, or create it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        Self::init(Database::create(path)?)
    }

    /// Open an existing database file; fails if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        Self::init(Database::open(path)?)
    }

    /// A database that lives only as long as this value.
    pub fn in_memory() -> Result<Self, RepositoryError> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::init(db)
    }

    /// Make sure the table exists so reads never hit a missing table.
    fn init(db: Database) -> Result<Self, RepositoryError> {
        let txn = db.begin_write()?;
        {
            let _table = txn.open_table(FEATURE_STATES)?;
        }
        txn.commit()?;
        Ok(Self { db })
    }

    /// Ids with stored state, in key order.
    pub fn feature_ids(&self) -> Result<Vec<FeatureId>, RepositoryError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(FEATURE_STATES)?;

        let mut ids = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let id = FeatureId::new(key.value())
                .map_err(|e| RepositoryError::Format(e.to_string()))?;
            ids.push(id);
        }
        Ok(ids)
    }

    /// Delete the stored state of one feature. Returns whether it existed.
    pub fn remove(&self, feature: &FeatureId) -> Result<bool, RepositoryError> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(FEATURE_STATES)?;
            let removed = table.remove(feature.as_str())?;
            removed.is_some()
        };
        txn.commit()?;

        tracing::debug!(feature = %feature, existed, "removed feature state");
        Ok(existed)
    }
}

impl StateRepository for RedbStateRepository {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(FEATURE_STATES)?;

        let record = table.get(feature.as_str())?;
        let state = match record {
            Some(bytes) => Some(decode_state(bytes.value())?),
            None => None,
        };
        Ok(state)
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        let record = encode_state(state)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(FEATURE_STATES)?;
            table.insert(state.feature().as_str(), record.as_slice())?;
        }
        txn.commit()?;

        tracing::debug!(
            feature = %state.feature(),
            enabled = state.is_enabled(),
            "stored feature state"
        );
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
