//! # Error Types
//!
//! Two families of failures flow through flagkeep:
//!
//! - [`RepositoryError`]: anything a state backend or decorator reports.
//!   These always propagate to the caller unchanged.
//! - [`MetadataError`]: a custom marker kind that declares a feature
//!   attribute but cannot produce it. This is a programming mistake in the
//!   declaration and must not be swallowed.
//!
//! Missing metadata is NOT an error anywhere in this crate.

use thiserror::Error;

// =============================================================================
// FEATURE ID ERRORS
// =============================================================================

/// Rejected feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureIdError {
    /// Identifiers must contain at least one character.
    #[error("feature identifier must not be empty")]
    Empty,
}

// =============================================================================
// REPOSITORY ERRORS
// =============================================================================

/// Errors raised while reading or writing feature state.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A lock guarding in-process state was poisoned by a panicking writer.
    #[error("repository lock poisoned")]
    LockPoisoned,

    /// Stored bytes are not a valid flagkeep state record.
    #[error("invalid state record: {0}")]
    Format(String),

    /// postcard failed to encode or decode a state body.
    #[error("codec error: {0}")]
    Codec(#[from] postcard::Error),

    /// The redb storage layer failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Failure reported by a third-party backend.
    #[error("backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Wrap an arbitrary backend failure.
    pub fn backend(reason: impl std::fmt::Display) -> Self {
        Self::Backend(reason.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RepositoryError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

macro_rules! storage_error_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for RepositoryError {
                fn from(err: $source) -> Self {
                    Self::Storage(err.to_string())
                }
            }
        )*
    };
}

storage_error_from!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

// =============================================================================
// METADATA ERRORS
// =============================================================================

/// A custom marker kind is declared as contributing a feature attribute but
/// its accessor cannot deliver the value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The accessor named by the attribute declaration is not registered.
    #[error("marker kind `{kind}` declares accessor `{accessor}` but does not provide it")]
    AccessorNotFound { kind: String, accessor: String },

    /// The accessor exists but failed to produce a value.
    #[error("accessor `{accessor}` of marker kind `{kind}` failed: {reason}")]
    AccessorFailed {
        kind: String,
        accessor: String,
        reason: String,
    },
}

// =============================================================================
// TESTS
// =============================================================================
