//! # Feature Identifier
//!
//! The join key between stored state and declared metadata.

use crate::error::FeatureIdError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable, case-sensitive name of one feature.
///
/// Guaranteed non-empty. Ordering is plain string ordering, so collections
/// keyed by `FeatureId` iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureId(String);

impl FeatureId {
    /// Create an identifier, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, FeatureIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(FeatureIdError::Empty);
        }
        Ok(Self(id))
    }

    /// The raw identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FeatureId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FeatureId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeatureId {
    type Error = FeatureIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FeatureId {
    type Error = FeatureIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
