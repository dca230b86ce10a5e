//! # Feature State
//!
//! The persisted on/off status of one feature plus its optional activation
//! strategy. Values are immutable: a state change is a new `FeatureState`
//! written through a [`StateRepository`](crate::StateRepository).

use crate::FeatureId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// STRATEGY
// =============================================================================

/// A named activation strategy and its property bag.
///
/// The strategy itself is evaluated elsewhere; here it is only data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    id: String,
    parameters: BTreeMap<String, String>,
}

impl Strategy {
    /// Create a strategy with no parameters.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add or replace one parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Look up a single parameter value.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// All parameters, ordered by name.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}

// =============================================================================
// FEATURE STATE
// =============================================================================

/// Enabled flag and optional strategy for one feature.
///
/// Strategy parameters only exist inside a [`Strategy`], so a state without
/// a strategy can never carry dangling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureState {
    feature: FeatureId,
    enabled: bool,
    strategy: Option<Strategy>,
}

impl FeatureState {
    /// Create a state with no strategy.
    #[must_use]
    pub fn new(feature: FeatureId, enabled: bool) -> Self {
        Self {
            feature,
            enabled,
            strategy: None,
        }
    }

    #[must_use]
    pub fn enabled(feature: FeatureId) -> Self {
        Self::new(feature, true)
    }

    /// The conventional "unknown" state: disabled, no strategy.
    #[must_use]
    pub fn disabled(feature: FeatureId) -> Self {
        Self::new(feature, false)
    }

    /// Copy of this state with a different enabled flag.
    #[must_use]
    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }

    /// Copy of this state using `strategy`.
    #[must_use]
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..self.clone()
        }
    }

    /// Copy of this state with the strategy and all its parameters removed.
    #[must_use]
    pub fn without_strategy(&self) -> Self {
        Self {
            strategy: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn feature(&self) -> &FeatureId {
        &self.feature
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }

    /// Shortcut for the strategy id, if any.
    #[must_use]
    pub fn strategy_id(&self) -> Option<&str> {
        self.strategy.as_ref().map(Strategy::id)
    }

    /// Shortcut for a strategy parameter. Always `None` without a strategy.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.strategy.as_ref().and_then(|s| s.parameter(name))
    }

    /// Human-readable form of the enabled flag.
    #[must_use]
    pub fn readable_status(&self) -> &'static str {
        if self.enabled { "enabled" } else { "disabled" }
    }
}

// =============================================================================
// TESTS
// =============================================================================
