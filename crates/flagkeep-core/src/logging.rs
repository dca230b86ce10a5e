//! # Logging Decorator
//!
//! Wraps a [`StateRepository`] and records every state change.
//!
//! Reads pass straight through and are never logged. A write renders a
//! message, hands it to the [`LogSink`], and only then delegates. If the
//! delegate fails afterwards, the message has already been emitted: the log
//! is advisory and not transactional with storage.
//!
//! ## Messages
//!
//! - Default: `Setting Feature "<id>" to "<enabled|disabled>"`
//! - Custom: a [`MessageTemplate`] where every `{1}` becomes the feature id
//!   and every `{2}` becomes `enabled` or `disabled`. Anything else,
//!   including other placeholders, is kept verbatim.

use crate::error::RepositoryError;
use crate::repository::StateRepository;
use crate::{FeatureId, FeatureState};
use serde::{Deserialize, Serialize};

/// tracing target used by [`TracingSink`].
pub const STATE_LOG_TARGET: &str = "flagkeep::state";

const FEATURE_PLACEHOLDER: &str = "{1}";
const STATUS_PLACEHOLDER: &str = "{2}";

// =============================================================================
// LOG SINK
// =============================================================================

/// Destination for state-change messages.
///
/// `info` returns nothing: a sink has no way to fail or veto the write it
/// describes. Slow sinks slow the write down; nothing is buffered or retried.
pub trait LogSink: Send + Sync {
    /// Emit one informational message.
    fn info(&self, message: &str);
}

/// Default sink: `tracing::info!` under [`STATE_LOG_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: STATE_LOG_TARGET, "{}", message);
    }
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn info(&self, message: &str) {
        self(message);
    }
}

// =============================================================================
// MESSAGE TEMPLATE
// =============================================================================

/// Caller-supplied message with `{1}` (feature id) and `{2}` (status)
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute every placeholder occurrence.
    ///
    /// `{1}` is replaced first. A feature id that itself contains `{2}`
    /// therefore gets its `{2}` replaced as well.
    #[must_use]
    pub fn render(&self, feature: &FeatureId, status: &str) -> String {
        self.0
            .replace(FEATURE_PLACEHOLDER, feature.as_str())
            .replace(STATUS_PLACEHOLDER, status)
    }
}

impl From<&str> for MessageTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for MessageTemplate {
    fn from(template: String) -> Self {
        Self(template)
    }
}

/// The message used when no template is configured.
#[must_use]
pub fn default_message(state: &FeatureState) -> String {
    format!(
        "Setting Feature \"{}\" to \"{}\"",
        state.feature(),
        state.readable_status()
    )
}

// =============================================================================
// LOGGING STATE REPOSITORY
// =============================================================================

/// Decorator that logs every `set_feature_state` call.
#[derive(Debug)]
pub struct LoggingStateRepository<R, S = TracingSink> {
    delegate: R,
    sink: S,
    template: Option<MessageTemplate>,
}

impl<R: StateRepository> LoggingStateRepository<R, TracingSink> {
    /// Log through `tracing` with the default message.
    pub fn new(delegate: R) -> Self {
        Self::with_sink(delegate, TracingSink)
    }

    /// Log through `tracing` with a custom message template.
    pub fn with_template(delegate: R, template: impl Into<MessageTemplate>) -> Self {
        Self::with_sink(delegate, TracingSink).template(template)
    }
}

impl<R: StateRepository, S: LogSink> LoggingStateRepository<R, S> {
    /// Log into an arbitrary sink with the default message.
    pub fn with_sink(delegate: R, sink: S) -> Self {
        Self {
            delegate,
            sink,
            template: None,
        }
    }

    /// Use `template` instead of the default message.
    #[must_use]
    pub fn template(mut self, template: impl Into<MessageTemplate>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Render the message a write of `state` would emit.
    #[must_use]
    pub fn message_for(&self, state: &FeatureState) -> String {
        match &self.template {
            Some(template) => template.render(state.feature(), state.readable_status()),
            None => default_message(state),
        }
    }

    /// The wrapped repository.
    pub fn delegate(&self) -> &R {
        &self.delegate
    }

    /// Unwrap the decorator.
    pub fn into_inner(self) -> R {
        self.delegate
    }
}

impl<R: StateRepository, S: LogSink> StateRepository for LoggingStateRepository<R, S> {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        self.delegate.get_feature_state(feature)
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        let message = self.message_for(state);
        self.sink.info(&message);
        self.delegate.set_feature_state(state)
    }
}

// =============================================================================
// TESTS
// =============================================================================
