//! Error types for gridsync.
//!
//! Failures are domain-level and recoverable: a fetch that could not
//! materialize, or an item lookup that missed. Protocol violations in
//! the change feed are logged and dropped, never surfaced as errors.

use std::error::Error as StdError;

use thiserror::Error;

use crate::types::Position;

/// The store failed to materialize or refresh its query result.
#[derive(Debug, Error)]
#[error("fetch failed: {reason}")]
pub struct FetchError {
    reason: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl FetchError {
    /// Create a fetch error from a plain description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a fetch error wrapping an underlying cause.
    pub fn with_source(
        reason: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// An item lookup addressed a position the result set does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no item at position {position}")]
pub struct OutOfRange {
    /// The position that missed.
    pub position: Position,
}

impl OutOfRange {
    pub const fn new(position: Position) -> Self {
        Self { position }
    }
}
