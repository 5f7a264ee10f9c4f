//! # Error Types
//!
//! Defines the error taxonomy shared by every tagwatch crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema errors name the offending column or row.
//! - Invalid-input errors name the offending value.
//! - None of these conditions is transient; callers display the message and
//!   keep their previous state.

use thiserror::Error;

/// Top-level error type for tagwatch.
#[derive(Error, Debug)]
pub enum TagwatchError {
    /// Input data is malformed or is missing required columns.
    #[error("schema error: {0}")]
    Schema(String),

    /// A value violates a domain constraint (empty tag list, negative cost).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An edit referenced a resource identifier that is not in the collection.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagwatchError {
    /// Short machine-readable kind, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::UnknownResource(_) => "unknown_resource",
            Self::Io(_) => "io_error",
        }
    }
}

/// Constructor-level validation failures for core newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Resource identifiers must be non-empty after trimming.
    #[error("resource identifier must not be empty")]
    EmptyResourceId,

    /// Tag keys must be non-empty after trimming.
    #[error("tag key must not be empty")]
    EmptyTagKey,

    /// At least one required tag must be configured.
    #[error("required tag list must not be empty")]
    NoRequiredTags,

    /// The same tag key was listed twice.
    #[error("required tag {0:?} listed more than once")]
    DuplicateTag(String),

    /// Monthly cost below zero.
    #[error("monthly cost for {resource} is negative: {cost}")]
    NegativeCost {
        /// Resource carrying the cost.
        resource: String,
        /// The rejected value, as written.
        cost: String,
    },

    /// Monthly cost above [`MAX_MONTHLY_COST`](crate::record::MAX_MONTHLY_COST).
    #[error("monthly cost for {resource} exceeds the supported maximum: {cost}")]
    CostTooLarge {
        /// Resource carrying the cost.
        resource: String,
        /// The rejected value, as written.
        cost: String,
    },

    /// A dimension name that does not match any grouping axis.
    #[error("unknown dimension: {0:?}")]
    UnknownDimension(String),
}

impl From<ValidationError> for TagwatchError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
