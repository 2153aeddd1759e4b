//! Error types for path matching.

use thiserror::Error;

/// Matcher-specific errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatcherError {
    /// The path template could not be compiled.
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The same parameter name appears twice in one template.
    #[error("duplicate parameter '{param}' in path pattern '{pattern}'")]
    DuplicateParam { pattern: String, param: String },

    /// The HTTP method string is not recognised.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Route name not found.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A parameter required to build a path was not supplied.
    #[error("missing parameter '{param}' for route '{route}'")]
    MissingParam { route: String, param: String },
}

/// Result type alias for matcher operations.
pub type Result<T> = std::result::Result<T, MatcherError>;
