//! Error types for navigation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::route::TransactionId;

/// Status reported when a route action fails without a status of its own.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Status reported when no route matches.
pub const NOT_FOUND_STATUS: u16 = 404;

/// The error descriptor recorded by the route store after a failed navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateFailure {
    /// HTTP-like status code.
    pub status_code: u16,
    /// Human readable message.
    pub message: String,
    /// Transaction of the navigation that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    /// Fields carried over from the action error.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// An error returned by a route action.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ActionError {
    /// Status to report; [`DEFAULT_ERROR_STATUS`] when absent.
    pub status_code: Option<u16>,
    /// Error message.
    pub message: String,
    /// Extra fields preserved into the recorded failure.
    pub details: Map<String, Value>,
}

impl ActionError {
    /// Creates an action error without a status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
            details: Map::new(),
        }
    }

    /// Sets the status code.
    #[must_use]
    pub const fn status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Adds a detail field.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Errors delivered to the caller of [`navigate`](crate::navigate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigateError {
    /// No route matches the requested URL and method.
    #[error("Url '{url}' does not match any routes")]
    NotFound { url: String },

    /// The route action failed.
    #[error("{message}")]
    Handler {
        status_code: u16,
        message: String,
        details: Map<String, Value>,
    },

    /// The route names an action the context cannot resolve.
    #[error("Action '{0}' is not registered")]
    UnknownAction(String),

    /// The action context is not wired with a route store.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl NavigateError {
    /// Returns the HTTP-like status, `None` for configuration errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(NOT_FOUND_STATUS),
            Self::Handler { status_code, .. } => Some(*status_code),
            Self::UnknownAction(_) => Some(DEFAULT_ERROR_STATUS),
            Self::Configuration(_) => None,
        }
    }

    /// Builds the descriptor recorded in the route store.
    #[must_use]
    pub fn failure(&self, transaction_id: Option<TransactionId>) -> NavigateFailure {
        let details = match self {
            Self::Handler { details, .. } => details.clone(),
            _ => Map::new(),
        };
        NavigateFailure {
            status_code: self.status_code().unwrap_or(DEFAULT_ERROR_STATUS),
            message: self.to_string(),
            transaction_id,
            details,
        }
    }
}

impl From<ActionError> for NavigateError {
    fn from(err: ActionError) -> Self {
        Self::Handler {
            status_code: err.status_code.unwrap_or(DEFAULT_ERROR_STATUS),
            message: err.message,
            details: err.details,
        }
    }
}

/// Errors raised while resolving or following a link.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkError {
    /// Neither an href nor a resolvable route name was given.
    #[error("NavLink created without href or unresolvable routeName '{route_name}'")]
    MissingHref { route_name: String },

    /// The navigation started by the link failed.
    #[error(transparent)]
    Navigate(#[from] NavigateError),
}

/// Result type alias for navigation.
pub type Result<T> = std::result::Result<T, NavigateError>;
