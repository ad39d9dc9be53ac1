//! Error types.
//!
//! Remote search failures are values, not panics: they travel back to the
//! controller inside a [`crate::search::SearchResultMsg`] and are shown in the
//! panel with a retry hint.

use thiserror::Error;

/// Broad category of a combobox error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, non-2xx response or unexpected response shape.
    Api,
    /// Host-level validation, such as a required field left empty.
    Validation,
}

/// A failed remote search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request could not be sent or the connection failed.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("API request failed: {status} {reason}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },

    /// The response did not hold an array where one was expected.
    #[error("Invalid API response: expected an array at key \"{key}\", but got {found}")]
    Shape {
        /// The object key that was looked up.
        key: String,
        /// JSON type name of what was found there.
        found: &'static str,
    },

    /// The body was not valid JSON.
    #[error("Invalid API response: {0}")]
    Decode(String),
}

impl SearchError {
    /// Always [`ErrorKind::Api`].
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Api
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }
        Self::Transport(err.to_string())
    }
}

/// A host-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field has no value.
    #[error("{field} is required")]
    Required {
        /// The field's label, or "This field" when it has none.
        field: String,
    },
}

impl ValidationError {
    /// Always [`ErrorKind::Validation`].
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Invalid combobox configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A remote source was requested without an endpoint.
    #[error("an API url is required for a remote search source")]
    MissingApiUrl,

    /// The endpoint could not be parsed.
    #[error("invalid API url {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The HTTP method is neither GET nor POST.
    #[error("unsupported HTTP method {0:?} (expected GET or POST)")]
    UnknownMethod(String),

    /// A header name or value is not valid HTTP.
    #[error("invalid header {name:?}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// `max_selections` must allow at least one selection.
    #[error("max_selections must be at least 1")]
    ZeroMaxSelections,

    /// The configuration file could not be parsed.
    #[error("failed to parse combobox config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = SearchError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API request failed: 503 Service Unavailable");
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn test_shape_message() {
        let err = SearchError::Shape {
            key: "products".into(),
            found: "undefined",
        };
        assert_eq!(
            err.to_string(),
            "Invalid API response: expected an array at key \"products\", but got undefined"
        );
    }

    #[test]
    fn test_validation_message() {
        let err = ValidationError::Required {
            field: "Department".into(),
        };
        assert_eq!(err.to_string(), "Department is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
