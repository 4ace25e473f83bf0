//! Error types for the request and task builders.
//!
//! # Design
//! `ConfigurationError` is a usage bug: a builder was finalised before its
//! required inputs were supplied, or an input could not be parsed. Callers are
//! expected to treat it as fatal.
//!
//! `TransportError` never leaves the crate through the task API. Completion
//! handling swallows every transport failure; the type exists so `Transport`
//! implementations have something concrete to return.

/// Errors returned by the builders' setters and `build()` methods.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// `build()` was called before `set_base_address`.
    #[error("base address must be set before build()")]
    MissingBaseAddress,

    /// The base address string is not an absolute URL.
    #[error("invalid base address {value:?}: {reason}")]
    InvalidBaseAddress { value: String, reason: String },

    /// A path was set on a base address that cannot have one, e.g. `mailto:`.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// `TaskBuilder::build()` was called before `set_request`.
    #[error("request descriptor must be set before build()")]
    MissingRequest,

    /// The method string is neither GET nor POST.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// Errors a `Transport` may report. Swallowed by the task's completion handler.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection-level failure: DNS, TLS, refused, reset.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        assert_eq!(
            ConfigurationError::MissingBaseAddress.to_string(),
            "base address must be set before build()"
        );
        let err = ConfigurationError::InvalidBaseAddress {
            value: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("\"not a url\""));
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
    }
}
