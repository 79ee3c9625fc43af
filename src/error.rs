//! Unified error types for slack2csv.
//!
//! This module provides a single [`Slack2CsvError`] enum that covers every
//! failure in the export pipeline: talking to the Slack Web API, decoding its
//! responses, and writing the CSV file.
//!
//! # Error Handling Philosophy
//!
//! - **Remote failures** (`"ok": false`) carry the error text Slack returned
//! - **Malformed responses** fail fast with a descriptive message
//! - **Name lookups** that find nothing are not errors inside the library;
//!   the binary turns them into [`Slack2CsvError::Unresolved`]

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for slack2csv operations.
///
/// # Example
///
/// ```rust
/// use slack2csv::error::Result;
/// use slack2csv::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, Slack2CsvError>;

/// The error type for all slack2csv operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Slack2CsvError {
    /// An I/O error occurred.
    ///
    /// This typically happens when the output file cannot be created
    /// or the disk is full.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error outside of an API response.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure: DNS, TLS, connection reset, timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("{method}: HTTP {status}: {body}")]
    HttpStatus {
        /// API method that was called (e.g. `conversations.history`)
        method: String,
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Slack reported `"ok": false`.
    ///
    /// `message` is the `error` field from the response, e.g.
    /// `channel_not_found` or `invalid_auth`.
    #[error("Slack API error from {method}: {message}")]
    Api {
        /// API method that was called
        method: String,
        /// Error text supplied by Slack
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Malformed response from {method}: {message}")]
    MalformedResponse {
        /// API method that was called
        method: String,
        /// Description of what's wrong
        message: String,
    },

    /// A channel or user name could not be resolved to an ID.
    #[error("Could not find {kind} named '{name}'")]
    Unresolved {
        /// What was looked up ("channel", "user", "direct message")
        kind: &'static str,
        /// The name as given by the caller
        name: String,
    },

    /// An argument was rejected before any network call was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Slack2CsvError {
    /// Creates an API error from a method name and the remote error text.
    pub fn api(method: impl Into<String>, message: impl Into<String>) -> Self {
        Slack2CsvError::Api {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Slack2CsvError::MalformedResponse {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(method: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Slack2CsvError::HttpStatus {
            method: method.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates an unresolved-name error.
    pub fn unresolved(kind: &'static str, name: impl Into<String>) -> Self {
        Slack2CsvError::Unresolved {
            kind,
            name: name.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Slack2CsvError::InvalidArgument(message.into())
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, Slack2CsvError::Io(_))
    }

    /// Returns `true` if Slack answered with `"ok": false`.
    pub fn is_api(&self) -> bool {
        matches!(self, Slack2CsvError::Api { .. })
    }

    /// Returns `true` if the response could not be understood.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Slack2CsvError::MalformedResponse { .. })
    }

    /// Returns `true` if a name lookup came up empty.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Slack2CsvError::Unresolved { .. })
    }

    /// Returns the remote error text for [`Slack2CsvError::Api`] errors.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Slack2CsvError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
