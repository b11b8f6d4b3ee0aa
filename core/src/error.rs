//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Rejected` get dedicated variants because callers act on
//! them differently: the first means the record is gone, the second carries
//! the server's validation or business-rule message. All other non-2xx
//! responses land in `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// A form field could not be turned into a request.
    #[error("invalid due date: {0}")]
    InvalidDueDate(String),

    /// The server returned 400 with this `{error}` message.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
