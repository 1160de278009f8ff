//! Error types for the iTwins client.
//!
//! # Design
//! `ClientError` covers failures on our side of the wire: a payload that
//! cannot be encoded, a body that cannot be decoded, a transport that never
//! produced a response. Errors reported *by* the service travel in the
//! envelope (`ApiResponse::error`) instead and never become a `ClientError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
