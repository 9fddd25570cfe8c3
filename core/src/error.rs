//! Error types for the tuneshare client.
//!
//! # Design
//! The client itself only produces transport, upload, and serialization
//! failures. `Http` exists for callers that opt into
//! `HttpResponse::error_for_status`; `kind()` lets each caller decide how to
//! surface a failure without the client classifying anything on its own.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received: connection refused, DNS failure, broken stream.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// A file part of a multipart form could not be read or attached.
    #[error("cannot attach upload {uri}: {source}")]
    Upload {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The durable token store failed.
    #[error("token storage failed: {0}")]
    Storage(#[source] std::io::Error),
}

/// Caller-facing classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No HTTP status: network path missing, connection refused.
    Transport,
    /// 401 or 403.
    Authentication,
    /// Any other 4xx.
    Validation,
    /// 5xx.
    Server,
    /// Local problems: serialization, unreadable uploads, storage.
    Local,
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::Http { status, .. } => match *status {
                401 | 403 => FailureKind::Authentication,
                400..=499 => FailureKind::Validation,
                500..=599 => FailureKind::Server,
                _ => FailureKind::Transport,
            },
            ApiError::Upload { .. }
            | ApiError::Serialization(_)
            | ApiError::Deserialization(_)
            | ApiError::Storage(_) => FailureKind::Local,
        }
    }
}
