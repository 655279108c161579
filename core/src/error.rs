//! Error types for the job API client.
//!
//! # Design
//! Three failure kinds, so callers branch on the variant instead of parsing
//! message text:
//! - `Transport`: the request never produced a response.
//! - `RequestFailed`: the server answered with a non-2xx status. The raw
//!   body is kept as text since error pages are not guaranteed to be JSON.
//! - `Decode`: a 2xx body was not the JSON document the operation expects.
//!
//! The failing `Operation` is carried along so the rendered message reads
//! like "parse failed: 500 internal error".

use std::fmt;

use thiserror::Error;

/// The backend operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Parse,
    Generate,
    Execute,
    Health,
    ListArtifacts,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Upload => "upload",
            Operation::Parse => "parse",
            Operation::Generate => "generate",
            Operation::Execute => "execute",
            Operation::Health => "health",
            Operation::ListArtifacts => "list artifacts",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by `JobApi` read methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed (connection refused, DNS, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server responded with a non-2xx status.
    #[error("{operation} failed: {status} {body}")]
    RequestFailed {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// A 2xx response body was not valid JSON.
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// HTTP status of a `RequestFailed` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
