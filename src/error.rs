//! Error types for the Big Tables client

use crate::client::Lifecycle;
use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Column type outside the allowed set
    E001InvalidSchemaType,
    /// E002: Writing rows to the stash failed
    E002FlushFailed,
    /// E003: Listing tables failed or returned an unexpected body
    E003ListTablesFailed,
    /// E004: Overwriting an existing table failed
    E004OverwriteFailed,
    /// E005: Creating a new table failed
    E005CreateFailed,
    /// E006: Operation not valid in the client's lifecycle state
    E006InvalidState,
    /// E007: No response was received from the API
    E007Transport,
    /// E008: Request body could not be encoded
    E008Serialization,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001InvalidSchemaType => "E001",
            Self::E002FlushFailed => "E002",
            Self::E003ListTablesFailed => "E003",
            Self::E004OverwriteFailed => "E004",
            Self::E005CreateFailed => "E005",
            Self::E006InvalidState => "E006",
            Self::E007Transport => "E007",
            Self::E008Serialization => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the Big Tables client.
///
/// Remote failures carry the response body verbatim.
#[derive(Debug, Error)]
pub enum BigTableError {
    #[error("Column type '{kind}' not allowed. Must be one of: string, number, boolean, url, dateTime, json")]
    InvalidSchemaType { kind: String },

    #[error("Failed to put rows batch to {path} (HTTP {status}): {body}")]
    FlushFailed {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Failed to get table list (HTTP {status}): {body}")]
    ListTablesFailed { status: u16, body: String },

    #[error("Failed to overwrite table '{table_id}' (HTTP {status}): {body}")]
    OverwriteFailed {
        table_id: String,
        status: u16,
        body: String,
    },

    #[error("Failed to create table '{table_name}' (HTTP {status}): {body}")]
    CreateFailed {
        table_name: String,
        status: u16,
        body: String,
    },

    #[error("Cannot {operation} while the client is {state}")]
    InvalidState {
        operation: &'static str,
        state: Lifecycle,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BigTableError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSchemaType { .. } => ErrorCode::E001InvalidSchemaType,
            Self::FlushFailed { .. } => ErrorCode::E002FlushFailed,
            Self::ListTablesFailed { .. } => ErrorCode::E003ListTablesFailed,
            Self::OverwriteFailed { .. } => ErrorCode::E004OverwriteFailed,
            Self::CreateFailed { .. } => ErrorCode::E005CreateFailed,
            Self::InvalidState { .. } => ErrorCode::E006InvalidState,
            Self::Transport { .. } => ErrorCode::E007Transport,
            Self::Serialization(_) => ErrorCode::E008Serialization,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FlushFailed { status, .. }
            | Self::ListTablesFailed { status, .. }
            | Self::OverwriteFailed { status, .. }
            | Self::CreateFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of the failed request, if one was received.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::FlushFailed { body, .. }
            | Self::ListTablesFailed { body, .. }
            | Self::OverwriteFailed { body, .. }
            | Self::CreateFailed { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type alias for BigTableError
pub type Result<T> = std::result::Result<T, BigTableError>;
