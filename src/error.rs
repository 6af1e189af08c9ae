use std::path::PathBuf;
use std::{io, result};

use thiserror::Error;

/// Error types for the search, fetch, classify and export stages
#[derive(Error, Debug)]
pub enum PapersError {
    /// HTTP request failed (connectivity, timeout, body decoding)
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The response document could not be parsed as a whole
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Non-success HTTP status or an error payload returned by the service
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Query rejected before any request was made
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Classification oracle call failed
    ///
    /// The classifier recovers from this locally; it is only visible to callers
    /// that use an oracle directly.
    #[error("Classification oracle failed: {message}")]
    OracleError { message: String },

    /// Output destination could not be written
    #[error("Cannot write output to {}: {source}", path.display())]
    OutputError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = result::Result<T, PapersError>;

impl PapersError {
    /// Whether this error came from talking to the literature service
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            PapersError::RequestError(_)
                | PapersError::ApiError { .. }
                | PapersError::JsonError(_)
                | PapersError::XmlError(_)
        )
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PapersError::ApiError { status, .. } => Some(*status),
            PapersError::RequestError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
