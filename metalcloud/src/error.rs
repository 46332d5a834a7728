use std::result;
use thiserror::Error;

/// Errors returned by the API client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote call {method} failed ({code}): {message}")]
    Remote {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Failed to decode the response of {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode the parameters of {method}: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected HTTP status {status} from {method}")]
    Status { method: String, status: u16 },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Other error: {0}")]
    Other(String),
}

impl ApiError {
    pub fn not_found<I: ToString>(kind: &'static str, id: I) -> Self {
        ApiError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) => format!("Could not reach the API: {}", e),
            ApiError::Remote { message, .. } => message.clone(),
            ApiError::Status { status, .. } => {
                format!("The API answered with HTTP status {}", status)
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = result::Result<T, ApiError>;
