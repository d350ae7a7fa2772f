use thiserror::Error;

/// Failure reported by a report-fetch collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Operation not supported by this source: {0}")]
    Unsupported(String),
}

/// Failure reported by a narrative-generation collaborator.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative service error: {0}")]
    Service(String),

    #[error("Narrative service returned no text")]
    Empty,
}

/// Failure of an insight request.
///
/// Narrative failures never surface here; they degrade to the fallback text.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Source data unavailable ({source_name}): {error}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        error: FetchError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;

#[cfg(feature = "http")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                FetchError::Unauthorized(err.to_string())
            }
            _ => FetchError::Transport(err.to_string()),
        }
    }
}

#[cfg(feature = "gemini")]
impl From<reqwest::Error> for NarrativeError {
    fn from(err: reqwest::Error) -> Self {
        NarrativeError::Service(err.to_string())
    }
}
