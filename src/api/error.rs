use thiserror::Error;

/// Errors that can occur when talking to the shop backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or an undecodable body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `error`/`message` are lifted from a JSON body when present.
    #[error("backend responded with status {status}")]
    Status {
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },

    /// The background task running the request died before answering.
    #[error("request task failed: {0}")]
    Task(String),
}

impl ApiError {
    /// The most specific human-readable text the backend supplied, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { error, message, .. } => error.as_deref().or(message.as_deref()),
            Self::Http(_) | Self::Task(_) => None,
        }
    }
}
