//! Rasp client error types.

/// Errors from a single provider request.
///
/// Neither variant is fatal on its own: both mean "no fresh data from the
/// provider this time" and leave the fallback decision to the caller.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure (connect, timeout, body read) or a non-2xx status.
    #[error("network error{}: {message}", status.map(|s| format!(" {s}")).unwrap_or_default())]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// Anything else, including a response envelope that doesn't parse.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl FetchError {
    /// HTTP status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Network { status, .. } => *status,
            FetchError::Unexpected(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
