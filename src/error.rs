use thiserror::Error;

/// Why a provider response could not be turned into a displayable image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("unexpected response format")]
    UnexpectedShape,

    #[error("response body is not valid JSON: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response error: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(value: reqwest::Error) -> Self {
        // reqwest includes the URL but never request headers, so the credential stays out.
        if value.is_timeout() {
            Self::Transport(format!("request timed out: {}", value))
        } else {
            Self::Transport(value.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_mentions_status_and_body() {
        let err = NormalizationError::RequestFailed {
            status: 503,
            body: "model is loading".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request failed with status 503: model is loading"
        );
    }

    #[test]
    fn display_prefixes_by_kind() {
        assert_eq!(
            GenerationError::transport("connection reset").to_string(),
            "Transport error: connection reset"
        );
        assert_eq!(
            GenerationError::from(NormalizationError::UnexpectedShape).to_string(),
            "Response error: unexpected response format"
        );
        assert_eq!(
            GenerationError::configuration("Missing API key").to_string(),
            "Configuration error: Missing API key"
        );
    }
}
