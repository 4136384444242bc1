use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiError>;

/// Classified generation-service failure. The classification drives the
/// retry loop: auth and bad-request failures will not resolve on their own
/// and are never retried.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("authentication rejected ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("invalid request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("response contained no text content")]
    EmptyResponse,

    #[error("configuration error: {0}")]
    Config(String),
}

impl AiError {
    /// Map an HTTP status to an error class.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Auth { status, message },
            400 | 404 | 422 => Self::BadRequest { status, message },
            429 => Self::RateLimited { message },
            _ => Self::Api { status, message },
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Auth { .. } | Self::BadRequest { .. } | Self::Config(_)
        )
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            AiError::from_status(401, String::new()),
            AiError::Auth { .. }
        ));
        assert!(matches!(
            AiError::from_status(403, String::new()),
            AiError::Auth { .. }
        ));
        assert!(matches!(
            AiError::from_status(400, String::new()),
            AiError::BadRequest { .. }
        ));
        assert!(matches!(
            AiError::from_status(429, String::new()),
            AiError::RateLimited { .. }
        ));
        assert!(matches!(
            AiError::from_status(529, String::new()),
            AiError::Api { status: 529, .. }
        ));
    }

    #[test]
    fn test_retryability() {
        assert!(!AiError::from_status(401, String::new()).is_retryable());
        assert!(!AiError::from_status(400, String::new()).is_retryable());
        assert!(AiError::from_status(429, String::new()).is_retryable());
        assert!(AiError::from_status(500, String::new()).is_retryable());
        assert!(AiError::Network("connection reset".into()).is_retryable());
        assert!(AiError::EmptyResponse.is_retryable());
    }
}
