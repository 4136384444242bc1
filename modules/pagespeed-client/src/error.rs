use thiserror::Error;

pub type Result<T> = std::result::Result<T, PagespeedError>;

#[derive(Debug, Error)]
pub enum PagespeedError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Audit service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Response carried no Lighthouse report")]
    MissingReport,
}

impl From<reqwest::Error> for PagespeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PagespeedError::Decode(err.to_string())
        } else {
            PagespeedError::Network(err.to_string())
        }
    }
}
