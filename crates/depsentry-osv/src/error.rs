use thiserror::Error;

/// OSV client error types.
#[derive(Debug, Error)]
pub enum OsvError {
    #[error("OSV request failed: {0}")]
    Network(#[from] reqwest_middleware::Error),

    #[error("failed to decode OSV response: {0}")]
    Decode(#[from] reqwest::Error),

    #[error("OSV returned unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

pub type Result<T> = std::result::Result<T, OsvError>;
