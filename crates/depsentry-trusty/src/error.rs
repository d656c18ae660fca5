use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrustyError {
    #[error("trusty request failed: {0}")]
    Network(#[from] reqwest_middleware::Error),

    #[error("failed to decode trusty response: {0}")]
    Decode(#[from] reqwest::Error),

    #[error("trusty returned unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

pub type Result<T> = std::result::Result<T, TrustyError>;
