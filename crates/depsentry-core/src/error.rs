use thiserror::Error;

/// Errors shared by types in this crate (normalisation, parsing).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown ecosystem: {0}")]
    UnknownEcosystem(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
