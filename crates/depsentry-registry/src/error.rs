use thiserror::Error;

/// Registry/patch-formatter error types (§7: `RegistryLookupFailed`,
/// `PackageNotFound`).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("request to registry failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("registry returned unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),

    #[error("package not found: {0}")]
    PackageNotFound(String),

    #[error("go sum lookup returned mismatched package/version: wanted {wanted}, got {got}")]
    SumMismatch { wanted: String, got: String },

    #[error("unknown ecosystem: {0}")]
    UnknownEcosystem(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
