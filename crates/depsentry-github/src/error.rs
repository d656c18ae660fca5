use thiserror::Error;

/// GitHub write/read errors.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("unauthorized: invalid credentials or token")]
    Unauthorized,

    #[error("forbidden: insufficient permissions")]
    Forbidden,

    #[error("issue comment {0} not found")]
    CommentNotFound(u64),

    #[error("review {0} not found")]
    ReviewNotFound(u64),

    #[error("unexpected HTTP status {0}: {1}")]
    UnexpectedStatus(u16, String),

    #[error("network error: {0}")]
    Network(#[from] reqwest_middleware::Error),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to fetch patch body: {0}")]
    PatchFetch(String),

    #[error("bot identity could not be resolved")]
    BotIdentityUnresolved,
}

pub type Result<T> = std::result::Result<T, GitHubError>;
