use serde::{Deserialize, Serialize};

/// A pull request under evaluation. `commit_sha` is the PR's *head* SHA at
/// evaluation time and is part of the presentation-layer idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub url: String,
    pub commit_sha: String,
    pub number: u64,
    pub repo_owner: String,
    pub repo_name: String,
    pub author_id: u64,
}
