use serde::{Deserialize, Serialize};

/// GitHub REST `User` (subset used by bot-identity resolution).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWire {
    pub login: String,
    pub id: u64,
}

/// GitHub REST issue comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCommentWire {
    pub id: u64,
    pub body: String,
    pub user: UserWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueCommentRequest {
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateIssueCommentRequest {
    pub body: String,
}

/// GitHub REST pull request review (subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWire {
    pub id: u64,
    pub user: UserWire,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftReviewCommentWire {
    pub path: String,
    pub line: u32,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub body: String,
    pub event: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<DraftReviewCommentWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewResponse {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissReviewRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCommitStatusRequest {
    pub state: String,
    pub description: String,
    pub context: String,
}
