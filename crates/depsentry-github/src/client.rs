use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::{debug, info, warn};

use crate::error::{GitHubError, Result};
use crate::wire::{
    CreateIssueCommentRequest, CreateReviewRequest, CreateReviewResponse, DismissReviewRequest,
    IssueCommentWire, ReviewWire, SetCommitStatusRequest, UpdateIssueCommentRequest, UserWire,
};

/// GitHub REST v3 client restricted to the capabilities the engine needs:
/// user identity, issue comments, reviews, commit status, and fetching a
/// patch fragment's raw body.
pub struct GitHubClient {
    client: ClientWithMiddleware,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, "https://api.github.com")
    }

    /// Same construction, pointed at an arbitrary base URL — used by tests
    /// to aim the client at a `wiremock` server instead of the real API.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let quota = Quota::per_minute(NonZeroU32::new(60).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        info!("initialized GitHub client");

        Self {
            client,
            rate_limiter,
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest_middleware::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "depsentry")
    }

    pub async fn get_authenticated_user_id(&self) -> Result<u64> {
        self.rate_limiter.until_ready().await;
        debug!("resolving bot identity");

        let response = self
            .request(reqwest::Method::GET, &format!("{}/user", self.base_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let user: UserWire = response.json().await?;
                Ok(user.id)
            }
            StatusCode::UNAUTHORIZED => Err(GitHubError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    pub async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<IssueCommentWire>> {
        self.rate_limiter.until_ready().await;
        let url = format!(
            "{}/repos/{owner}/{repo}/issues/{pr_number}/comments",
            self.base_url
        );
        debug!(%url, "listing issue comments");

        let response = self.request(reqwest::Method::GET, &url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    pub async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: String,
    ) -> Result<IssueCommentWire> {
        self.rate_limiter.until_ready().await;
        let url = format!(
            "{}/repos/{owner}/{repo}/issues/{pr_number}/comments",
            self.base_url
        );
        debug!(%url, "creating issue comment");

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&CreateIssueCommentRequest { body })
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                let comment: IssueCommentWire = response.json().await?;
                info!(comment_id = comment.id, "created issue comment");
                Ok(comment)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, "failed to create issue comment");
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    pub async fn update_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        body: String,
    ) -> Result<IssueCommentWire> {
        self.rate_limiter.until_ready().await;
        let url = format!(
            "{}/repos/{owner}/{repo}/issues/comments/{comment_id}",
            self.base_url
        );
        debug!(%url, "updating issue comment");

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&UpdateIssueCommentRequest { body })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(GitHubError::CommentNotFound(comment_id)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    pub async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewWire>> {
        self.rate_limiter.until_ready().await;
        let url = format!("{}/repos/{owner}/{repo}/pulls/{pr_number}/reviews", self.base_url);
        debug!(%url, "listing reviews");

        let response = self.request(reqwest::Method::GET, &url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    pub async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        request: CreateReviewRequest,
    ) -> Result<CreateReviewResponse> {
        self.rate_limiter.until_ready().await;
        let url = format!("{}/repos/{owner}/{repo}/pulls/{pr_number}/reviews", self.base_url);
        debug!(%url, event = %request.event, "creating review");

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let review: CreateReviewResponse = response.json().await?;
                info!(review_id = review.id, "created review");
                Ok(review)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, "failed to create review");
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    /// Tolerates a not-found review, treating it as "no prior review".
    pub async fn dismiss_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        review_id: u64,
        message: String,
    ) -> Result<()> {
        self.rate_limiter.until_ready().await;
        let url = format!(
            "{}/repos/{owner}/{repo}/pulls/{pr_number}/reviews/{review_id}/dismissals",
            self.base_url
        );
        debug!(%url, "dismissing review");

        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&DismissReviewRequest { message })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                warn!(review_id, "review not found while dismissing, treating as no prior review");
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    pub async fn set_commit_status(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
        request: SetCommitStatusRequest,
    ) -> Result<()> {
        self.rate_limiter.until_ready().await;
        let url = format!("{}/repos/{owner}/{repo}/statuses/{commit_sha}", self.base_url);
        debug!(%url, state = %request.state, "setting commit status");

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::UnexpectedStatus(status.as_u16(), body))
            }
        }
    }

    /// Fetches the raw body of a dependency's patch-url fragment (a unified
    /// diff hunk), used by the inline-comment locator.
    pub async fn fetch_patch_body(&self, patch_url: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;
        debug!(%patch_url, "fetching patch body");

        let response = self
            .request(reqwest::Method::GET, patch_url)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::PatchFetch(format!(
                "unexpected status {status} fetching {patch_url}"
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_stores_token() {
        let client = GitHubClient::new("test-token");
        assert_eq!(client.token, "test-token");
        assert_eq!(client.base_url, "https://api.github.com");
    }

    #[test]
    fn with_base_url_overrides_default() {
        let client = GitHubClient::with_base_url("test-token", "http://localhost:1234");
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[tokio::test]
    async fn get_authenticated_user_id_returns_unauthorized() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", server.uri());
        let err = client.get_authenticated_user_id().await.unwrap_err();
        assert!(matches!(err, GitHubError::Unauthorized));
    }
}
