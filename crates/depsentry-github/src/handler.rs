use std::sync::Arc;

use async_trait::async_trait;
use depsentry_core::{Action, ContextualDependency, PullRequest, TrustyReport, Vulnerability};
use depsentry_eval::{
    EvalError, PresentationHandlerFactory, PresentationOutcome, PrPresentationHandler,
    TrackedTrustyFinding, TrackedVulnerability,
};
use depsentry_registry::PatchFormatter;
use tracing::warn;

use crate::client::GitHubClient;
use crate::locator::locate_and_render;
use crate::marker::StatusMarker;
use crate::render;
use crate::wire::{CreateReviewRequest, SetCommitStatusRequest};

/// The fixed dismissal message posted when a prior review is superseded by
/// a new commit.
pub const DISMISSAL_MESSAGE: &str =
    "Previous Minder review was dismissed because the PR was updated.";

/// Fixed commit-status context string.
pub const COMMIT_STATUS_CONTEXT: &str = "minder.stacklok.dev/pr-vulncheck";

pub struct VulnerableEntry {
    pub dep: ContextualDependency,
    pub vulns: Vec<Vulnerability>,
    pub formatter: Box<dyn PatchFormatter>,
}

pub struct TrustyFindingEntry {
    pub dep: ContextualDependency,
    pub report: TrustyReport,
    pub reasons: Vec<String>,
}

fn into_eval_error(e: crate::error::GitHubError) -> EvalError {
    EvalError::PresentationFailed(e.to_string())
}

/// Resolves the bot identity once; on failure the caller degrades to
/// create-only mode.
async fn resolve_bot_identity(client: &GitHubClient) -> Option<u64> {
    match client.get_authenticated_user_id().await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "failed to resolve bot identity, degrading to create-only mode");
            None
        }
    }
}

/// Finds the first issue comment authored by `bot_user_id` whose body
/// starts with the magic-marker prefix, returning its id and parsed marker.
async fn find_status_comment(
    client: &GitHubClient,
    pr: &PullRequest,
    bot_user_id: Option<u64>,
) -> crate::error::Result<Option<(u64, StatusMarker)>> {
    let Some(bot_user_id) = bot_user_id else {
        return Ok(None);
    };

    let comments = client
        .list_issue_comments(&pr.repo_owner, &pr.repo_name, pr.number)
        .await?;

    for comment in comments {
        if comment.user.id != bot_user_id {
            continue;
        }
        if let Some(marker) = StatusMarker::parse(&comment.body) {
            return Ok(Some((comment.id, marker)));
        }
    }

    Ok(None)
}

/// The vulncheck evaluator's presentation handler: the full PR-comment,
/// review and commit-status state machine.
pub struct VulncheckPresentationHandler {
    client: Arc<GitHubClient>,
    action: Action,
    pull_request: PullRequest,
    entries: Vec<VulnerableEntry>,
}

impl VulncheckPresentationHandler {
    pub fn new(client: Arc<GitHubClient>, action: Action, pull_request: PullRequest) -> Self {
        Self {
            client,
            action,
            pull_request,
            entries: Vec::new(),
        }
    }

    async fn build_inline_comments(&self) -> Vec<crate::wire::DraftReviewCommentWire> {
        let mut comments = Vec::new();
        for entry in &self.entries {
            let patch_body = match self.client.fetch_patch_body(&entry.dep.patch_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(dep = %entry.dep.dependency.name, error = %e, "failed to fetch patch body, skipping inline comment");
                    continue;
                }
            };

            if let Some(comment) = locate_and_render(
                &entry.dep.name,
                &patch_body,
                &entry.dep.dependency,
                entry.formatter.as_ref(),
            ) {
                comments.push(comment);
            } else {
                warn!(dep = %entry.dep.dependency.name, "locator found no matching line, skipping inline comment");
            }
        }
        comments
    }
}

#[async_trait]
impl PrPresentationHandler for VulncheckPresentationHandler {
    async fn track_vulnerability(&mut self, finding: TrackedVulnerability) {
        self.entries.push(VulnerableEntry {
            dep: finding.dep,
            vulns: finding.vulns,
            formatter: finding.formatter,
        });
    }

    async fn track_trusty_finding(&mut self, _finding: TrackedTrustyFinding) {
        // vulncheck evaluator never drives this path.
    }

    async fn submit(self: Box<Self>) -> Result<PresentationOutcome, EvalError> {
        let pr = &self.pull_request;
        let has_findings = !self.entries.is_empty();
        let writes_review = matches!(
            self.action,
            Action::Comment | Action::ReviewPr | Action::CommitStatus
        );
        let writes_comment = !matches!(self.action, Action::ProfileOnly);

        if !writes_review && !writes_comment {
            return Ok(PresentationOutcome {
                tracked_names: self.entries.iter().map(|e| e.dep.dependency.name.clone()).collect(),
            });
        }

        let bot_user_id = resolve_bot_identity(&self.client).await;
        let prior = find_status_comment(&self.client, pr, bot_user_id)
            .await
            .map_err(into_eval_error)?;

        if let Some((_, marker)) = &prior {
            if marker.review_id != 0 && marker.content_sha != pr.commit_sha {
                self.client
                    .dismiss_review(
                        &pr.repo_owner,
                        &pr.repo_name,
                        pr.number,
                        marker.review_id,
                        DISMISSAL_MESSAGE.to_string(),
                    )
                    .await
                    .map_err(into_eval_error)?;
            }
        }

        let same_sha = prior
            .as_ref()
            .map(|(_, m)| m.content_sha == pr.commit_sha)
            .unwrap_or(false);

        let mut review_id = prior.as_ref().map(|(_, m)| m.review_id).unwrap_or(0);

        if writes_review && !same_sha {
            let event = match self.action {
                Action::ReviewPr => {
                    if has_findings {
                        "REQUEST_CHANGES"
                    } else {
                        "COMMENT"
                    }
                }
                _ => "COMMENT",
            };

            let comments = self.build_inline_comments().await;
            let review_body = render::render_review_body(&self.entries);

            let review = self
                .client
                .create_review(
                    &pr.repo_owner,
                    &pr.repo_name,
                    pr.number,
                    CreateReviewRequest {
                        body: review_body,
                        event: event.to_string(),
                        comments,
                    },
                )
                .await
                .map_err(into_eval_error)?;
            review_id = review.id;
        }

        if writes_comment {
            let marker = StatusMarker {
                content_sha: pr.commit_sha.clone(),
                review_id,
            };
            let body = render::render_status_comment(&marker, &self.entries);

            match &prior {
                Some((comment_id, _)) if bot_user_id.is_some() => {
                    self.client
                        .update_issue_comment(&pr.repo_owner, &pr.repo_name, *comment_id, body)
                        .await
                        .map_err(into_eval_error)?;
                }
                _ => {
                    self.client
                        .create_issue_comment(&pr.repo_owner, &pr.repo_name, pr.number, body)
                        .await
                        .map_err(into_eval_error)?;
                }
            }
        }

        if matches!(self.action, Action::CommitStatus) {
            self.client
                .set_commit_status(
                    &pr.repo_owner,
                    &pr.repo_name,
                    &pr.commit_sha,
                    SetCommitStatusRequest {
                        state: if has_findings { "failure" } else { "success" }.to_string(),
                        description: render::commit_status_description(has_findings).to_string(),
                        context: COMMIT_STATUS_CONTEXT.to_string(),
                    },
                )
                .await
                .map_err(into_eval_error)?;
        }

        Ok(PresentationOutcome {
            tracked_names: self.entries.iter().map(|e| e.dep.dependency.name.clone()).collect(),
        })
    }
}

/// Factory for [`VulncheckPresentationHandler`].
pub struct VulncheckPresentationHandlerFactory {
    client: Arc<GitHubClient>,
}

impl VulncheckPresentationHandlerFactory {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

impl PresentationHandlerFactory for VulncheckPresentationHandlerFactory {
    fn create(&self, action: Action, pull_request: &PullRequest) -> Box<dyn PrPresentationHandler> {
        Box::new(VulncheckPresentationHandler::new(
            self.client.clone(),
            action,
            pull_request.clone(),
        ))
    }
}

/// The trusty evaluator's presentation handler: always a single comment,
/// never a review or commit status, regardless of `action`.
pub struct TrustyPresentationHandler {
    client: Arc<GitHubClient>,
    pull_request: PullRequest,
    findings: Vec<TrustyFindingEntry>,
}

impl TrustyPresentationHandler {
    pub fn new(client: Arc<GitHubClient>, pull_request: PullRequest) -> Self {
        Self {
            client,
            pull_request,
            findings: Vec::new(),
        }
    }
}

#[async_trait]
impl PrPresentationHandler for TrustyPresentationHandler {
    async fn track_vulnerability(&mut self, _finding: TrackedVulnerability) {
        // trusty evaluator never drives this path.
    }

    async fn track_trusty_finding(&mut self, finding: TrackedTrustyFinding) {
        self.findings.push(TrustyFindingEntry {
            dep: finding.dep,
            report: finding.report,
            reasons: finding.reasons,
        });
    }

    async fn submit(self: Box<Self>) -> Result<PresentationOutcome, EvalError> {
        if self.findings.is_empty() {
            return Ok(PresentationOutcome::default());
        }

        let pr = &self.pull_request;
        let body = render::render_trusty_summary(&self.findings);
        self.client
            .create_issue_comment(&pr.repo_owner, &pr.repo_name, pr.number, body)
            .await
            .map_err(into_eval_error)?;

        Ok(PresentationOutcome {
            tracked_names: self.findings.iter().map(|f| f.dep.dependency.name.clone()).collect(),
        })
    }
}

/// Factory for [`TrustyPresentationHandler`].
pub struct TrustyPresentationHandlerFactory {
    client: Arc<GitHubClient>,
}

impl TrustyPresentationHandlerFactory {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

impl PresentationHandlerFactory for TrustyPresentationHandlerFactory {
    fn create(&self, _action: Action, pull_request: &PullRequest) -> Box<dyn PrPresentationHandler> {
        Box::new(TrustyPresentationHandler::new(self.client.clone(), pull_request.clone()))
    }
}
