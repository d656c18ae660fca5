use async_trait::async_trait;
use depsentry_core::{Action, ContextualDependency, PullRequest, TrustyReport, Vulnerability};
use depsentry_registry::PatchFormatter;

use crate::error::Result;

/// One dependency tracked as vulnerable by the vulncheck evaluator, paired
/// with the patch-locator/formatter that will render its inline comment.
pub struct TrackedVulnerability {
    pub dep: ContextualDependency,
    pub vulns: Vec<Vulnerability>,
    pub formatter: Box<dyn PatchFormatter>,
}

/// One dependency tracked as a trust-score finding, with the human-readable
/// reasons it was flagged.
pub struct TrackedTrustyFinding {
    pub dep: ContextualDependency,
    pub report: TrustyReport,
    pub reasons: Vec<String>,
}

/// What submitting the handler produced: the names of every dependency that
/// ended up tracked, used to build the evaluator's failure value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationOutcome {
    pub tracked_names: Vec<String>,
}

/// One instance per PR evaluation. Implementations own the GitHub writes;
/// this crate only defines the contract the evaluators drive.
#[async_trait]
pub trait PrPresentationHandler: Send {
    async fn track_vulnerability(&mut self, finding: TrackedVulnerability);

    async fn track_trusty_finding(&mut self, finding: TrackedTrustyFinding);

    /// Consumes the handler and performs whatever GitHub writes `action`
    /// requires. A failure writing any sub-artifact is fatal; no partial
    /// rollback is performed.
    async fn submit(self: Box<Self>) -> Result<PresentationOutcome>;
}

/// Constructs a presentation handler sized for the rule's configured
/// `action`, given the PR it will report against.
pub trait PresentationHandlerFactory: Send + Sync {
    fn create(&self, action: Action, pull_request: &PullRequest) -> Box<dyn PrPresentationHandler>;
}
