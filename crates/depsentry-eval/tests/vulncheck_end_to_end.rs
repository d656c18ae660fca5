//! End-to-end exercise of the §4.G vulncheck pipeline: OSV query -> patch
//! selection -> registry lookup -> tracked vulnerability, against
//! `wiremock` stand-ins for OSV and the npm registry. Mirrors §8 scenario 2's
//! literal values (dep `npm mongodb 0.5.0`, fixed at `0.6.0`).

use async_trait::async_trait;
use depsentry_core::{
    Action, ContextualDependency, Dependency, Ecosystem, Ingested, IngestedObject, PrDependencies,
    PullRequest, RegistryEndpoint, RuleConfig, VulncheckEcosystemConfig,
};
use depsentry_eval::{
    PresentationHandlerFactory, PresentationOutcome, PrPresentationHandler, TrackedTrustyFinding,
    TrackedVulnerability, VulncheckEvaluator,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct RecordingHandler {
    tracked: Vec<String>,
}

#[async_trait]
impl PrPresentationHandler for RecordingHandler {
    async fn track_vulnerability(&mut self, finding: TrackedVulnerability) {
        self.tracked.push(finding.dep.dependency.name.clone());
    }

    async fn track_trusty_finding(&mut self, _finding: TrackedTrustyFinding) {}

    async fn submit(self: Box<Self>) -> depsentry_eval::Result<PresentationOutcome> {
        Ok(PresentationOutcome {
            tracked_names: self.tracked,
        })
    }
}

struct RecordingHandlerFactory;

impl PresentationHandlerFactory for RecordingHandlerFactory {
    fn create(&self, _action: Action, _pull_request: &PullRequest) -> Box<dyn PrPresentationHandler> {
        Box::new(RecordingHandler { tracked: Vec::new() })
    }
}

fn test_pr() -> PullRequest {
    PullRequest {
        url: "https://github.com/acme/widgets/pull/43".to_string(),
        commit_sha: "27d6810bdeadbeef000000000000000081d1".to_string(),
        number: 43,
        repo_owner: "acme".to_string(),
        repo_name: "widgets".to_string(),
        author_id: 1,
    }
}

#[tokio::test]
async fn tracks_vulnerable_dependency_and_selects_patched_version() {
    let osv_server = MockServer::start().await;
    let npm_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "vulns": [{
                "id": "GHSA-xxxx",
                "summary": "vulnerable mongodb driver",
                "affected": [{
                    "package": {"name": "mongodb", "ecosystem": "npm"},
                    "ranges": [{
                        "type": "SEMVER",
                        "events": [
                            {"introduced": "0.5.0"},
                            {"fixed": "0.6.0"}
                        ]
                    }]
                }]
            }]
        })))
        .mount(&osv_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mongodb/0.6.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "mongodb",
            "version": "0.6.0",
            "dist": {
                "integrity": "sha512-abc",
                "tarball": "https://registry.npmjs.org/mongodb/-/mongodb-0.6.0.tgz",
            }
        })))
        .mount(&npm_server)
        .await;

    let config = RuleConfig {
        action: Action::ReviewPr,
        ecosystem_config: vec![VulncheckEcosystemConfig {
            name: "npm".to_string(),
            db_type: "osv".to_string(),
            db_endpoint: format!("{}/v1/query", osv_server.uri()),
            package_repository: RegistryEndpoint {
                url: npm_server.uri(),
            },
            sum_repository: None,
        }],
    };

    let ingested = Ingested {
        pull_request: test_pr(),
        object: IngestedObject::PrDependencies(PrDependencies {
            dependencies: vec![ContextualDependency {
                dependency: Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0"),
                name: "package-lock.json".to_string(),
                patch_url: "https://example.invalid/patch".to_string(),
            }],
        }),
    };

    let evaluator = VulncheckEvaluator::new();
    let outcome = evaluator
        .evaluate(&config, &ingested, &RecordingHandlerFactory)
        .await
        .unwrap();

    assert_eq!(outcome, Some(vec!["mongodb".to_string()]));
}

#[tokio::test]
async fn no_vulnerabilities_returns_none() {
    let osv_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"vulns": []})))
        .mount(&osv_server)
        .await;

    let config = RuleConfig {
        action: Action::ReviewPr,
        ecosystem_config: vec![VulncheckEcosystemConfig {
            name: "npm".to_string(),
            db_type: "osv".to_string(),
            db_endpoint: format!("{}/v1/query", osv_server.uri()),
            package_repository: RegistryEndpoint {
                url: "https://registry.npmjs.org".to_string(),
            },
            sum_repository: None,
        }],
    };

    let ingested = Ingested {
        pull_request: test_pr(),
        object: IngestedObject::PrDependencies(PrDependencies {
            dependencies: vec![ContextualDependency {
                dependency: Dependency::new(Ecosystem::Npm, "left-pad", "1.0.0"),
                name: "package-lock.json".to_string(),
                patch_url: "https://example.invalid/patch".to_string(),
            }],
        }),
    };

    let evaluator = VulncheckEvaluator::new();
    let outcome = evaluator
        .evaluate(&config, &ingested, &RecordingHandlerFactory)
        .await
        .unwrap();

    assert_eq!(outcome, None);
}
