use depsentry_core::{Ingested, IngestedObject, RuleConfig, TrustyEcosystemConfig};
use depsentry_trusty::TrustyClient;
use tracing::info;

use crate::error::Result;
use crate::presentation::{PresentationHandlerFactory, PresentationOutcome, TrackedTrustyFinding};

/// Evaluates trust-score (package reputation) findings for a PR's
/// dependencies.
pub struct TrustyEvaluator {
    trusty: TrustyClient,
}

impl Default for TrustyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustyEvaluator {
    pub fn new() -> Self {
        Self {
            trusty: TrustyClient::new(),
        }
    }

    pub async fn evaluate(
        &self,
        config: &RuleConfig<TrustyEcosystemConfig>,
        ingested: &Ingested,
        handler_factory: &dyn PresentationHandlerFactory,
    ) -> Result<Option<Vec<String>>> {
        let deps = match &ingested.object {
            IngestedObject::PrDependencies(pr_deps) => &pr_deps.dependencies,
            IngestedObject::Other(_) => return Ok(None),
        };

        if deps.is_empty() {
            return Ok(None);
        }

        let mut handler = handler_factory.create(config.action, &ingested.pull_request);

        for ctx_dep in deps {
            if ctx_dep.dependency.version.is_empty() {
                continue;
            }

            let eco_config = match config
                .find_ecosystem(ctx_dep.dependency.ecosystem.config_key(), |c| &c.name)
            {
                Some(c) => c,
                None => continue,
            };

            let report = self.trusty.report(&ctx_dep.dependency).await?;
            let reasons = classify(&report, &eco_config);

            if reasons.is_empty() {
                continue;
            }

            handler
                .track_trusty_finding(TrackedTrustyFinding {
                    dep: ctx_dep.clone(),
                    report,
                    reasons,
                })
                .await;
        }

        let outcome: PresentationOutcome = handler.submit().await?;

        if outcome.tracked_names.is_empty() {
            info!("trusty evaluation found no tracked dependencies");
            Ok(None)
        } else {
            Ok(Some(outcome.tracked_names))
        }
    }
}

/// A dependency is tracked iff any clause fires.
fn classify(report: &depsentry_core::TrustyReport, config: &TrustyEcosystemConfig) -> Vec<String> {
    let mut reasons = Vec::new();

    if report.malicious.is_some() && !config.allow_malicious {
        reasons.push("flagged malicious".to_string());
    }
    if (report.is_deprecated || report.is_archived) && !config.allow_deprecated {
        reasons.push("deprecated or archived".to_string());
    }
    if let Some(score) = report.score {
        if score < config.score {
            reasons.push(format!("score {score} below threshold {}", config.score));
        }
    }
    if let Some(provenance) = report.provenance_score {
        if provenance > 0.0 && provenance < config.provenance {
            reasons.push(format!(
                "provenance score {provenance} below threshold {}",
                config.provenance
            ));
        }
    }
    if let Some(activity) = report.activity_score {
        if activity > 0.0 && activity < config.activity {
            reasons.push(format!(
                "activity score {activity} below threshold {}",
                config.activity
            ));
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsentry_core::{MaliciousInfo, ProvenanceInfo, TrustyReport};

    fn base_report() -> TrustyReport {
        TrustyReport {
            package_name: "left-pad".to_string(),
            package_type: "npm".to_string(),
            package_version: "1.3.0".to_string(),
            trusty_url: String::new(),
            is_deprecated: false,
            is_archived: false,
            score: Some(8.0),
            activity_score: Some(8.0),
            provenance_score: Some(8.0),
            score_components: vec![],
            alternatives: vec![],
            provenance: ProvenanceInfo::default(),
            malicious: None,
        }
    }

    #[test]
    fn clean_report_is_not_tracked() {
        let config = TrustyEcosystemConfig::default_npm();
        assert!(classify(&base_report(), &config).is_empty());
    }

    #[test]
    fn malicious_report_is_tracked_unless_allowed() {
        let mut report = base_report();
        report.malicious = Some(MaliciousInfo {
            summary: "typosquat".to_string(),
            details: String::new(),
        });
        let config = TrustyEcosystemConfig::default_npm();
        assert!(!classify(&report, &config).is_empty());

        let allowing = TrustyEcosystemConfig {
            allow_malicious: true,
            ..TrustyEcosystemConfig::default_npm()
        };
        assert!(classify(&report, &allowing).is_empty());
    }

    #[test]
    fn low_score_is_tracked() {
        let mut report = base_report();
        report.score = Some(2.0);
        let config = TrustyEcosystemConfig::default_npm();
        assert!(!classify(&report, &config).is_empty());
    }

    #[test]
    fn deprecated_is_tracked_unless_allowed() {
        let mut report = base_report();
        report.is_deprecated = true;
        let config = TrustyEcosystemConfig::default_npm();
        assert!(!classify(&report, &config).is_empty());

        let allowing = TrustyEcosystemConfig {
            allow_deprecated: true,
            ..TrustyEcosystemConfig::default_npm()
        };
        assert!(classify(&report, &allowing).is_empty());
    }
}
