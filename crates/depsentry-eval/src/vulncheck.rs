use depsentry_core::{Action, Ingested, IngestedObject, RangeType, RuleConfig, Vulnerability, VulncheckEcosystemConfig};
use depsentry_osv::OsvClient;
use depsentry_registry::{PkgRegistryErrorFormatter, RegistryCache};
use semver::Version;
use tracing::{info, warn};

use crate::error::Result;
use crate::presentation::{PresentationHandlerFactory, PresentationOutcome, TrackedVulnerability};

fn strip_v(s: &str) -> &str {
    s.strip_prefix('v').unwrap_or(s)
}

/// What to do with a registry lookup once vulnerabilities are confirmed.
enum PatchSelection {
    Patched(String),
    LatestOnly,
    NoPatch,
}

fn select_patch(vulns: &[Vulnerability]) -> PatchSelection {
    let fixed: Vec<(&RangeType, &str)> = vulns
        .iter()
        .filter_map(|v| v.fixed.as_deref().map(|f| (&v.range_type, f)))
        .collect();

    if fixed.is_empty() {
        return PatchSelection::NoPatch;
    }

    let all_semver = fixed.iter().all(|(rt, _)| **rt == RangeType::Semver);
    if all_semver {
        let max = fixed
            .iter()
            .filter_map(|(_, f)| Version::parse(strip_v(f)).ok().map(|v| (v, *f)))
            .max_by(|a, b| a.0.cmp(&b.0));
        if let Some((_, raw)) = max {
            return PatchSelection::Patched(raw.to_string());
        }
    }

    PatchSelection::LatestOnly
}

/// Evaluates vulnerability-scan findings for a PR's dependencies.
pub struct VulncheckEvaluator {
    osv: OsvClient,
    registries: RegistryCache,
}

impl Default for VulncheckEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl VulncheckEvaluator {
    pub fn new() -> Self {
        Self {
            osv: OsvClient::new(),
            registries: RegistryCache::new(),
        }
    }

    pub async fn evaluate(
        &self,
        config: &RuleConfig<VulncheckEcosystemConfig>,
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
                None => {
                    warn!(
                        ecosystem = ctx_dep.dependency.ecosystem.config_key(),
                        "no ecosystem config for dependency, skipping"
                    );
                    continue;
                }
            };

            let response = self
                .osv
                .query(&eco_config.db_endpoint, &ctx_dep.dependency)
                .await?;
            if response.vulns.is_empty() {
                continue;
            }

            let formatter = match select_patch(&response.vulns) {
                PatchSelection::NoPatch => {
                    let registry = self.registries.get_or_create(&eco_config)?;
                    registry.no_patch_available_formatter(&ctx_dep.dependency)
                }
                PatchSelection::Patched(version) => {
                    let registry = self.registries.get_or_create(&eco_config)?;
                    match registry
                        .send_recv(&ctx_dep.dependency, &version, false)
                        .await
                    {
                        Ok(lookup) => registry.patch_formatter(&ctx_dep.dependency, &lookup),
                        Err(e) => Box::new(PkgRegistryErrorFormatter::new(
                            ctx_dep.dependency.clone(),
                            e.to_string(),
                        )),
                    }
                }
                PatchSelection::LatestOnly => {
                    let registry = self.registries.get_or_create(&eco_config)?;
                    match registry
                        .send_recv(&ctx_dep.dependency, "", true)
                        .await
                    {
                        Ok(lookup) => registry.patch_formatter(&ctx_dep.dependency, &lookup),
                        Err(e) => Box::new(PkgRegistryErrorFormatter::new(
                            ctx_dep.dependency.clone(),
                            e.to_string(),
                        )),
                    }
                }
            };

            handler
                .track_vulnerability(TrackedVulnerability {
                    dep: ctx_dep.clone(),
                    vulns: response.vulns,
                    formatter,
                })
                .await;
        }

        let outcome: PresentationOutcome = handler.submit().await?;

        if outcome.tracked_names.is_empty() {
            info!("vulncheck evaluation found no vulnerable dependencies");
            Ok(None)
        } else {
            Ok(Some(outcome.tracked_names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(range_type: RangeType, fixed: Option<&str>) -> Vulnerability {
        Vulnerability {
            id: "GHSA-x".to_string(),
            summary: None,
            details: None,
            introduced: None,
            fixed: fixed.map(|s| s.to_string()),
            range_type,
        }
    }

    #[test]
    fn selects_max_semver_when_all_fixed_are_semver() {
        let vulns = vec![
            vuln(RangeType::Semver, Some("1.2.0")),
            vuln(RangeType::Semver, Some("1.5.0")),
        ];
        match select_patch(&vulns) {
            PatchSelection::Patched(v) => assert_eq!(v, "1.5.0"),
            _ => panic!("expected Patched"),
        }
    }

    #[test]
    fn non_semver_fixed_marks_latest_only() {
        let vulns = vec![vuln(RangeType::Git, Some("abcdef"))];
        assert!(matches!(select_patch(&vulns), PatchSelection::LatestOnly));
    }

    #[test]
    fn no_fixed_values_marks_no_patch() {
        let vulns = vec![vuln(RangeType::Semver, None)];
        assert!(matches!(select_patch(&vulns), PatchSelection::NoPatch));
    }
}
