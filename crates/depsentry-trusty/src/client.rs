use depsentry_core::{
    Dependency, MaliciousInfo, ProvenanceInfo, TrustyAlternative, TrustyReport,
};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::{debug, warn};

use crate::components::build_score_components;
use crate::error::{Result, TrustyError};
use crate::wire::TrustyReplyWire;

const DEFAULT_TRUSTY_BASE_URL: &str = "https://api.trustypkg.dev";

/// Trust-score (package reputation) client (§4.D). The base URL can be
/// overridden by `MINDER_UNSTABLE_TRUSTY_ENDPOINT`; an empty value falls
/// back to the library default, per §6.
pub struct TrustyClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl Default for TrustyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustyClient {
    pub fn new() -> Self {
        let base_url = std::env::var("MINDER_UNSTABLE_TRUSTY_ENDPOINT")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TRUSTY_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn report(&self, dep: &Dependency) -> Result<TrustyReport> {
        let url = format!(
            "{}/v1/report?package_name={}&package_type={}",
            self.base_url,
            dep.name,
            dep.ecosystem.config_key()
        );
        debug!(%url, "querying trusty");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TrustyError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "trusty report returned non-200");
            return Err(TrustyError::UnexpectedStatus(status.as_u16(), body));
        }

        let wire: TrustyReplyWire = response.json().await.map_err(TrustyError::Decode)?;
        Ok(convert(wire))
    }
}

fn convert(wire: TrustyReplyWire) -> TrustyReport {
    TrustyReport {
        package_name: wire.package_name,
        package_type: wire.package_type,
        package_version: wire.package_version,
        trusty_url: wire.trusty_url,
        is_deprecated: wire.is_deprecated,
        is_archived: wire.is_archived,
        score: wire.score,
        activity_score: wire.activity_score,
        provenance_score: wire.provenance_score,
        score_components: build_score_components(&wire.description),
        alternatives: wire
            .alternatives
            .into_iter()
            .map(|a| TrustyAlternative {
                package_name: a.package_name,
                score: a.score,
            })
            .collect(),
        provenance: ProvenanceInfo {
            historical: wire.provenance.historical,
            sigstore: wire.provenance.sigstore,
        },
        malicious: wire.malicious.map(|m| MaliciousInfo {
            summary: m.summary,
            details: m.details,
        }),
    }
}
