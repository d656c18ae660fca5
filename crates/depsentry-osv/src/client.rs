use depsentry_core::{Dependency, Ecosystem, Vulnerability};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::{debug, warn};

use crate::error::{OsvError, Result};
use crate::selection::flatten_vulnerability;
use crate::wire::{OsvPackage, OsvQueryRequest, OsvQueryResponse};

/// The flattened result of one OSV query: every vuln affecting the
/// dependency, each already reduced to its applicable `(introduced, fixed)`
/// pair.
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityResponse {
    pub vulns: Vec<Vulnerability>,
}

/// OSV-shaped vulnerability database client (§4.A).
pub struct OsvClient {
    client: ClientWithMiddleware,
}

impl Default for OsvClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OsvClient {
    pub fn new() -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Self { client }
    }

    /// `POST {db_endpoint}` with `{version, package:{name, ecosystem}}`,
    /// PyPI-normalising the name first, then flattening the response.
    pub async fn query(
        &self,
        db_endpoint: &str,
        dep: &Dependency,
    ) -> Result<VulnerabilityResponse> {
        let query_dep = if dep.ecosystem == Ecosystem::PyPi {
            dep.normalised()
        } else {
            dep.clone()
        };

        let request = OsvQueryRequest {
            version: query_dep.version.clone(),
            package: OsvPackage {
                name: query_dep.name.clone(),
                ecosystem: query_dep.ecosystem.osv_name().to_string(),
            },
        };

        debug!(
            endpoint = db_endpoint,
            package = %query_dep.name,
            version = %query_dep.version,
            "querying OSV"
        );

        let response = self
            .client
            .post(db_endpoint)
            .json(&request)
            .send()
            .await
            .map_err(OsvError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "OSV query returned non-200");
            return Err(OsvError::UnexpectedStatus(status.as_u16(), body));
        }

        let parsed: OsvQueryResponse = response.json().await.map_err(OsvError::Decode)?;

        let vulns = parsed
            .vulns
            .iter()
            .map(|v| flatten_vulnerability(v, &dep.version))
            .collect();

        Ok(VulnerabilityResponse { vulns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsentry_core::Dependency;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn query_flattens_response() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "vulns": [{
                "id": "GHSA-xxxx",
                "summary": "test",
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
        });

        Mock::given(method("POST"))
            .and(path("/v1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = OsvClient::new();
        let dep = Dependency::new(depsentry_core::Ecosystem::Npm, "mongodb", "0.5.0");
        let endpoint = format!("{}/v1/query", server.uri());

        let response = client.query(&endpoint, &dep).await.unwrap();
        assert_eq!(response.vulns.len(), 1);
        assert_eq!(response.vulns[0].fixed.as_deref(), Some("0.6.0"));
    }

    #[tokio::test]
    async fn query_returns_error_on_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OsvClient::new();
        let dep = Dependency::new(depsentry_core::Ecosystem::Npm, "left-pad", "1.0.0");
        let endpoint = format!("{}/v1/query", server.uri());

        let err = client.query(&endpoint, &dep).await.unwrap_err();
        assert!(matches!(err, OsvError::UnexpectedStatus(500, _)));
    }
}
